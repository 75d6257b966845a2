use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::{Map, Number, Value as JsonValue};

use crate::ast::{Scalar, Value};
use crate::compiler::CompileContext;
use crate::error::CompileError;

/// Bytes of a URL literal that would otherwise split or end the query string, or be
/// decoded into something else (`+` as a space, `%` as an escape).
const URL_LITERAL_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'#')
    .add(b'?')
    .add(b'=');

/// Percent-encodes the reserved bytes of a literal placed in a route or query string.
/// Non-ASCII text is encoded as UTF-8.
pub fn encode_url_literal(literal: &str) -> String {
    utf8_percent_encode(literal, URL_LITERAL_ENCODE_SET).to_string()
}

/// Wraps text in single quotes for use inside an OData URL.
///
/// Double quotes are stripped, embedded single quotes are doubled and reserved bytes are
/// percent-encoded.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for ch in text.chars() {
        match ch {
            '"' => {}
            '\'' => quoted.push_str("''"),
            other => quoted.push(other),
        }
    }
    quoted.push('\'');
    encode_url_literal(&quoted)
}

/// Renders a scalar as an OData URL literal.
pub fn url_literal(scalar: &Scalar) -> String {
    match scalar {
        Scalar::String(s) | Scalar::Enum(s) => quote(s),
        other => other.to_string(),
    }
}

/// Renders a resolved scalar value as a URL literal, rejecting objects and lists.
pub fn scalar_url_literal(
    ctx: &CompileContext<'_>,
    argument: &str,
    value: &Value,
) -> Result<String, CompileError> {
    match ctx.resolve(value)? {
        Value::Scalar(scalar) => Ok(url_literal(scalar)),
        other => Err(CompileError::invalid_argument(
            argument,
            format!("expected a scalar, found {}", other.kind_name()),
        )),
    }
}

/// Converts a value into JSON for request bodies, resolving variables at every depth.
pub fn to_json(ctx: &CompileContext<'_>, value: &Value) -> Result<JsonValue, CompileError> {
    Ok(match ctx.resolve(value)? {
        Value::Scalar(scalar) => match scalar {
            Scalar::String(s) | Scalar::Enum(s) => JsonValue::String(s.clone()),
            Scalar::Int(i) => JsonValue::Number(Number::from(*i)),
            Scalar::Float(f) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Scalar::Boolean(b) => JsonValue::Bool(*b),
            Scalar::Null => JsonValue::Null,
        },
        Value::Object(fields) => {
            let mut object = Map::with_capacity(fields.len());
            for (name, field) in fields {
                object.insert(name.clone(), to_json(ctx, field)?);
            }
            JsonValue::Object(object)
        }
        Value::List(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| to_json(ctx, item))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        // Variables resolve to concrete values above
        Value::Variable(name) => return Err(CompileError::VariableResolution(name.clone())),
    })
}

/// Renders an entity key segment, without the surrounding parentheses.
///
/// Scalars address single-property keys, objects address composite keys (`a=1,b='x'`).
pub fn key_segment(
    ctx: &CompileContext<'_>,
    argument: &str,
    value: &Value,
) -> Result<String, CompileError> {
    match ctx.resolve(value)? {
        Value::Scalar(scalar) => Ok(url_literal(scalar)),
        Value::Object(fields) if !fields.is_empty() => fields
            .iter()
            .map(|(name, field)| {
                scalar_url_literal(ctx, argument, field).map(|literal| format!("{}={}", name, literal))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|parts| parts.join(",")),
        other => Err(CompileError::invalid_argument(
            argument,
            format!("cannot address an entity with {}", other.kind_name()),
        )),
    }
}

/// Renders a function parameter value. Objects and lists are passed as JSON literals.
pub fn parameter_literal(
    ctx: &CompileContext<'_>,
    value: &Value,
) -> Result<String, CompileError> {
    match ctx.resolve(value)? {
        Value::Scalar(scalar) => Ok(url_literal(scalar)),
        composite => Ok(encode_url_literal(&to_json(ctx, composite)?.to_string())),
    }
}
