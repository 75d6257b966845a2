use crate::ast::{Scalar, Value};
use crate::compiler::CompileContext;
use crate::error::CompileError;

/// Compiles `["title_desc", "price"]` into `title desc,price asc`.
pub fn compile_order_by(
    ctx: &CompileContext<'_>,
    argument: &str,
    value: &Value,
) -> Result<Option<String>, CompileError> {
    let tokens = match ctx.resolve(value)? {
        Value::List(items) => items
            .iter()
            .map(|item| order_token(ctx, argument, item))
            .collect::<Result<Vec<_>, _>>()?,
        single => vec![order_token(ctx, argument, single)?],
    };

    if tokens.is_empty() {
        return Ok(None);
    }

    Ok(Some(
        tokens
            .iter()
            .map(|token| order_item(token))
            .collect::<Vec<_>>()
            .join(","),
    ))
}

fn order_token<'v>(
    ctx: &'v CompileContext<'_>,
    argument: &str,
    value: &'v Value,
) -> Result<&'v str, CompileError> {
    match ctx.resolve(value)? {
        Value::Scalar(Scalar::String(token) | Scalar::Enum(token)) => Ok(token.trim_matches('"')),
        other => Err(CompileError::invalid_argument(
            argument,
            format!("expected a property name, found {}", other.kind_name()),
        )),
    }
}

fn order_item(token: &str) -> String {
    if let Some(property) = token.strip_suffix("_desc") {
        format!("{} desc", property)
    } else if let Some(property) = token.strip_suffix("_asc") {
        format!("{} asc", property)
    } else {
        format!("{} asc", token)
    }
}

/// Reads a non-negative page size from `first`/`last`.
pub fn page_size(
    ctx: &CompileContext<'_>,
    argument: &str,
    value: &Value,
) -> Result<u64, CompileError> {
    let size = match ctx.resolve(value)? {
        Value::Scalar(Scalar::Int(size)) => u64::try_from(*size).ok(),
        Value::Scalar(Scalar::String(size)) => size.trim().parse::<u64>().ok(),
        _ => None,
    };

    size.ok_or_else(|| CompileError::invalid_argument(argument, "expected a non-negative integer"))
}
