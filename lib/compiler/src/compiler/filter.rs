use tracing::trace;

use crate::ast::{Scalar, Value};
use crate::compiler::literal::{quote, scalar_url_literal};
use crate::compiler::CompileContext;
use crate::error::CompileError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Connector {
    And,
    Or,
}

impl Connector {
    fn separator(&self) -> &'static str {
        match self {
            Connector::And => " and ",
            Connector::Or => " or ",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operator {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    StartsWith,
    EndsWith,
    In,
}

const OPERATOR_SUFFIXES: [(&str, Operator); 8] = [
    ("_gte", Operator::Ge),
    ("_gt", Operator::Gt),
    ("_lte", Operator::Le),
    ("_lt", Operator::Lt),
    ("_contains", Operator::Contains),
    ("_startswith", Operator::StartsWith),
    ("_endswith", Operator::EndsWith),
    ("_in", Operator::In),
];

fn split_operator(field: &str) -> (&str, Operator) {
    for (suffix, operator) in OPERATOR_SUFFIXES {
        if let Some(property) = field.strip_suffix(suffix) {
            if !property.is_empty() {
                return (property, operator);
            }
        }
    }

    (field, Operator::Eq)
}

/// A compiled OData boolean expression.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterExpression {
    text: String,
    terms: usize,
}

impl FilterExpression {
    pub fn term(text: String) -> Self {
        Self { text, terms: 1 }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The expression, parenthesized when it is made of several terms.
    pub fn grouped(&self) -> String {
        if self.terms > 1 {
            format!("({})", self.text)
        } else {
            self.text.clone()
        }
    }

    pub fn conjunction(parts: Vec<FilterExpression>) -> Option<FilterExpression> {
        Self::combine(parts, Connector::And)
    }

    fn combine(parts: Vec<FilterExpression>, connector: Connector) -> Option<FilterExpression> {
        if parts.len() <= 1 {
            return parts.into_iter().next();
        }

        Some(FilterExpression {
            text: parts
                .iter()
                .map(FilterExpression::grouped)
                .collect::<Vec<_>>()
                .join(connector.separator()),
            terms: parts.len(),
        })
    }
}

/// Compiles a `filter`/`where` argument into an OData `$filter` expression.
///
/// Returns `None` when the argument holds no comparisons, e.g. `where: {}`.
pub fn compile_filter(
    ctx: &CompileContext<'_>,
    argument: &str,
    value: &Value,
) -> Result<Option<FilterExpression>, CompileError> {
    let expression = compile_group(ctx, argument, value, Connector::And)?;
    if let Some(expression) = &expression {
        trace!(argument, filter = expression.as_str(), "compiled filter");
    }
    Ok(expression)
}

/// Compiles an implicit equality filter for an argument outside the reserved keywords.
pub fn compile_equality(
    ctx: &CompileContext<'_>,
    argument: &str,
    value: &Value,
) -> Result<FilterExpression, CompileError> {
    Ok(FilterExpression::term(format!(
        "{} eq {}",
        argument,
        scalar_url_literal(ctx, argument, value)?
    )))
}

fn compile_group(
    ctx: &CompileContext<'_>,
    argument: &str,
    value: &Value,
    connector: Connector,
) -> Result<Option<FilterExpression>, CompileError> {
    match ctx.resolve(value)? {
        Value::Object(fields) => {
            let mut parts = Vec::with_capacity(fields.len());
            for (name, field) in fields {
                let part = if name.eq_ignore_ascii_case("or") {
                    compile_group(ctx, argument, field, Connector::Or)?
                } else if name.eq_ignore_ascii_case("and") {
                    compile_group(ctx, argument, field, Connector::And)?
                } else {
                    Some(compile_comparison(ctx, name, field)?)
                };
                parts.extend(part);
            }
            Ok(FilterExpression::combine(parts, connector))
        }
        Value::List(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.extend(compile_group(ctx, argument, item, Connector::And)?);
            }
            Ok(FilterExpression::combine(parts, connector))
        }
        other => Err(CompileError::invalid_argument(
            argument,
            format!("expected an object or a list, found {}", other.kind_name()),
        )),
    }
}

fn compile_comparison(
    ctx: &CompileContext<'_>,
    field: &str,
    value: &Value,
) -> Result<FilterExpression, CompileError> {
    let (property, operator) = split_operator(field);

    let text = match operator {
        Operator::In => {
            let literals = match ctx.resolve(value)? {
                Value::List(items) => items
                    .iter()
                    .map(|item| scalar_url_literal(ctx, field, item))
                    .collect::<Result<Vec<_>, _>>()?,
                single => vec![scalar_url_literal(ctx, field, single)?],
            };
            format!("{} in ({})", property, literals.join(","))
        }
        Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
            let function = match operator {
                Operator::Contains => "contains",
                Operator::StartsWith => "startswith",
                _ => "endswith",
            };
            let text = match ctx.resolve(value)? {
                Value::Scalar(Scalar::String(s) | Scalar::Enum(s)) => quote(s),
                Value::Scalar(other) => quote(&other.to_string()),
                other => {
                    return Err(CompileError::invalid_argument(
                        field,
                        format!("expected a string, found {}", other.kind_name()),
                    ))
                }
            };
            format!("{}({},{})", function, property, text)
        }
        comparison => {
            let token = match comparison {
                Operator::Gt => "gt",
                Operator::Lt => "lt",
                Operator::Ge if ctx.options.legacy_range_operators => "gte",
                Operator::Ge => "ge",
                Operator::Le if ctx.options.legacy_range_operators => "lte",
                Operator::Le => "le",
                _ => "eq",
            };
            format!(
                "{} {} {}",
                property,
                token,
                scalar_url_literal(ctx, field, value)?
            )
        }
    };

    Ok(FilterExpression::term(text))
}
