use http::Method;
use tracing::trace;

use crate::ast::{Argument, Scalar, SelectionNode, Value};
use crate::compiler::arguments::compile_query_arguments;
use crate::compiler::query_string::QueryOptionList;
use crate::compiler::CompileContext;
use crate::descriptor::{RequestDescriptor, RequestKind};
use crate::error::CompileError;

pub const AGGREGATE_SUFFIX: &str = "_aggregate";
const COUNT_FIELD: &str = "_count";
const AGGREGATE_FUNCTIONS: [&str; 5] = ["sum", "max", "min", "average", "countdistinct"];

/// Entity set addressed by an `<entity set>_aggregate` root field.
pub fn aggregated_entity_set(field_name: &str) -> Option<&str> {
    field_name
        .strip_suffix(AGGREGATE_SUFFIX)
        .filter(|entity_set| !entity_set.is_empty())
}

/// `price_sum` → `price with sum as <output>`; `_count` → `$count as <output>`.
fn aggregate_clause(field: &SelectionNode) -> Option<String> {
    let output = field.response_key();

    if field.name == COUNT_FIELD {
        return Some(format!("$count as {}", output));
    }

    let (property, function) = field.name.rsplit_once('_')?;
    if property.is_empty() || !AGGREGATE_FUNCTIONS.contains(&function) {
        return None;
    }

    Some(format!("{} with {} as {}", property, function, output))
}

fn grouping_keys(ctx: &CompileContext<'_>, argument: &Argument) -> Result<Vec<String>, CompileError> {
    let key = |value: &Value| -> Result<String, CompileError> {
        match ctx.resolve(value)? {
            Value::Scalar(Scalar::String(name) | Scalar::Enum(name)) => Ok(name.clone()),
            other => Err(CompileError::invalid_argument(
                &argument.name,
                format!("expected a property name, found {}", other.kind_name()),
            )),
        }
    };

    match ctx.resolve(&argument.value)? {
        Value::List(items) => items.iter().map(&key).collect(),
        single => Ok(vec![key(single)?]),
    }
}

/// Compiles an `_aggregate` root field into an `$apply` request against its entity set.
pub fn compile_aggregation(
    ctx: &CompileContext<'_>,
    entity_set: &str,
    field: &SelectionNode,
) -> Result<RequestDescriptor, CompileError> {
    if ctx.schema.resolve_entity_set(entity_set).is_none() {
        return Err(CompileError::entity_set(entity_set));
    }

    let mut group_by = Vec::new();
    let mut remaining = Vec::with_capacity(field.arguments.len());
    for argument in &field.arguments {
        if argument.name == "group_by" || argument.name == "groupBy" {
            group_by.extend(grouping_keys(ctx, argument)?);
        } else {
            remaining.push(argument.clone());
        }
    }

    let mut clauses = Vec::new();
    for child in ctx.inline_fields(field)? {
        match aggregate_clause(child) {
            Some(clause) => clauses.push(clause),
            None => trace!(field = child.name.as_str(), "field is not an aggregation"),
        }
    }

    let aggregate = (!clauses.is_empty()).then(|| format!("aggregate({})", clauses.join(",")));
    let mut transformation = match (group_by.is_empty(), aggregate) {
        (true, Some(aggregate)) => aggregate,
        (false, Some(aggregate)) => format!("groupby(({}),{})", group_by.join(","), aggregate),
        (false, None) => format!("groupby(({}))", group_by.join(",")),
        (true, None) => {
            return Err(CompileError::invalid_argument(
                &field.name,
                "an aggregation needs at least one aggregated field or grouping key",
            ))
        }
    };

    let arguments = compile_query_arguments(ctx, &remaining)?;
    if let Some(filter) = arguments.filter() {
        transformation = format!("filter({})/{}", filter.as_str(), transformation);
    }

    let mut options = QueryOptionList::default();
    options.push("$apply", transformation);
    if let Some(top) = arguments.top {
        options.push("$top", top.to_string());
    }
    if let Some(order_by) = &arguments.order_by {
        options.push("$orderby", order_by.as_str());
    }

    Ok(RequestDescriptor {
        name: entity_set.to_string(),
        method: Method::GET,
        query_string: options.to_url_query(),
        body: None,
        kind: RequestKind::Aggregation,
    })
}
