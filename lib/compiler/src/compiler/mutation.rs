use http::Method;
use serde_json::{Map, Value as JsonValue};
use tracing::trace;

use crate::ast::{SelectionNode, Value};
use crate::compiler::literal::{key_segment, parameter_literal, to_json};
use crate::compiler::query_string::QueryOptionList;
use crate::compiler::selection::compile_selection;
use crate::compiler::CompileContext;
use crate::descriptor::{RequestDescriptor, RequestKind};
use crate::error::CompileError;
use crate::schema::StructuredType;

const VERBS: [(&str, Method); 3] = [
    ("add", Method::POST),
    ("update", Method::PATCH),
    ("delete", Method::DELETE),
];

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    let tail = text.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &text[..split])
}

/// Splits `add_books`/`books_update`/... into the HTTP method and entity set name.
///
/// Names without a verb are created with `POST`.
pub fn mutation_target(field_name: &str) -> (Method, &str) {
    for (verb, method) in VERBS {
        let entity_set = strip_prefix_ignore_case(field_name, verb)
            .and_then(|rest| rest.strip_prefix('_'))
            .or_else(|| {
                strip_suffix_ignore_case(field_name, verb).and_then(|rest| rest.strip_suffix('_'))
            })
            .filter(|rest| !rest.is_empty());

        if let Some(entity_set) = entity_set {
            return (method, entity_set);
        }
    }

    (Method::POST, field_name)
}

fn selection_query(
    ctx: &CompileContext<'_>,
    owner: Option<&StructuredType>,
    field: &SelectionNode,
) -> Result<String, CompileError> {
    if !field.has_sub_selections() {
        return Ok(String::new());
    }

    let mut options = QueryOptionList::default();
    compile_selection(ctx, owner, field)?.write_root_to(&mut options);
    Ok(options.to_url_query())
}

/// Assembles a JSON body from an `input` object merged with the remaining arguments.
fn assemble_body<'f>(
    ctx: &CompileContext<'_>,
    arguments: impl Iterator<Item = (&'f str, &'f Value)>,
) -> Result<Option<JsonValue>, CompileError> {
    let mut body = Map::new();

    for (name, value) in arguments {
        if name == "input" {
            match to_json(ctx, value)? {
                JsonValue::Object(fields) => body.extend(fields),
                other => {
                    return Err(CompileError::invalid_argument(
                        name,
                        format!("expected an object, found {}", json_kind(&other)),
                    ))
                }
            }
        } else {
            body.insert(name.to_string(), to_json(ctx, value)?);
        }
    }

    Ok((!body.is_empty()).then_some(JsonValue::Object(body)))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "object",
    }
}

/// Compiles a create/update/delete root field against an entity set.
pub fn compile_mutation(
    ctx: &CompileContext<'_>,
    field: &SelectionNode,
) -> Result<RequestDescriptor, CompileError> {
    let (method, entity_set) = mutation_target(&field.name);
    let entity_type = ctx
        .schema
        .resolve_entity_set(entity_set)
        .ok_or_else(|| CompileError::entity_set(entity_set))?;

    let mut key = None;
    let mut body_arguments = Vec::with_capacity(field.arguments.len());
    for argument in &field.arguments {
        if argument.name == "key" || argument.name == "id" {
            key = Some(key_segment(ctx, &argument.name, &argument.value)?);
        } else {
            body_arguments.push((argument.name.as_str(), &argument.value));
        }
    }

    let name = match key {
        Some(key) => format!("{}({})", entity_set, key),
        None => entity_set.to_string(),
    };
    let body = assemble_body(ctx, body_arguments.into_iter())?;
    trace!(%method, name = name.as_str(), "compiled mutation");

    Ok(RequestDescriptor {
        name,
        method,
        query_string: selection_query(ctx, Some(entity_type), field)?,
        body,
        kind: RequestKind::Mutation,
    })
}

/// Compiles a function import call into `Name(p1=...,p2=...)`.
pub fn compile_function(
    ctx: &CompileContext<'_>,
    field: &SelectionNode,
) -> Result<RequestDescriptor, CompileError> {
    let parameters = field
        .arguments
        .iter()
        .map(|argument| {
            parameter_literal(ctx, &argument.value)
                .map(|literal| format!("{}={}", argument.name, literal))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let returned = ctx.schema.import_return_type(&field.name);

    Ok(RequestDescriptor {
        name: format!("{}({})", field.name, parameters.join(",")),
        method: Method::GET,
        query_string: selection_query(ctx, returned, field)?,
        body: None,
        kind: RequestKind::Function,
    })
}

/// Compiles an action import call into a `POST` carrying its parameters as JSON.
pub fn compile_action(
    ctx: &CompileContext<'_>,
    field: &SelectionNode,
) -> Result<RequestDescriptor, CompileError> {
    let body = assemble_body(
        ctx,
        field
            .arguments
            .iter()
            .map(|argument| (argument.name.as_str(), &argument.value)),
    )?;
    let returned = ctx.schema.import_return_type(&field.name);

    Ok(RequestDescriptor {
        name: field.name.clone(),
        method: Method::POST,
        query_string: selection_query(ctx, returned, field)?,
        body,
        kind: RequestKind::Action,
    })
}
