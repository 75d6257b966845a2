use http::Method;
use tracing::{debug, trace};

use crate::ast::{OperationKind, SelectionNode};
use crate::compiler::aggregation::{aggregated_entity_set, compile_aggregation};
use crate::compiler::arguments::compile_query_arguments;
use crate::compiler::mutation::{compile_action, compile_function, compile_mutation};
use crate::compiler::query_string::QueryOptionList;
use crate::compiler::selection::compile_selection;
use crate::compiler::CompileContext;
use crate::descriptor::{CompiledOperation, CompiledRequest, RequestDescriptor, RequestKind};
use crate::error::CompileError;

/// Compiles one root field into a standalone OData request.
///
/// Aggregations are recognized first, then function and action imports, and finally
/// entity set queries or mutations depending on the operation type.
pub fn compile_root_field(
    ctx: &CompileContext<'_>,
    field: &SelectionNode,
) -> Result<RequestDescriptor, CompileError> {
    let aggregated = match ctx.operation_kind {
        OperationKind::Query => aggregated_entity_set(&field.name),
        _ => None,
    };

    let descriptor = if let Some(entity_set) = aggregated {
        compile_aggregation(ctx, entity_set, field)?
    } else if ctx.schema.is_function_import(&field.name) {
        compile_function(ctx, field)?
    } else if ctx.schema.is_action_import(&field.name) {
        compile_action(ctx, field)?
    } else {
        match ctx.operation_kind {
            OperationKind::Query => compile_query(ctx, field)?,
            OperationKind::Mutation => compile_mutation(ctx, field)?,
            OperationKind::Subscription => {
                return Err(CompileError::UnsupportedOperation(
                    OperationKind::Subscription.as_str(),
                ))
            }
        }
    };

    debug!(
        field = field.name.as_str(),
        method = %descriptor.method,
        url = %descriptor.url(),
        kind = ?descriptor.kind,
        "compiled root field"
    );

    Ok(descriptor)
}

fn compile_query(
    ctx: &CompileContext<'_>,
    field: &SelectionNode,
) -> Result<RequestDescriptor, CompileError> {
    let entity_type = ctx
        .schema
        .resolve_entity_set(&field.name)
        .ok_or_else(|| CompileError::entity_set(&field.name))?;

    let selection = compile_selection(ctx, Some(entity_type), field)?;
    let arguments = compile_query_arguments(ctx, &field.arguments)?;
    trace!(?selection, "compiled selection");

    let mut options = QueryOptionList::default();
    selection.write_root_to(&mut options);
    arguments.write_to(&mut options);

    Ok(RequestDescriptor {
        name: field.name.clone(),
        method: Method::GET,
        query_string: options.to_url_query(),
        body: None,
        kind: RequestKind::Query,
    })
}

pub fn compile_single(
    ctx: &CompileContext<'_>,
    field: &SelectionNode,
) -> Result<CompiledOperation, CompileError> {
    Ok(CompiledOperation {
        request: CompiledRequest::Single(compile_root_field(ctx, field)?),
        correlation: vec![field.response_key().to_string()],
    })
}
