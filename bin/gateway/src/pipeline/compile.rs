use graphql_odata_compiler::{
    ast::Document, compile_operation, variables_from_json, CompiledOperation, CompilerOptions,
    SchemaView,
};
use tracing::{instrument, trace};

use crate::pipeline::{deserialize_graphql_params::GraphQLParams, error::PipelineError};

#[instrument(level = "debug", skip_all, fields(operation_name = params.operation_name.as_deref()))]
pub fn compile_graphql_params(
    params: &GraphQLParams,
    schema: &dyn SchemaView,
    options: &CompilerOptions,
) -> Result<CompiledOperation, PipelineError> {
    let document = Document::parse(&params.query)?;
    let variables = variables_from_json(params.variables.as_ref());
    let operation = compile_operation(&document, schema, variables, options)?;

    trace!("compiled operation:\n{}", operation);

    Ok(operation)
}
