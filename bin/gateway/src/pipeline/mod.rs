use std::sync::Arc;

use ntex::{
    util::Bytes,
    web::{self, HttpRequest},
};
use tracing::debug;

use crate::{
    pipeline::{
        compile::compile_graphql_params,
        deserialize_graphql_params::deserialize_graphql_params,
        error::PipelineError,
        execution::execute_downstream,
        reshape::{passthrough_response, reshape_downstream_response},
        rewrite::{passthrough_request, rewrite_request},
    },
    schema_state::SchemaState,
    shared_state::GatewaySharedState,
};

pub mod compile;
pub mod deserialize_graphql_params;
pub mod error;
pub mod execution;
pub mod reshape;
pub mod rewrite;

/// Serves one request on the GraphQL endpoint.
///
/// GraphQL requests are compiled into an OData request, executed against the OData
/// service and the response is reshaped into a GraphQL envelope. Requests without a
/// GraphQL query are forwarded as they are.
#[inline]
pub async fn graphql_request_handler(
    req: &HttpRequest,
    body_bytes: Bytes,
    shared_state: &Arc<GatewaySharedState>,
    schema_state: &Arc<SchemaState>,
) -> Result<web::HttpResponse, PipelineError> {
    let odata_config = &shared_state.config.odata;

    let Some(params) = deserialize_graphql_params(req, &body_bytes)? else {
        debug!("request carries no GraphQL query, passing it through");
        let request = passthrough_request(req, &body_bytes, odata_config)?;
        let response = execute_downstream(&shared_state.odata_client, request).await?;

        return Ok(passthrough_response(response));
    };

    let model = schema_state.model().await?;
    let operation = compile_graphql_params(&params, model.as_ref(), &shared_state.compiler_options)?;
    let request = rewrite_request(&operation, odata_config)?;
    let response = execute_downstream(&shared_state.odata_client, request).await?;

    reshape_downstream_response(&response, &operation.correlation)
}
