use http::Method;
use ntex::util::Bytes;
use ntex::web::types::Query;
use ntex::web::HttpRequest;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{trace, warn};

use crate::pipeline::error::PipelineError;

/// The inbound GraphQL envelope: `{"query": ..., "variables": ...}`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GraphQLPayload {
    query: Option<String>,
    operation_name: Option<String>,
    variables: Option<JsonValue>,
}

#[derive(Deserialize, Debug)]
struct GETQueryParams {
    query: Option<String>,
    #[serde(rename = "operationName")]
    operation_name: Option<String>,
    variables: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct GraphQLParams {
    pub query: String,
    pub operation_name: Option<String>,
    pub variables: Option<JsonValue>,
}

impl GraphQLPayload {
    fn into_params(self) -> Option<GraphQLParams> {
        match self.query {
            Some(query) if !query.trim().is_empty() => Some(GraphQLParams {
                query,
                operation_name: self.operation_name,
                variables: self.variables,
            }),
            _ => None,
        }
    }
}

impl TryFrom<GETQueryParams> for GraphQLPayload {
    type Error = PipelineError;

    fn try_from(params: GETQueryParams) -> Result<Self, Self::Error> {
        let Some(query) = params.query else {
            return Ok(GraphQLPayload::default());
        };

        // The `query` parameter may carry the whole JSON envelope instead of GraphQL text.
        if let Ok(envelope) = sonic_rs::from_str::<GraphQLPayload>(&query) {
            if envelope.query.is_some() {
                return Ok(envelope);
            }
        }

        let variables = match params.variables.as_deref() {
            Some(v_str) if !v_str.is_empty() => {
                Some(sonic_rs::from_str(v_str).map_err(PipelineError::FailedToParseVariables)?)
            }
            _ => None,
        };

        Ok(GraphQLPayload {
            query: Some(query),
            operation_name: params.operation_name,
            variables,
        })
    }
}

/// Reads the GraphQL envelope of `req`.
///
/// Returns `None` when the request carries no GraphQL query, in which case it is not
/// meant for the gateway and is passed through to the OData service untouched.
pub fn deserialize_graphql_params(
    req: &HttpRequest,
    body_bytes: &Bytes,
) -> Result<Option<GraphQLParams>, PipelineError> {
    let http_method = req.method();
    let payload = match *http_method {
        Method::GET => {
            trace!("processing GET GraphQL operation");
            let Some(query_params_str) = req.uri().query() else {
                return Ok(None);
            };
            let query_params = Query::<GETQueryParams>::from_query(query_params_str)
                .map_err(PipelineError::GetUnprocessableQueryParams)?
                .0;

            trace!("parsed GET query params: {:?}", query_params);

            GraphQLPayload::try_from(query_params)?
        }
        Method::POST => {
            trace!("processing POST GraphQL request");

            if body_bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(None);
            }

            sonic_rs::from_slice::<GraphQLPayload>(body_bytes).map_err(|e| {
                warn!("Failed to parse body: {}", e);
                PipelineError::FailedToParseBody(e)
            })?
        }
        _ => {
            trace!("no GraphQL envelope on {} requests", http_method);
            return Ok(None);
        }
    };

    Ok(payload.into_params())
}
