use graphql_odata_compiler::{CompileError, ReshapeError};
use http::StatusCode;
use ntex::{
    http::{Response, ResponseBuilder},
    web::error::QueryPayloadError,
};
use serde::Serialize;

use crate::{metadata::base::LoadMetadataError, odata_client::ODataClientError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    // GET specific errors
    #[error("Failed to parse query parameters")]
    GetUnprocessableQueryParams(QueryPayloadError),

    // Envelope errors
    #[error("Failed to parse GraphQL request payload")]
    FailedToParseBody(sonic_rs::Error),
    #[error("Failed to parse GraphQL variables JSON")]
    FailedToParseVariables(sonic_rs::Error),

    // Translation errors
    #[error(transparent)]
    CompileError(#[from] CompileError),
    #[error("OData metadata is not available: {0}")]
    MetadataUnavailable(#[from] LoadMetadataError),

    // Downstream errors
    #[error("Failed to build the OData request: {0}")]
    RequestBuildFailure(String),
    #[error("Failed to reach the OData service: {0}")]
    DownstreamRequestFailed(#[from] ODataClientError),
    #[error("Failed to read the OData response: {0}")]
    ReshapeFailed(#[from] ReshapeError),
    #[error("Failed to serialize the GraphQL response: {0}")]
    ResponseSerializationFailed(sonic_rs::Error),
}

impl PipelineError {
    pub fn graphql_error_code(&self) -> &'static str {
        match self {
            Self::FailedToParseVariables(_) => "BAD_USER_INPUT",
            Self::CompileError(CompileError::Parse(_)) => "GRAPHQL_PARSE_FAILED",
            Self::CompileError(CompileError::UnknownFragment(_)) => "GRAPHQL_VALIDATION_FAILED",
            Self::CompileError(CompileError::MultipleOperations)
            | Self::CompileError(CompileError::NoOperation) => "OPERATION_RESOLUTION_FAILURE",
            Self::CompileError(CompileError::UnsupportedOperation(_)) => "OPERATION_NOT_SUPPORTED",
            Self::CompileError(CompileError::SchemaResolution { .. }) => "SCHEMA_RESOLUTION_FAILED",
            Self::CompileError(CompileError::VariableResolution(_))
            | Self::CompileError(CompileError::InvalidArgument { .. }) => "BAD_USER_INPUT",
            Self::MetadataUnavailable(_) => "METADATA_UNAVAILABLE",
            Self::DownstreamRequestFailed(_) => "DOWNSTREAM_REQUEST_FAILED",
            Self::ReshapeFailed(_) => "DOWNSTREAM_RESPONSE_INVALID",
            Self::RequestBuildFailure(_) | Self::ResponseSerializationFailed(_) => {
                "INTERNAL_SERVER_ERROR"
            }
            _ => "BAD_REQUEST",
        }
    }

    pub fn graphql_error_message(&self) -> String {
        match self {
            Self::RequestBuildFailure(_) | Self::ResponseSerializationFailed(_) => {
                "Unexpected error".to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn default_status_code(&self) -> StatusCode {
        match self {
            Self::GetUnprocessableQueryParams(_) => StatusCode::BAD_REQUEST,
            Self::FailedToParseBody(_) => StatusCode::BAD_REQUEST,
            Self::FailedToParseVariables(_) => StatusCode::BAD_REQUEST,
            // Unknown names are a logical error of the operation, reported the GraphQL way.
            Self::CompileError(CompileError::SchemaResolution { .. }) => StatusCode::OK,
            Self::CompileError(_) => StatusCode::BAD_REQUEST,
            Self::MetadataUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::DownstreamRequestFailed(ODataClientError::RequestTimeout(..)) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            Self::DownstreamRequestFailed(_) => StatusCode::BAD_GATEWAY,
            Self::ReshapeFailed(_) => StatusCode::BAD_GATEWAY,
            Self::RequestBuildFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ResponseSerializationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GraphQLErrorExtensions {
    pub code: &'static str,
}

#[derive(Serialize, Debug, Clone)]
pub struct GraphQLError {
    pub message: String,
    pub extensions: GraphQLErrorExtensions,
}

#[derive(Serialize, Debug, Clone)]
pub struct FailedExecutionResult {
    pub errors: Vec<GraphQLError>,
}

impl From<PipelineError> for Response {
    fn from(val: PipelineError) -> Self {
        let status = val.default_status_code();
        let result = FailedExecutionResult {
            errors: vec![GraphQLError {
                message: val.graphql_error_message(),
                extensions: GraphQLErrorExtensions {
                    code: val.graphql_error_code(),
                },
            }],
        };

        ResponseBuilder::new(status).json(&result)
    }
}
