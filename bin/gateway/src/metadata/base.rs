use async_trait::async_trait;
use graphql_odata_compiler::SchemaError;
use http::StatusCode;

use crate::odata_client::ODataClientError;

#[derive(Debug, thiserror::Error)]
pub enum LoadMetadataError {
    #[error("Failed to read metadata file: {0}")]
    ReadFileError(#[from] std::io::Error),
    #[error("Failed to fetch metadata from network: {0}")]
    NetworkError(#[from] ODataClientError),
    #[error("Metadata endpoint '{0}' responded with status {1}")]
    UnexpectedStatus(String, StatusCode),
    #[error("Metadata document is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),
    #[error("Invalid metadata URL '{0}'")]
    InvalidUrl(String),
    #[error("Failed to build the OData model: {0}")]
    InvalidMetadata(#[from] SchemaError),
}

/// A source of the OData CSDL document, in either representation.
#[async_trait]
pub trait MetadataLoader: Send + Sync {
    async fn load(&self) -> Result<String, LoadMetadataError>;
}
