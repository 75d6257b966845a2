use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{header::ACCEPT, HeaderMap, HeaderValue, Method, Uri};
use tracing::{debug, info};

use crate::{
    metadata::base::{LoadMetadataError, MetadataLoader},
    odata_client::{DownstreamRequest, ODataClient},
};

/// JSON is preferred, XML is accepted for services without a JSON `$metadata` representation.
const METADATA_ACCEPT: &str = "application/json, application/xml;q=0.9";

pub struct MetadataRemoteLoader {
    url: Uri,
    client: Arc<ODataClient>,
}

impl MetadataRemoteLoader {
    pub fn new(url: &str, client: Arc<ODataClient>) -> Result<Box<Self>, LoadMetadataError> {
        let url = url
            .parse::<Uri>()
            .map_err(|_| LoadMetadataError::InvalidUrl(url.to_string()))?;

        debug!(url = %url, "Creating metadata source from the OData service");

        Ok(Box::new(Self { url, client }))
    }
}

#[async_trait]
impl MetadataLoader for MetadataRemoteLoader {
    async fn load(&self) -> Result<String, LoadMetadataError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(METADATA_ACCEPT));

        let response = self
            .client
            .send(DownstreamRequest {
                method: Method::GET,
                uri: self.url.clone(),
                headers,
                body: Bytes::new(),
            })
            .await?;

        if !response.status.is_success() {
            return Err(LoadMetadataError::UnexpectedStatus(
                self.url.to_string(),
                response.status,
            ));
        }

        let content = String::from_utf8(response.body.to_vec())?;

        info!(url = %self.url, "OData metadata successfully fetched");

        Ok(content)
    }
}
