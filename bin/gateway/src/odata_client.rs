use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use graphql_odata_config::traffic_shaping::TrafficShapingConfig;
use http::{HeaderMap, Method, StatusCode, Uri, Version};
use http_body_util::{BodyExt, Full};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};
use tokio::sync::Semaphore;
use tracing::{debug, trace};

/// A fully buffered request to the OData service.
#[derive(Debug)]
pub struct DownstreamRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A fully buffered response of the OData service.
#[derive(Debug)]
pub struct DownstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum ODataClientError {
    #[error("Failed to build request to '{0}': {1}")]
    RequestBuildFailure(String, String),
    #[error("Request to '{0}' failed: {1}")]
    RequestFailure(String, String),
    #[error("Request to '{0}' timed out after {1:?}")]
    RequestTimeout(String, Duration),
    #[error("The OData client is shutting down")]
    LimiterClosed,
}

pub struct ODataClient {
    http_client: Client<HttpConnector, Full<Bytes>>,
    semaphore: Arc<Semaphore>,
    timeout: Duration,
}

impl ODataClient {
    pub fn new(traffic_shaping: &TrafficShapingConfig, timeout: Duration) -> Self {
        let mut builder = Client::builder(TokioExecutor::new());
        let builder_mut = builder
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(Duration::from_secs(
                traffic_shaping.pool_idle_timeout_seconds,
            ));
        let http_client = builder_mut.build_http();

        Self {
            http_client,
            semaphore: Arc::new(Semaphore::new(traffic_shaping.max_connections.max(1))),
            timeout,
        }
    }

    /// Sends `request` and buffers the whole response body.
    ///
    /// Waits for a free slot when `max_connections` requests are already in flight.
    pub async fn send(
        &self,
        request: DownstreamRequest,
    ) -> Result<DownstreamResponse, ODataClientError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ODataClientError::LimiterClosed)?;
        let endpoint = request.uri.to_string();

        match tokio::time::timeout(self.timeout, self.execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(ODataClientError::RequestTimeout(endpoint, self.timeout)),
        }
    }

    async fn execute(
        &self,
        request: DownstreamRequest,
    ) -> Result<DownstreamResponse, ODataClientError> {
        let endpoint = request.uri.to_string();
        debug!(method = %request.method, uri = endpoint, "sending request to OData service");

        let mut req = hyper::Request::builder()
            .method(request.method)
            .uri(request.uri)
            .version(Version::HTTP_11)
            .body(Full::new(request.body))
            .map_err(|e| ODataClientError::RequestBuildFailure(endpoint.clone(), e.to_string()))?;

        *req.headers_mut() = request.headers;

        let res = self
            .http_client
            .request(req)
            .await
            .map_err(|e| ODataClientError::RequestFailure(endpoint.clone(), e.to_string()))?;

        let (parts, body) = res.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| ODataClientError::RequestFailure(endpoint.clone(), e.to_string()))?
            .to_bytes();

        trace!(
            uri = endpoint,
            status = parts.status.as_u16(),
            bytes = body.len(),
            "received response from OData service"
        );

        Ok(DownstreamResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}
