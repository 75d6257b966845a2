use bytes::Bytes;
use graphql_odata_compiler::{
    descriptor::{JSON_CONTENT_TYPE, ODATA_ACCEPT, ODATA_VERSION},
    CompiledOperation,
};
use graphql_odata_config::odata::ODataConfig;
use http::{
    header::{ACCEPT, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HOST},
    HeaderMap, HeaderName, HeaderValue, Uri,
};
use ntex::web::HttpRequest;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::debug;

use crate::{odata_client::DownstreamRequest, pipeline::error::PipelineError};

const ODATA_VERSION_HEADER: HeaderName = HeaderName::from_static("odata-version");

/// Bytes a compiled route or query string may contain that are not allowed in a URI.
/// OData syntax characters (`$ ' ( ) , ; / = &`) are kept as they are, and `%` is left
/// alone since literals arrive already percent-encoded.
const DOWNSTREAM_URI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub fn encode_downstream_uri(target: &str) -> Result<Uri, PipelineError> {
    let encoded = utf8_percent_encode(target, DOWNSTREAM_URI_ENCODE_SET).to_string();

    encoded.parse::<Uri>().map_err(|err| {
        PipelineError::RequestBuildFailure(format!("invalid OData URI '{}': {}", encoded, err))
    })
}

/// Turns a compiled operation into the request sent to the OData service:
/// `<service root>/<route><query string>` with the OData headers and the JSON body.
pub fn rewrite_request(
    operation: &CompiledOperation,
    odata: &ODataConfig,
) -> Result<DownstreamRequest, PipelineError> {
    let request = &operation.request;
    let target = format!("{}{}", request.route(), request.query_string());
    let uri = encode_downstream_uri(&odata.route_url(&target))?;
    let body = request
        .body()
        .map_err(|err| PipelineError::RequestBuildFailure(err.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ODATA_ACCEPT));
    headers.insert(ODATA_VERSION_HEADER, HeaderValue::from_static(ODATA_VERSION));
    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    }

    debug!(
        method = %request.method(),
        uri = %uri,
        batch = operation.is_batch(),
        "rewrote GraphQL request into an OData request"
    );

    Ok(DownstreamRequest {
        method: request.method(),
        uri,
        headers,
        body: body.map(Bytes::from).unwrap_or_default(),
    })
}

/// Forwards `req` to the OData service as it is, under the same path and query.
pub fn passthrough_request(
    req: &HttpRequest,
    body: &[u8],
    odata: &ODataConfig,
) -> Result<DownstreamRequest, PipelineError> {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = format!("{}{}", odata.endpoint.trim_end_matches('/'), path_and_query);
    let uri = target.parse::<Uri>().map_err(|err| {
        PipelineError::RequestBuildFailure(format!("invalid OData URI '{}': {}", target, err))
    })?;

    let mut headers = HeaderMap::new();
    for (name, value) in req.headers().iter() {
        if name == HOST || name == CONTENT_LENGTH || name == CONNECTION {
            continue;
        }
        if let Ok(value) = HeaderValue::from_bytes(value.as_bytes()) {
            headers.append(name.clone(), value);
        }
    }

    debug!(method = %req.method(), uri = %uri, "passing request through to the OData service");

    Ok(DownstreamRequest {
        method: req.method().clone(),
        uri,
        headers,
        body: Bytes::copy_from_slice(body),
    })
}
