use graphql_odata_compiler::{descriptor::JSON_CONTENT_TYPE, reshape_response};
use http::header::{CONNECTION, CONTENT_LENGTH, TRANSFER_ENCODING};
use ntex::{
    http::ResponseBuilder,
    util::Bytes,
    web::{self, HttpResponse},
};
use tracing::trace;

use crate::{odata_client::DownstreamResponse, pipeline::error::PipelineError};

/// Builds the GraphQL response for a compiled operation.
///
/// Always `200 OK` with a JSON body: downstream failures travel inside `errors`.
pub fn reshape_downstream_response(
    response: &DownstreamResponse,
    correlation: &[String],
) -> Result<HttpResponse, PipelineError> {
    let envelope = reshape_response(response.status.as_u16(), &response.body, correlation)?;
    let body = sonic_rs::to_vec(&envelope).map_err(PipelineError::ResponseSerializationFailed)?;

    trace!(
        downstream_status = response.status.as_u16(),
        bytes = body.len(),
        "reshaped OData response"
    );

    Ok(web::HttpResponse::Ok()
        .content_type(JSON_CONTENT_TYPE)
        .body(Bytes::from(body)))
}

/// Returns a passed-through response to the client as the OData service sent it.
pub fn passthrough_response(response: DownstreamResponse) -> HttpResponse {
    let mut response_builder = ResponseBuilder::new(response.status);
    for (header_name, header_value) in response.headers.iter() {
        if header_name == CONTENT_LENGTH
            || header_name == TRANSFER_ENCODING
            || header_name == CONNECTION
        {
            continue;
        }
        response_builder.header(header_name.clone(), header_value.clone());
    }

    response_builder.body(Bytes::copy_from_slice(&response.body))
}
