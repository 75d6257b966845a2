use std::time::Instant;

use tracing::{debug, error};

use crate::{
    odata_client::{DownstreamRequest, DownstreamResponse, ODataClient},
    pipeline::error::PipelineError,
};

pub async fn execute_downstream(
    client: &ODataClient,
    request: DownstreamRequest,
) -> Result<DownstreamResponse, PipelineError> {
    let started_at = Instant::now();

    let response = client.send(request).await.map_err(|err| {
        error!("Failed to execute request to the OData service: {}", err);
        PipelineError::DownstreamRequestFailed(err)
    })?;

    debug!(
        status = response.status.as_u16(),
        bytes = response.body.len(),
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        "OData service responded"
    );

    Ok(response)
}
