mod consts;
pub mod http_utils;
mod logger;
pub mod metadata;
pub mod odata_client;
pub mod pipeline;
mod schema_state;
mod shared_state;

use std::sync::Arc;

use crate::{
    consts::GATEWAY_VERSION,
    http_utils::probes::{health_check_handler, readiness_check_handler},
    logger::configure_logging,
    odata_client::ODataClient,
    pipeline::graphql_request_handler,
};

pub use crate::{schema_state::SchemaState, shared_state::GatewaySharedState};

use graphql_odata_config::{load_config, GatewayConfig};
use ntex::{
    util::Bytes,
    web::{self, HttpRequest},
};
use tracing::{info, warn};

async fn graphql_endpoint_handler(
    request: HttpRequest,
    body_bytes: Bytes,
    schema_state: web::types::State<Arc<SchemaState>>,
    app_state: web::types::State<Arc<GatewaySharedState>>,
) -> web::HttpResponse {
    match graphql_request_handler(
        &request,
        body_bytes,
        app_state.get_ref(),
        schema_state.get_ref(),
    )
    .await
    {
        Ok(response) => response,
        Err(err) => {
            warn!(code = err.graphql_error_code(), "GraphQL request failed: {}", err);
            err.into()
        }
    }
}

pub async fn gateway_entrypoint() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("GATEWAY_CONFIG_FILE_PATH").ok();
    let gateway_config = load_config(config_path)?;
    configure_logging(&gateway_config.log);
    info!("graphql-odata-gateway@{} starting...", GATEWAY_VERSION);

    let addr = gateway_config.address();
    let (shared_state, schema_state) = configure_app_from_config(gateway_config)?;

    info!(
        odata = %shared_state.config.odata.service_root(),
        graphql_endpoint = shared_state.config.graphql_path(),
        "listening on {}",
        addr
    );

    web::HttpServer::new(async move || {
        web::App::new()
            .state(shared_state.clone())
            .state(schema_state.clone())
            .configure(|service_config| {
                configure_ntex_app(service_config, &shared_state.config);
            })
    })
    .bind(addr)?
    .run()
    .await?;

    info!("server stopped");

    Ok(())
}

pub fn configure_app_from_config(
    gateway_config: GatewayConfig,
) -> Result<(Arc<GatewaySharedState>, Arc<SchemaState>), Box<dyn std::error::Error>> {
    let odata_client = Arc::new(ODataClient::new(
        &gateway_config.traffic_shaping,
        gateway_config.odata.request_timeout,
    ));
    let schema_state = SchemaState::new_from_config(&gateway_config, odata_client.clone())?;
    let shared_state = GatewaySharedState::new(Arc::new(gateway_config), odata_client);

    Ok((Arc::new(shared_state), Arc::new(schema_state)))
}

pub fn configure_ntex_app(service_config: &mut web::ServiceConfig, gateway_config: &GatewayConfig) {
    service_config
        .route(gateway_config.graphql_path(), web::to(graphql_endpoint_handler))
        .route("/health", web::to(health_check_handler))
        .route("/readiness", web::to(readiness_check_handler));
}
