use std::sync::Arc;

use ntex::web::{self, Responder};
use tracing::warn;

use crate::schema_state::SchemaState;

pub async fn health_check_handler() -> impl Responder {
    web::HttpResponse::Ok()
}

/// Ready once the OData model is loaded. Triggers the load when it has not happened yet.
pub async fn readiness_check_handler(
    schema_state: web::types::State<Arc<SchemaState>>,
) -> impl Responder {
    if schema_state.is_ready() {
        return web::HttpResponse::Ok();
    }

    match schema_state.model().await {
        Ok(_) => web::HttpResponse::Ok(),
        Err(err) => {
            warn!("OData model is not available yet: {}", err);
            web::HttpResponse::ServiceUnavailable()
        }
    }
}
