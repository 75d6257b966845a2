use std::sync::Arc;

use graphql_odata_compiler::CompilerOptions;
use graphql_odata_config::{compiler::CompilerConfig, GatewayConfig};

use crate::odata_client::ODataClient;

pub struct GatewaySharedState {
    pub config: Arc<GatewayConfig>,
    pub compiler_options: CompilerOptions,
    pub odata_client: Arc<ODataClient>,
}

impl GatewaySharedState {
    pub fn new(config: Arc<GatewayConfig>, odata_client: Arc<ODataClient>) -> Self {
        Self {
            compiler_options: compiler_options_from_config(&config.compiler),
            config,
            odata_client,
        }
    }
}

fn compiler_options_from_config(config: &CompilerConfig) -> CompilerOptions {
    CompilerOptions {
        legacy_range_operators: config.legacy_range_operators,
        last_order_field: config.last_order_field.clone(),
    }
}
