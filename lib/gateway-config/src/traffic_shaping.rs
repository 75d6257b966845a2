use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(deny_unknown_fields)]
pub struct TrafficShapingConfig {
    /// Limits the concurrent amount of requests in flight to the OData service.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Timeout for idle sockets being kept-alive.
    #[serde(default = "default_pool_idle_timeout_seconds")]
    pub pool_idle_timeout_seconds: u64,
}

impl Default for TrafficShapingConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            pool_idle_timeout_seconds: default_pool_idle_timeout_seconds(),
        }
    }
}

fn default_max_connections() -> usize {
    100
}

fn default_pool_idle_timeout_seconds() -> u64 {
    50
}
