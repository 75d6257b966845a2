use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the OData service lives and how compiled requests are addressed to it.
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ODataConfig {
    /// Base URL of the OData service, e.g. `http://localhost:5000`.
    ///
    /// Can also be set via the `ODATA_ENDPOINT` environment variable.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Path segment under which the OData service root is mounted. Compiled requests are sent to
    /// `<endpoint>/<path_prefix>/<entity set or $batch>`.
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,

    /// Maximum time to wait for the OData service to respond.
    ///
    /// Default: `30s`.
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "humantime_serde::deserialize",
        serialize_with = "humantime_serde::serialize"
    )]
    #[schemars(with = "String")]
    pub request_timeout: Duration,
}

impl Default for ODataConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            path_prefix: default_path_prefix(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_path_prefix() -> String {
    "odata".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

impl ODataConfig {
    /// The OData service root, without a trailing slash.
    pub fn service_root(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        let prefix = self.path_prefix.trim_matches('/');

        if prefix.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}/{}", endpoint, prefix)
        }
    }

    /// The absolute URL a compiled route is sent to.
    pub fn route_url(&self, route: &str) -> String {
        format!("{}/{}", self.service_root(), route.trim_start_matches('/'))
    }

    pub fn default_metadata_url(&self) -> String {
        self.route_url("$metadata?$format=json")
    }
}
