pub mod compiler;
mod env_overrides;
pub mod http_server;
pub mod log;
pub mod metadata;
pub mod odata;
pub mod primitives;
pub mod traffic_shaping;

use config::{Config, File, FileFormat, FileSourceFile};
use envconfig::Envconfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::path::{Path, PathBuf};

use crate::{
    compiler::CompilerConfig,
    env_overrides::{EnvVarOverrides, EnvVarOverridesError},
    http_server::HttpServerConfig,
    log::LoggingConfig,
    metadata::MetadataSource,
    odata::ODataConfig,
    primitives::file_path::with_start_path,
    traffic_shaping::TrafficShapingConfig,
};

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(skip)]
    root_directory: PathBuf,

    /// The gateway logger configuration.
    ///
    /// The gateway is configured to be mostly silent (`info`) level, and will print only important messages, warnings, and errors.
    #[serde(default)]
    pub log: LoggingConfig,

    /// Configuration for the HTTP server/listener.
    #[serde(default)]
    pub http: HttpServerConfig,

    /// Location of the OData service compiled requests are forwarded to.
    #[serde(default)]
    pub odata: ODataConfig,

    /// Configuration for the OData metadata source. By default, the gateway fetches `$metadata`
    /// from the OData service the first time it is needed.
    #[serde(default)]
    #[schemars(extend("type" = "object"))]
    pub metadata: MetadataSource,

    /// Configuration for the traffic-shaping of requests sent to the OData service.
    #[serde(default)]
    pub traffic_shaping: TrafficShapingConfig,

    /// Configuration of the GraphQL to OData compiler.
    #[serde(default)]
    pub compiler: CompilerConfig,
}

impl GatewayConfig {
    pub fn address(&self) -> String {
        self.http.address()
    }

    pub fn graphql_path(&self) -> &str {
        &self.http.graphql_endpoint
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayConfigError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
    #[error("Failed to apply configuration overrides: {0}")]
    EnvVarOverridesError(#[from] EnvVarOverridesError),
    #[error("Failed to load the environment variables: {0}")]
    EnvVarLoadError(#[from] envconfig::Error),
    #[error("Failed to get the current directory: {0}")]
    CurrentDirError(std::io::Error),
    #[error("Failed to parse the configuration file path: {0}")]
    ConfigPathParseError(Infallible),
}

static DEFAULT_FILE_NAMES: &[&str] = &[
    "gateway.config.yaml",
    "gateway.config.yml",
    "gateway.config.json",
    "gateway.config.json5",
];

fn get_current_dir() -> Result<PathBuf, GatewayConfigError> {
    std::env::current_dir().map_err(GatewayConfigError::CurrentDirError)
}

pub fn load_config(override_config_path: Option<String>) -> Result<GatewayConfig, GatewayConfigError> {
    let env_overrides = EnvVarOverrides::init_from_env()?;
    let mut config = Config::builder();
    let mut config_root_path = get_current_dir()?;

    if let Some(path_str) = override_config_path {
        let path_buf = path_str
            .parse::<PathBuf>()
            .map_err(GatewayConfigError::ConfigPathParseError)?;
        if let Some(parent_dir) = path_buf.parent() {
            config_root_path = config_root_path.join(parent_dir);
        }
        let as_file: File<FileSourceFile, _> = path_buf.into();

        config = config.add_source(as_file.required(true));
    } else {
        for name in DEFAULT_FILE_NAMES {
            config = config.add_source(File::with_name(name).required(false));
        }
    }

    config = env_overrides.apply_overrides(config)?;

    let mut base_cfg = with_start_path(&config_root_path, || {
        config.build()?.try_deserialize::<GatewayConfig>()
    })?;

    base_cfg.root_directory = config_root_path;

    Ok(base_cfg)
}

pub fn parse_yaml_config(config_raw: String) -> Result<GatewayConfig, GatewayConfigError> {
    let config_root_path = get_current_dir()?;
    let config = Config::builder();

    let mut base_cfg = with_start_path(&config_root_path, || {
        config
            .add_source(File::from_str(&config_raw, FileFormat::Yaml))
            .build()?
            .try_deserialize::<GatewayConfig>()
    })?;

    base_cfg.root_directory = config_root_path;

    Ok(base_cfg)
}
