use config::{builder::BuilderState, ConfigBuilder, ConfigError};
use envconfig::Envconfig;
use tracing::debug;

use crate::log::{LogFormat, LogLevel};

#[derive(Envconfig)]
pub struct EnvVarOverrides {
    // Logger overrides
    #[envconfig(from = "LOG_LEVEL")]
    pub log_level: Option<LogLevel>,
    #[envconfig(from = "LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
    #[envconfig(from = "LOG_FILTER")]
    pub log_filter: Option<String>,

    // HTTP overrides
    #[envconfig(from = "PORT")]
    pub http_port: Option<u64>,
    #[envconfig(from = "HOST")]
    pub http_host: Option<String>,

    // OData overrides
    #[envconfig(from = "ODATA_ENDPOINT")]
    pub odata_endpoint: Option<String>,
    #[envconfig(from = "ODATA_METADATA_FILE_PATH")]
    pub metadata_file_path: Option<String>,
    #[envconfig(from = "ODATA_METADATA_URL")]
    pub metadata_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnvVarOverridesError {
    #[error("Failed to override configuration: {0}")]
    FailedToOverrideConfig(#[from] ConfigError),
    #[error("Cannot override metadata source due to conflict: ODATA_METADATA_FILE_PATH and ODATA_METADATA_URL cannot be used together")]
    ConflictingMetadataSource,
}

impl EnvVarOverrides {
    pub fn apply_overrides<T: BuilderState>(
        mut self,
        mut config: ConfigBuilder<T>,
    ) -> Result<ConfigBuilder<T>, EnvVarOverridesError> {
        if let Some(log_level) = self.log_level.take() {
            debug!("[config-override] 'log.level' = {:?}", log_level);
            config = config.set_override("log.level", log_level.as_str())?;
        }
        if let Some(log_format) = self.log_format.take() {
            debug!("[config-override] 'log.format' = {:?}", log_format);
            config = config.set_override("log.format", log_format.as_str())?;
        }
        if let Some(log_filter) = self.log_filter.take() {
            debug!("[config-override] 'log.filter' = {:?}", log_filter);
            config = config.set_override("log.filter", log_filter)?;
        }

        if let Some(http_port) = self.http_port.take() {
            debug!("[config-override] 'http.port' = {}", http_port);
            config = config.set_override("http.port", http_port)?;
        }
        if let Some(http_host) = self.http_host.take() {
            debug!("[config-override] 'http.host' = {}", http_host);
            config = config.set_override("http.host", http_host)?;
        }

        if let Some(odata_endpoint) = self.odata_endpoint.take() {
            debug!("[config-override] 'odata.endpoint' = {}", odata_endpoint);
            config = config.set_override("odata.endpoint", odata_endpoint)?;
        }

        if self.metadata_file_path.is_some() && self.metadata_url.is_some() {
            return Err(EnvVarOverridesError::ConflictingMetadataSource);
        }

        if let Some(metadata_file_path) = self.metadata_file_path.take() {
            debug!("[config-override] 'metadata.path' = {}", metadata_file_path);
            config = config.set_override("metadata.source", "file")?;
            config = config.set_override("metadata.path", metadata_file_path)?;
        }

        if let Some(metadata_url) = self.metadata_url.take() {
            debug!("[config-override] 'metadata.url' = {}", metadata_url);
            config = config.set_override("metadata.source", "remote")?;
            config = config.set_override("metadata.url", metadata_url)?;
        }

        Ok(config)
    }
}
