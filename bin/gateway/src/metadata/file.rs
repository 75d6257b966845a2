use async_trait::async_trait;
use graphql_odata_config::primitives::file_path::FilePath;
use tokio::fs;
use tracing::{debug, info};

use crate::metadata::base::{LoadMetadataError, MetadataLoader};

pub struct MetadataFileLoader {
    file_path: FilePath,
}

impl MetadataFileLoader {
    pub fn new(file_path: &FilePath) -> Box<Self> {
        debug!(
            file_path = file_path.absolute,
            "Creating metadata source from a file",
        );

        Box::new(Self {
            file_path: file_path.clone(),
        })
    }
}

#[async_trait]
impl MetadataLoader for MetadataFileLoader {
    async fn load(&self) -> Result<String, LoadMetadataError> {
        let content = fs::read_to_string(&self.file_path.absolute).await?;

        info!(
            file_path = self.file_path.absolute,
            "OData metadata successfully loaded from a local file"
        );

        Ok(content)
    }
}
