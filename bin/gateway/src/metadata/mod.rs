pub mod base;
pub mod file;
pub mod remote;

use std::sync::Arc;

use graphql_odata_config::{metadata::MetadataSource, GatewayConfig};

use crate::{
    metadata::{
        base::{LoadMetadataError, MetadataLoader},
        file::MetadataFileLoader,
        remote::MetadataRemoteLoader,
    },
    odata_client::ODataClient,
};

pub fn resolve_from_config(
    config: &GatewayConfig,
    client: Arc<ODataClient>,
) -> Result<Box<dyn MetadataLoader>, LoadMetadataError> {
    match &config.metadata {
        MetadataSource::File { path } => Ok(MetadataFileLoader::new(path)),
        MetadataSource::Remote { url: Some(url) } => Ok(MetadataRemoteLoader::new(url, client)?),
        MetadataSource::Remote { url: None } => Ok(MetadataRemoteLoader::new(
            &config.odata.default_metadata_url(),
            client,
        )?),
    }
}
