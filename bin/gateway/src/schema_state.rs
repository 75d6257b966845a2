use std::sync::Arc;

use graphql_odata_compiler::EdmModel;
use graphql_odata_config::GatewayConfig;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::{
    metadata::{
        base::{LoadMetadataError, MetadataLoader},
        resolve_from_config,
    },
    odata_client::ODataClient,
};

/// The OData model the compiler resolves names against.
///
/// Loaded lazily on first use. Concurrent first requests wait on a single load, later
/// requests read the cached model without locking. A failed load is not cached, the next
/// request tries again.
pub struct SchemaState {
    loader: Box<dyn MetadataLoader>,
    model: OnceCell<Arc<EdmModel>>,
}

impl SchemaState {
    pub fn new(loader: Box<dyn MetadataLoader>) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
        }
    }

    pub fn new_from_config(
        config: &GatewayConfig,
        client: Arc<ODataClient>,
    ) -> Result<Self, LoadMetadataError> {
        Ok(Self::new(resolve_from_config(config, client)?))
    }

    pub fn is_ready(&self) -> bool {
        self.model.initialized()
    }

    pub async fn model(&self) -> Result<Arc<EdmModel>, LoadMetadataError> {
        self.model
            .get_or_try_init(|| async {
                debug!("OData model is not loaded yet, loading metadata...");

                let csdl = self.loader.load().await.map_err(|err| {
                    error!("Failed to load OData metadata: {}", err);
                    err
                })?;
                let model = EdmModel::from_csdl(&csdl).map_err(|err| {
                    error!("Failed to build OData model from metadata: {}", err);
                    err
                })?;

                info!(
                    entity_sets = model.entity_sets().count(),
                    types = model.types().count(),
                    "OData model is ready"
                );

                Ok::<_, LoadMetadataError>(Arc::new(model))
            })
            .await
            .cloned()
    }
}
