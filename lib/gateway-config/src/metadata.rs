use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::primitives::file_path::FilePath;

/// Where the OData CSDL metadata document, JSON or XML, is read from.
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "source")]
pub enum MetadataSource {
    /// Fetches `$metadata` from the OData service on first use.
    #[serde(rename = "remote")]
    Remote {
        /// Absolute URL of the metadata document. Defaults to
        /// `<odata.endpoint>/<odata.path_prefix>/$metadata?$format=json`.
        ///
        /// Can also be set via the `ODATA_METADATA_URL` environment variable.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    /// Loads a CSDL JSON or XML document from the filesystem.
    /// The path can be either absolute or relative to the configuration file.
    ///
    /// Can also be set via the `ODATA_METADATA_FILE_PATH` environment variable.
    #[serde(rename = "file")]
    File { path: FilePath },
}

impl Default for MetadataSource {
    fn default() -> Self {
        MetadataSource::Remote { url: None }
    }
}
