use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Knobs for the GraphQL to OData translation.
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    /// Emit `gte`/`lte` for `_gte`/`_lte` filter suffixes instead of the standard OData `ge`/`le`.
    ///
    /// Only useful for backends that were built against the non-standard operators.
    #[serde(default)]
    pub legacy_range_operators: bool,

    /// The property a `last: n` argument orders by (descending) when no explicit ordering is given.
    #[serde(default = "default_last_order_field")]
    pub last_order_field: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            legacy_range_operators: false,
            last_order_field: default_last_order_field(),
        }
    }
}

fn default_last_order_field() -> String {
    "id".to_string()
}
