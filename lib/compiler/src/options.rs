/// Knobs that change the shape of the emitted OData request.
#[derive(Clone, Debug, PartialEq)]
pub struct CompilerOptions {
    /// Emit `gte`/`lte` for `_gte`/`_lte` filters instead of the OData `ge`/`le`.
    pub legacy_range_operators: bool,
    /// Property ordered descending when `last` is used without an explicit ordering.
    pub last_order_field: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            legacy_range_operators: false,
            last_order_field: "id".to_string(),
        }
    }
}
