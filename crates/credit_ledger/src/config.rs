//! Crate-wide tunables threaded through the use-case layer.

/// Knobs that the original hardcoded but which a real deployment would
/// want to tune per environment.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Upper bound on a single `add`/`consume` amount, rejected before it
    /// ever reaches the aggregate. `0` means unbounded.
    pub max_movement_amount: u64,
    /// Default `kind_label` used by `add` when the caller doesn't name a
    /// contracted service.
    pub default_kind_label: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            max_movement_amount: 0,
            default_kind_label: "SUBSCRIPTION".to_string(),
        }
    }
}
