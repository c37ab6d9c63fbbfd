use serde::{Deserialize, Serialize};

/// Preference table settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceConfig {
    /// Rank of the preferred reply (lower is better)
    pub rank_chosen: f64,
    /// Rank of the dispreferred reply
    pub rank_rejected: f64,
    /// Cap on the number of conversation trees sampled
    pub max_trees: Option<usize>,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            rank_chosen: 0.0,
            rank_rejected: 1.0,
            max_trees: None,
        }
    }
}
