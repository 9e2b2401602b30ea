use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Character budgets and per-intent layer weights for the context builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextBudgetConfig {
    /// Hard cap on total injected characters, applied after per-layer caps.
    #[serde(default = "d_total_max")]
    pub total_max_chars: usize,
    /// Per-layer cap before weighting (`transcript`, `episodic`, `semantic`,
    /// `profile`, `scratch`).
    #[serde(default = "d_layer_max")]
    pub layer_max_chars: usize,
    /// Relative weight per intent per layer; missing entries default to 1.0.
    /// Keyed by intent name (e.g. `"recall"`, `"smalltalk"`, `"task"`).
    #[serde(default)]
    pub intent_layer_weights: HashMap<String, HashMap<String, f64>>,
}

impl Default for ContextBudgetConfig {
    fn default() -> Self {
        Self {
            total_max_chars: d_total_max(),
            layer_max_chars: d_layer_max(),
            intent_layer_weights: HashMap::new(),
        }
    }
}

fn d_total_max() -> usize {
    24_000
}
fn d_layer_max() -> usize {
    6_000
}
