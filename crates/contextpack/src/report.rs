use serde::{Deserialize, Serialize};

/// Per-layer report within a context build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerReport {
    pub layer: String,
    pub raw_chars: usize,
    pub injected_chars: usize,
    pub truncated_per_layer: bool,
    pub truncated_total_cap: bool,
    pub included: bool,
}

/// Full report of a context build — returned by `GET /v1/context` (debug).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextReport {
    pub intent: String,
    pub mode: String,
    pub layers: Vec<LayerReport>,
    /// Episode ids that made it into the episodic layer, in ranked order.
    pub selected_episode_ids: Vec<String>,
    pub total_injected_chars: usize,
    pub conflict_note_included: bool,
    pub dst_reference: Option<String>,
}
