use serde::{Deserialize, Serialize};

/// Controls how the knowledge-graph lifecycle engine resolves new facts
/// against existing ones for the same `(subject, predicate)` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEngineConfig {
    /// Maximum ACTIVE facts permitted under an ADDITIVE predicate before the
    /// oldest is superseded to keep the set bounded.
    #[serde(default = "d_additive_cap")]
    pub additive_cap: usize,
    /// Window, in seconds, within which two TEMPORAL facts for the same key
    /// are considered the same occurrence (coexist) rather than a new one.
    #[serde(default = "d_temporal_coalesce_secs")]
    pub temporal_coalesce_secs: u64,
    /// Whether a superseded fact's history is retained (status=SUPERSEDED)
    /// or hard-deleted. Retention enables audit/undo.
    #[serde(default = "d_retain_superseded")]
    pub retain_superseded: bool,
    /// Absolute confidence an EXCLUSIVE candidate and the existing ACTIVE
    /// fact it contradicts must both meet or exceed for the pair to be
    /// flagged CONFLICT instead of the new value superseding the old one.
    #[serde(default = "d_conflict_threshold")]
    pub conflict_threshold: f64,
}

impl Default for LifecycleEngineConfig {
    fn default() -> Self {
        Self {
            additive_cap: d_additive_cap(),
            temporal_coalesce_secs: d_temporal_coalesce_secs(),
            retain_superseded: d_retain_superseded(),
            conflict_threshold: d_conflict_threshold(),
        }
    }
}

fn d_additive_cap() -> usize {
    20
}
fn d_temporal_coalesce_secs() -> u64 {
    300
}
fn d_retain_superseded() -> bool {
    true
}
fn d_conflict_threshold() -> f64 {
    0.7
}
