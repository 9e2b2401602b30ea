use serde::{Deserialize, Serialize};

/// Thresholds for the memory write gate's bucket decision.
///
/// A candidate fact is scored on three axes — utility, stability, and
/// extraction confidence — and the combination of which thresholds it
/// clears decides whether it is discarded or written to SESSION,
/// EPHEMERAL, LONG_TERM, or PROSPECTIVE storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryWriteGateConfig {
    /// Policy kill switch: when `false`, every candidate is discarded before
    /// any durability fast path or scoring runs.
    #[serde(default = "d_write_enabled")]
    pub write_enabled: bool,
    /// Minimum utility score to keep a candidate at all.
    #[serde(default = "d_utility_threshold")]
    pub utility_threshold: f64,
    /// Minimum stability score required for LONG_TERM placement.
    #[serde(default = "d_stability_threshold")]
    pub stability_threshold: f64,
    /// Minimum extraction confidence required for LONG_TERM placement.
    #[serde(default = "d_confidence_threshold")]
    pub confidence_threshold: f64,
    /// Number of corroborating mentions required before a low-confidence
    /// candidate is promoted out of EPHEMERAL.
    #[serde(default = "d_recurrence_count")]
    pub recurrence_count: u32,
    /// TTL in seconds for EPHEMERAL-bucket facts.
    #[serde(default = "d_ephemeral_ttl_secs")]
    pub ephemeral_ttl_secs: u64,
    /// TTL in seconds for SESSION-bucket facts (usually the session lifetime).
    #[serde(default = "d_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for MemoryWriteGateConfig {
    fn default() -> Self {
        Self {
            write_enabled: d_write_enabled(),
            utility_threshold: d_utility_threshold(),
            stability_threshold: d_stability_threshold(),
            confidence_threshold: d_confidence_threshold(),
            recurrence_count: d_recurrence_count(),
            ephemeral_ttl_secs: d_ephemeral_ttl_secs(),
            session_ttl_secs: d_session_ttl_secs(),
        }
    }
}

fn d_write_enabled() -> bool {
    true
}
fn d_utility_threshold() -> f64 {
    0.3
}
fn d_stability_threshold() -> f64 {
    0.6
}
fn d_confidence_threshold() -> f64 {
    0.7
}
fn d_recurrence_count() -> u32 {
    2
}
fn d_ephemeral_ttl_secs() -> u64 {
    6 * 3600
}
fn d_session_ttl_secs() -> u64 {
    24 * 3600
}
