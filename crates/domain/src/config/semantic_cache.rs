use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    #[serde(default = "d_enabled")]
    pub enabled: bool,
    /// Minimum cosine similarity for a cache hit.
    #[serde(default = "d_similarity_threshold")]
    pub similarity_threshold: f32,
    /// Entry time-to-live in seconds.
    #[serde(default = "d_ttl_secs")]
    pub ttl_secs: u64,
    /// Max entries retained per cache key namespace before LRU eviction.
    #[serde(default = "d_max_entries")]
    pub max_entries: usize,
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            enabled: d_enabled(),
            similarity_threshold: d_similarity_threshold(),
            ttl_secs: d_ttl_secs(),
            max_entries: d_max_entries(),
        }
    }
}

fn d_enabled() -> bool {
    true
}
fn d_similarity_threshold() -> f32 {
    0.92
}
fn d_ttl_secs() -> u64 {
    900
}
fn d_max_entries() -> usize {
    10_000
}
