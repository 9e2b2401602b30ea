use serde::{Deserialize, Serialize};

/// Legacy auto-capture toggles, predating the write-gate/lifecycle split.
/// Still consulted by the episode pipeline to decide whether a completed
/// session should be queued for consolidation at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryLifecycleConfig {
    /// Automatically capture each turn to long-term memory.
    #[serde(default = "d_true")]
    pub auto_capture: bool,
    /// Ingest a session summary to memory when compaction runs.
    #[serde(default = "d_true")]
    pub capture_on_compaction: bool,
}

impl Default for MemoryLifecycleConfig {
    fn default() -> Self {
        Self {
            auto_capture: true,
            capture_on_compaction: true,
        }
    }
}

fn d_true() -> bool {
    true
}
