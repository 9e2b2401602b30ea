use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodePipelineConfig {
    /// Number of consecutive REGULAR episodes that trigger a consolidation job.
    #[serde(default = "d_consolidation_window")]
    pub consolidation_window: u32,
    /// Max summarization attempts before an episode is marked FAILED.
    #[serde(default = "d_max_attempts")]
    pub max_attempts: u32,
    /// Backoff base in milliseconds between retry attempts (doubled each time).
    #[serde(default = "d_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Turns per episode window: a PENDING episode is created every time
    /// `session.turn_count % episode_window == 0`.
    #[serde(default = "d_episode_window")]
    pub episode_window: u32,
    /// Summaries shorter than this are considered too thin to embed;
    /// such episodes go straight to READY with `vector_status=SKIPPED`.
    #[serde(default = "d_min_summary_chars")]
    pub min_summary_chars: usize,
    /// Minimum age (days) a REGULAR episode must have before it is
    /// eligible for consolidation.
    #[serde(default = "d_min_age_days_for_consolidation")]
    pub min_age_days_for_consolidation: i64,
    /// When an embedding succeeds but the vector store upsert fails, store
    /// the embedding in the graph as a fallback rather than dropping it.
    #[serde(default)]
    pub store_embedding_in_graph_on_vector_failure: bool,
}

impl Default for EpisodePipelineConfig {
    fn default() -> Self {
        Self {
            consolidation_window: d_consolidation_window(),
            max_attempts: d_max_attempts(),
            retry_backoff_ms: d_retry_backoff_ms(),
            episode_window: d_episode_window(),
            min_summary_chars: d_min_summary_chars(),
            min_age_days_for_consolidation: d_min_age_days_for_consolidation(),
            store_embedding_in_graph_on_vector_failure: false,
        }
    }
}

fn d_consolidation_window() -> u32 {
    5
}
fn d_max_attempts() -> u32 {
    3
}
fn d_retry_backoff_ms() -> u64 {
    500
}
fn d_episode_window() -> u32 {
    20
}
fn d_min_summary_chars() -> usize {
    40
}
fn d_min_age_days_for_consolidation() -> i64 {
    7
}
