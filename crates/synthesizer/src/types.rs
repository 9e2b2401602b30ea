use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed DAG task's output, as handed to the synthesizer. Mirrors
/// `sa_dag::TaskResult` without depending on that crate — the synthesizer
/// only ever reads results, it doesn't know how they were produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResult {
    pub task_id: String,
    pub task_type: String,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A prior mood observation, used for emotional-continuity phrasing.
#[derive(Debug, Clone)]
pub struct MoodSignal {
    pub label: String,
    pub recorded_at: DateTime<Utc>,
}

/// Everything the synthesizer needs to build one combined prompt and
/// produce the final reply. Retrieval (results, identity facts, prior
/// mood) is the caller's responsibility.
pub struct SynthInput<'a> {
    pub request_id: &'a str,
    pub session_id: &'a str,
    pub intent: &'a str,
    pub user_message: &'a str,
    pub style_mode: &'a str,
    pub topic: &'a str,
    pub results: Vec<RawResult>,
    /// Identity facts for the "memory voice" preamble, in natural-language
    /// form already (e.g. "lives in Berlin", not "lives_in: Berlin").
    pub identity_facts: Vec<String>,
    pub conflict_present: bool,
    pub topic_changed: bool,
    pub prior_mood: Option<MoodSignal>,
    pub session_turn_count: u32,
}
