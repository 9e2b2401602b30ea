use serde::{Deserialize, Serialize};

/// One conversational turn fed to the planner as history context. Mirrors
/// `sa_contextpack::TranscriptTurn` without depending on that crate, keeping
/// the orchestrator's input shape independent of the context builder's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Tool,
    Generation,
    MemoryControl,
    ContextClarification,
}

/// A single task in a planner-produced DAG, as consumed by the DAG executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedTask {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    #[serde(default)]
    pub specialist: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// The structured plan returned by the planner LLM (and, after
/// post-processing, by [`crate::plan::plan`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub intent: String,
    pub is_follow_up: bool,
    #[serde(default)]
    pub rewritten_query: Option<String>,
    pub user_thought: String,
    pub reasoning: String,
    pub detected_topic: String,
    pub tasks: Vec<PlannedTask>,
}

/// Everything the orchestrator needs to produce a plan for one request.
/// Retrieval (history fetch, topic hydration) is the caller's
/// responsibility, matching the pure-function builder shape used by
/// `sa_contextpack::ContextBuilder`.
pub struct OrchestratorInput<'a> {
    pub session_id: &'a str,
    /// The session's currently active domain, used for follow-up intent
    /// inheritance. `None` on a fresh, not-yet-hydrated session.
    pub active_domain: Option<String>,
    pub history: Vec<HistoryTurn>,
    pub message: &'a str,
    /// The assembled context injection string (from `sa_contextpack`), or
    /// empty if memory injection was bypassed.
    pub context_injection: &'a str,
}
