use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Succeeded,
    Failed,
}

/// Outcome of running one planned task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub task_id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: TaskStatus,
}

impl TaskResult {
    pub fn ok(task_id: impl Into<String>, task_type: &str, output: serde_json::Value) -> Self {
        Self {
            task_id: task_id.into(),
            task_type: task_type.to_string(),
            output: Some(output),
            error: None,
            status: TaskStatus::Succeeded,
        }
    }

    pub fn err(task_id: impl Into<String>, task_type: &str, error: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            task_type: task_type.to_string(),
            output: None,
            error: Some(error.into()),
            status: TaskStatus::Failed,
        }
    }
}

/// Streamed during execution, one per `<thought>` prefix or completed task.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ExecutorEvent {
    #[serde(rename = "thought")]
    Thought { task_id: String, content: String },
    #[serde(rename = "task_result")]
    TaskResult(TaskResult),
}

/// Request-scoped identity needed to route and trace a DAG run.
pub struct ExecutionContext {
    pub request_id: String,
    pub user_id: String,
}
