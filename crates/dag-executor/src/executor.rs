use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tokio::sync::mpsc;

use sa_domain::tool::{Message, MessageContent, Role};
use sa_domain::trace::TraceEvent;
use sa_graph::GraphStore;
use sa_key_pool::KeyPool;
use sa_orchestrator::{PlannedTask, TaskType};
use sa_providers::router::LlmRouter;
use sa_providers::traits::ChatRequest;

use crate::keyed_chat::chat_with_key_rotation;
use crate::memory_control;
use crate::registry::ToolRegistry;
use crate::substitute::{split_thought_prefix, substitute_placeholders};
use crate::types::{ExecutionContext, ExecutorEvent, TaskResult};

const DEFAULT_ROLE: &str = "executor";

pub struct DagExecutor {
    router: Arc<LlmRouter>,
    key_pool: Arc<KeyPool>,
    tools: ToolRegistry,
    graph: Arc<GraphStore>,
}

impl DagExecutor {
    pub fn new(
        router: Arc<LlmRouter>,
        key_pool: Arc<KeyPool>,
        tools: ToolRegistry,
        graph: Arc<GraphStore>,
    ) -> Self {
        Self {
            router,
            key_pool,
            tools,
            graph,
        }
    }

    /// Run the plan's tasks layer by layer (all deps satisfied → eligible
    /// this round, run in parallel within the round) until every task has
    /// completed or a dependency cycle strands the rest. Streams
    /// `ExecutorEvent`s as tasks produce thoughts or finish.
    pub async fn execute(
        &self,
        tasks: Vec<PlannedTask>,
        ctx: &ExecutionContext,
        tx: mpsc::Sender<ExecutorEvent>,
    ) -> Vec<TaskResult> {
        let order: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
        let mut completed: HashMap<String, TaskResult> = HashMap::new();
        let mut remaining = tasks;

        while !remaining.is_empty() {
            let mut ready = Vec::new();
            let mut not_ready = Vec::new();
            for task in remaining {
                if task.dependencies.iter().all(|d| completed.contains_key(d)) {
                    ready.push(task);
                } else {
                    not_ready.push(task);
                }
            }

            if ready.is_empty() {
                for task in not_ready {
                    let result = TaskResult::err(
                        task.id.clone(),
                        task_type_str(task.task_type),
                        "unresolved dependency cycle",
                    );
                    let _ = tx.send(ExecutorEvent::TaskResult(result.clone())).await;
                    completed.insert(task.id.clone(), result);
                }
                break;
            }
            remaining = not_ready;

            let futures = ready
                .into_iter()
                .map(|task| self.run_task(task, ctx, &completed, tx.clone()));
            let results = futures_util::future::join_all(futures).await;
            for result in results {
                completed.insert(result.task_id.clone(), result);
            }
        }

        order
            .into_iter()
            .filter_map(|id| completed.remove(&id))
            .collect()
    }

    async fn run_task(
        &self,
        task: PlannedTask,
        ctx: &ExecutionContext,
        completed: &HashMap<String, TaskResult>,
        tx: mpsc::Sender<ExecutorEvent>,
    ) -> TaskResult {
        let start = Instant::now();
        let type_str = task_type_str(task.task_type);
        let (result, fallback_count) = match task.task_type {
            TaskType::Tool => {
                let params = task.params.clone().unwrap_or_else(|| json!({}));
                let tool_name = task.tool_name.clone().unwrap_or_default();
                let outcome = match self.tools.invoke(&tool_name, params).await {
                    Ok(output) => TaskResult::ok(task.id.clone(), type_str, output),
                    Err(e) => TaskResult::err(task.id.clone(), type_str, e.to_string()),
                };
                (outcome, 0)
            }
            TaskType::Generation | TaskType::ContextClarification => {
                self.run_generation(&task, completed, &tx).await
            }
            TaskType::MemoryControl => {
                let params = task.params.clone().unwrap_or_else(|| json!({}));
                let outcome = match memory_control::execute(&self.graph, &params) {
                    Ok(output) => TaskResult::ok(task.id.clone(), type_str, output),
                    Err(e) => TaskResult::err(task.id.clone(), type_str, e.to_string()),
                };
                (outcome, 0)
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        TraceEvent::DagTaskCompleted {
            request_id: ctx.request_id.clone(),
            task_id: task.id.clone(),
            task_type: type_str.to_string(),
            succeeded: result.error.is_none(),
            duration_ms,
            fallback_count,
        }
        .emit();
        let _ = tx.send(ExecutorEvent::TaskResult(result.clone())).await;
        result
    }

    async fn run_generation(
        &self,
        task: &PlannedTask,
        completed: &HashMap<String, TaskResult>,
        tx: &mpsc::Sender<ExecutorEvent>,
    ) -> (TaskResult, u32) {
        let type_str = task_type_str(task.task_type);
        let template = task.prompt.clone().unwrap_or_default();
        let prompt = substitute_placeholders(&template, completed);
        let role = task.specialist.as_deref().unwrap_or(DEFAULT_ROLE);

        let mut messages = Vec::new();
        if let Some(instruction) = &task.instruction {
            messages.push(Message {
                role: Role::System,
                content: MessageContent::Text(instruction.clone()),
            });
        }
        messages.push(Message {
            role: Role::User,
            content: MessageContent::Text(prompt),
        });
        let req = ChatRequest {
            messages,
            ..Default::default()
        };

        match chat_with_key_rotation(&self.router, &self.key_pool, role, &req).await {
            Ok((resp, attempts)) => {
                let (thought, remainder) = split_thought_prefix(&resp.content);
                if let Some(thought) = thought {
                    let _ = tx
                        .send(ExecutorEvent::Thought {
                            task_id: task.id.clone(),
                            content: thought,
                        })
                        .await;
                }
                (
                    TaskResult::ok(task.id.clone(), type_str, json!(remainder)),
                    attempts,
                )
            }
            Err(e) => (TaskResult::err(task.id.clone(), type_str, e.to_string()), 0),
        }
    }
}

fn task_type_str(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::Tool => "tool",
        TaskType::Generation => "generation",
        TaskType::MemoryControl => "memory_control",
        TaskType::ContextClarification => "context_clarification",
    }
}
