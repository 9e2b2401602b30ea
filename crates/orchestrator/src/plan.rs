use sa_domain::error::{Error, Result};
use sa_domain::tool::{Message, MessageContent, Role};
use sa_domain::trace::TraceEvent;
use sa_providers::router::LlmRouter;
use sa_providers::traits::ChatRequest;

use crate::types::{HistoryTurn, OrchestratorInput, PlanResponse};

/// Role name the planner is routed under in `LlmConfig::roles` — not one of
/// the fixed `ModelRole` variants, so calls go through
/// `LlmRouter::chat_for_role_name` rather than `chat_for_role`.
pub const ORCHESTRATOR_ROLE: &str = "orchestrator";

const SYSTEM_PROMPT: &str = r#"You are the orchestrator for a conversational agent. Given the conversation history, the latest user message, and an optional memory context injection, decide how to respond.

Reply with ONLY a JSON object of this exact shape:
{
  "intent": "personal" | "task" | "followup" | "general" | "mixed",
  "is_follow_up": boolean,
  "rewritten_query": string | null,
  "user_thought": string,
  "reasoning": string,
  "detected_topic": string,
  "tasks": [
    {
      "id": string,
      "type": "tool" | "generation" | "memory_control" | "context_clarification",
      "specialist": string | null,
      "tool_name": string | null,
      "prompt": string | null,
      "instruction": string | null,
      "params": object | null,
      "dependencies": [string]
    }
  ]
}
"#;

/// Call the planner LLM and post-process its plan per the orchestrator's
/// procedure: intent inheritance on follow-ups, conflict annotation when the
/// context carries an unresolved-conflict marker, and topic-change
/// detection. Retrieval of `input.active_domain` / `input.history` /
/// `input.context_injection` is the caller's responsibility.
pub async fn plan(router: &LlmRouter, input: OrchestratorInput<'_>) -> Result<PlanResponse> {
    let req = build_request(&input);
    let response = router.chat_for_role_name(ORCHESTRATOR_ROLE, req).await?;
    let mut plan = parse_plan(&response.content)?;

    apply_intent_inheritance(&mut plan, input.active_domain.as_deref());
    annotate_conflicts(&mut plan, input.context_injection);

    TraceEvent::OrchestratorPlanned {
        request_id: input.session_id.to_string(),
        intent: plan.intent.clone(),
        task_count: plan.tasks.len(),
        layer_count: layer_count(&plan.tasks),
    }
    .emit();

    Ok(plan)
}

fn build_request(input: &OrchestratorInput<'_>) -> ChatRequest {
    let mut messages = vec![Message {
        role: Role::System,
        content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
    }];
    messages.extend(input.history.iter().map(history_to_message));
    if !input.context_injection.is_empty() {
        messages.push(Message {
            role: Role::System,
            content: MessageContent::Text(input.context_injection.to_string()),
        });
    }
    messages.push(Message {
        role: Role::User,
        content: MessageContent::Text(input.message.to_string()),
    });

    ChatRequest {
        messages,
        json_mode: true,
        ..Default::default()
    }
}

fn history_to_message(turn: &HistoryTurn) -> Message {
    let role = match turn.role.as_str() {
        "assistant" => Role::Assistant,
        "system" => Role::System,
        "tool" => Role::Tool,
        _ => Role::User,
    };
    Message {
        role,
        content: MessageContent::Text(turn.content.clone()),
    }
}

/// Tolerant JSON parse of the planner's response, mirroring
/// `sa_extractor::parse::parse_llm_output`'s code-fence stripping.
fn parse_plan(text: &str) -> Result<PlanResponse> {
    let trimmed = strip_code_fence(text.trim());
    serde_json::from_str(trimmed)
        .map_err(|e| Error::ExtractorParse(format!("planner response not valid JSON: {e}")))
}

fn strip_code_fence(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text)
        .trim();
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// If the planner reported a follow-up with a generic "general" intent,
/// inherit the session's currently active domain instead.
pub fn apply_intent_inheritance(plan: &mut PlanResponse, active_domain: Option<&str>) {
    if plan.is_follow_up && plan.intent == "general" {
        if let Some(domain) = active_domain {
            plan.intent = domain.to_string();
        }
    }
}

/// When the context injection carries the unresolved-conflict marker,
/// append a clarification instruction to every generation task and note it
/// on `user_thought`.
pub fn annotate_conflicts(plan: &mut PlanResponse, context_injection: &str) {
    let marker = sa_contextpack::injection::format_conflict_note();
    if !context_injection.contains(marker.trim()) {
        return;
    }

    const CLARIFICATION: &str =
        "Note: the user's stored memory contains conflicting information. Ask a clarifying question before asserting either version as fact.";

    for task in plan.tasks.iter_mut() {
        if matches!(
            task.task_type,
            crate::types::TaskType::Generation | crate::types::TaskType::ContextClarification
        ) {
            let instruction = task.instruction.get_or_insert_with(String::new);
            if !instruction.is_empty() {
                instruction.push('\n');
            }
            instruction.push_str(CLARIFICATION);
        }
    }

    if !plan.user_thought.contains("conflict") {
        plan.user_thought.push_str(" (unresolved memory conflict)");
    }
}

/// Whether `detected_topic` names an actual topic change the caller should
/// persist asynchronously.
pub fn topic_changed(detected_topic: &str) -> bool {
    !matches!(detected_topic, "SAME" | "CHITCHAT")
}

/// Number of dependency layers in the plan's task DAG, for the trace event
/// only — the DAG executor computes its own layering to actually run tasks.
fn layer_count(tasks: &[crate::types::PlannedTask]) -> usize {
    use std::collections::{HashMap, HashSet};

    let mut remaining: HashMap<&str, &[String]> = tasks
        .iter()
        .map(|t| (t.id.as_str(), t.dependencies.as_slice()))
        .collect();
    let mut done: HashSet<&str> = HashSet::new();
    let mut layers = 0;

    while !remaining.is_empty() {
        let ready: Vec<&str> = remaining
            .iter()
            .filter(|(_, deps)| deps.iter().all(|d| done.contains(d.as_str())))
            .map(|(id, _)| *id)
            .collect();
        if ready.is_empty() {
            // Cyclic or dangling dependency — count whatever remains as one
            // final layer rather than looping forever.
            layers += 1;
            break;
        }
        for id in &ready {
            remaining.remove(id);
            done.insert(id);
        }
        layers += 1;
    }
    layers
}
