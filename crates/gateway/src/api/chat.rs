use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use sa_contextpack::{ContextBuilder, ContextInputs, ContextMode};
use sa_dag::{ExecutionContext, ExecutorEvent};
use sa_domain::runtime_flags::RuntimeFlags;
use sa_graph::FactCategory;
use sa_orchestrator::{plan, HistoryTurn, OrchestratorInput};
use sa_synth::{synthesize, MoodSignal, RawResult, SynthInput};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub user_id: String,
    pub message: String,
    #[serde(default = "d_style_mode")]
    pub style_mode: String,
}

fn d_style_mode() -> String {
    "default".to_string()
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub intent: String,
    pub detected_topic: String,
}

/// Runs one turn through the full pipeline: context assembly, planning,
/// DAG execution, and synthesis. History/episodic retrieval is not wired
/// here (no session transcript store in this minimal binding) — the
/// context builder sees only the graph's identity/hard/soft facts for
/// `user_id`, same pure-function boundary the builder expects from any
/// richer caller.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let facts = state.graph.active_facts_for_subject(&req.user_id);
    let identity_facts: Vec<String> = facts
        .iter()
        .filter(|f| f.category == FactCategory::Identity)
        .map(|f| format!("{}: {}", f.predicate, f.object))
        .collect();
    let hard_facts: Vec<String> = facts
        .iter()
        .filter(|f| matches!(f.category, FactCategory::Personal | FactCategory::General))
        .map(|f| format!("{}: {}", f.predicate, f.object))
        .collect();
    let soft_facts: Vec<String> = facts
        .iter()
        .filter(|f| f.category == FactCategory::SoftSignal)
        .map(|f| format!("{}: {}", f.predicate, f.object))
        .collect();

    let context_builder = ContextBuilder::new(state.config.context_budget.clone());
    let (context_injection, _report) = context_builder.build(
        ContextInputs {
            mode: ContextMode::Standard,
            user_message: &req.message,
            transcript_turns: Vec::new(),
            episodic_candidates: Vec::new(),
            identity_facts,
            hard_facts,
            soft_facts,
            open_questions: Vec::new(),
            last_active_entity: None,
        },
        &RuntimeFlags::default(),
    );

    let plan_response = plan(
        &state.llm,
        OrchestratorInput {
            session_id: &req.session_id,
            active_domain: None,
            history: Vec::<HistoryTurn>::new(),
            message: &req.message,
            context_injection: &context_injection,
        },
    )
    .await
    .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;

    let request_id = Uuid::new_v4().to_string();
    let exec_ctx = ExecutionContext {
        request_id: request_id.clone(),
        user_id: req.user_id.clone(),
    };
    let (tx, mut rx) = mpsc::channel::<ExecutorEvent>(32);
    let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });
    let task_results = state.dag.execute(plan_response.tasks, &exec_ctx, tx).await;
    let _ = drain.await;

    let results: Vec<RawResult> = task_results
        .into_iter()
        .map(|r| RawResult {
            task_id: r.task_id,
            task_type: r.task_type,
            output: r.output,
            error: r.error,
        })
        .collect();

    let reply = synthesize(
        &state.llm,
        SynthInput {
            request_id: &request_id,
            session_id: &req.session_id,
            intent: &plan_response.intent,
            user_message: &req.message,
            style_mode: &req.style_mode,
            topic: &plan_response.detected_topic,
            results,
            identity_facts: Vec::new(),
            conflict_present: false,
            topic_changed: false,
            prior_mood: None::<MoodSignal>,
            session_turn_count: 0,
        },
        &state.style_catalog,
        |_chunk| {},
    )
    .await
    .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;

    let write_state = state.clone();
    let user_id = req.user_id.clone();
    let turn_text = req.message.clone();
    tokio::spawn(async move {
        crate::memory_write::persist_turn_facts(write_state, user_id, turn_text).await;
    });

    Ok(Json(ChatResponse {
        reply,
        intent: plan_response.intent,
        detected_topic: plan_response.detected_topic,
    }))
}
