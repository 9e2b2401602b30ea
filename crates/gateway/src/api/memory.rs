use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use sa_graph::{FactCategory, NewFactInput};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListFactsQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct ListFactsResponse {
    pub facts: Vec<sa_graph::Fact>,
}

pub async fn list_facts(
    State(state): State<AppState>,
    Query(query): Query<ListFactsQuery>,
) -> Json<ListFactsResponse> {
    let facts = state.graph.active_facts_for_subject(&query.user_id);
    Json(ListFactsResponse { facts })
}

#[derive(Debug, Deserialize)]
pub struct CorrectFactRequest {
    pub user_id: String,
    pub predicate: String,
    pub object: String,
    #[serde(default = "d_confidence")]
    pub confidence: f64,
    #[serde(default = "d_correction_category")]
    pub category: FactCategory,
}

fn d_confidence() -> f64 {
    1.0
}

fn d_correction_category() -> FactCategory {
    FactCategory::Personal
}

#[derive(Debug, Serialize)]
pub struct CorrectFactResponse {
    pub fact_id: uuid::Uuid,
    pub superseded: usize,
}

/// A user-driven correction: supersede whatever the store currently holds
/// for (user_id, predicate) and write the corrected value as ACTIVE. This
/// bypasses the memory write gate deliberately — the user is asserting the
/// fact directly, not a candidate surfaced from conversation.
pub async fn correct_fact(State(state): State<AppState>, Json(req): Json<CorrectFactRequest>) -> Json<CorrectFactResponse> {
    let prior = state.graph.active_facts_for(&req.user_id, &req.predicate);
    let prior_ids: Vec<uuid::Uuid> = prior.iter().map(|f| f.fact_id).collect();
    let superseded = prior_ids.len();
    state.graph.supersede(&prior_ids);

    let (fact_id, _) = state.graph.merge(NewFactInput {
        subject: req.user_id,
        predicate: req.predicate,
        object: req.object,
        confidence: req.confidence.clamp(0.0, 1.0),
        category: req.category,
        source_turn_id: None,
    });

    let _ = state.graph.flush();

    Json(CorrectFactResponse { fact_id, superseded })
}
