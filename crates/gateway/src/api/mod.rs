pub mod chat;
pub mod memory;
pub mod scheduler;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/chat", post(chat::chat))
        .route("/v1/memory/facts", get(memory::list_facts))
        .route("/v1/memory/correct", post(memory::correct_fact))
        .route("/v1/scheduler/status", get(scheduler::status))
        .with_state(state)
}
