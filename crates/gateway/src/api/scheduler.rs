use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SchedulerStatusResponse {
    pub is_leader: bool,
    pub instance_id: String,
}

pub async fn status(State(state): State<AppState>) -> Json<SchedulerStatusResponse> {
    let coordinator = state.scheduler.lock();
    Json(SchedulerStatusResponse {
        is_leader: coordinator.is_leader(),
        instance_id: state.config.scheduler.instance_id.clone(),
    })
}
