use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EpisodeStatus {
    Pending,
    InProgress,
    Ready,
    Failed,
}

/// Independent from [`EpisodeStatus`] — an episode can be READY with a
/// vector store write that never succeeded, and a caller (the context
/// builder) needs to know not to expect semantic recall for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VectorStatus {
    Pending,
    Ready,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EpisodeKind {
    Regular,
    Consolidated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub episode_id: Uuid,
    pub user_id: String,
    pub session_id: String,
    pub kind: EpisodeKind,
    pub status: EpisodeStatus,
    pub vector_status: VectorStatus,
    pub start_turn: u32,
    pub end_turn: u32,
    pub summary: Option<String>,
    /// Populated only for `kind = Consolidated`: the episodes it replaces.
    #[serde(default)]
    pub source_episode_ids: Vec<Uuid>,
    pub error: Option<String>,
    pub vector_error: Option<String>,
    #[serde(default)]
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
