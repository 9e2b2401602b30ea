use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use sa_domain::error::{Error, Result};
use sa_domain::trace::TraceEvent;

use crate::types::{Episode, EpisodeKind, EpisodeStatus, VectorStatus};

fn status_str(status: EpisodeStatus) -> &'static str {
    match status {
        EpisodeStatus::Pending => "PENDING",
        EpisodeStatus::InProgress => "IN_PROGRESS",
        EpisodeStatus::Ready => "READY",
        EpisodeStatus::Failed => "FAILED",
    }
}

/// Episode store, using the same JSON-file persistence discipline (load
/// once into a `RwLock<HashMap>`, write back wholesale on `flush`) already
/// reused by `sa-graph` and `sa-vector`.
pub struct EpisodeStore {
    episodes_path: PathBuf,
    episodes: RwLock<HashMap<Uuid, Episode>>,
}

impl EpisodeStore {
    pub fn new(state_path: &Path) -> Result<Self> {
        let dir = state_path.join("episodes");
        std::fs::create_dir_all(&dir).map_err(Error::Io)?;

        let episodes_path = dir.join("episodes.json");
        let episodes: HashMap<Uuid, Episode> = if episodes_path.exists() {
            let raw = std::fs::read_to_string(&episodes_path).map_err(Error::Io)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            HashMap::new()
        };

        tracing::info!(episodes = episodes.len(), path = %episodes_path.display(), "episode store loaded");

        Ok(Self {
            episodes_path,
            episodes: RwLock::new(episodes),
        })
    }

    pub fn flush(&self) -> Result<()> {
        let episodes = self.episodes.read();
        let raw = serde_json::to_string_pretty(&*episodes)?;
        std::fs::write(&self.episodes_path, raw).map_err(Error::Io)
    }

    pub fn get(&self, episode_id: Uuid) -> Option<Episode> {
        self.episodes.read().get(&episode_id).cloned()
    }

    /// Create a PENDING regular episode covering `[start_turn, end_turn]`.
    pub fn create_pending(&self, user_id: &str, session_id: &str, start_turn: u32, end_turn: u32) -> Uuid {
        let now = Utc::now();
        let episode_id = Uuid::new_v4();
        let episode = Episode {
            episode_id,
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            kind: EpisodeKind::Regular,
            status: EpisodeStatus::Pending,
            vector_status: VectorStatus::Pending,
            start_turn,
            end_turn,
            summary: None,
            source_episode_ids: Vec::new(),
            error: None,
            vector_error: None,
            attempts: 0,
            created_at: now,
            updated_at: now,
        };
        self.episodes.write().insert(episode_id, episode);
        episode_id
    }

    /// Create a PENDING consolidated episode replacing `source_episode_ids`.
    pub fn create_consolidated_pending(
        &self,
        user_id: &str,
        session_id: &str,
        source_episode_ids: Vec<Uuid>,
    ) -> Uuid {
        let now = Utc::now();
        let episode_id = Uuid::new_v4();
        let start_turn = 0;
        let end_turn = 0;
        let episode = Episode {
            episode_id,
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            kind: EpisodeKind::Consolidated,
            status: EpisodeStatus::Pending,
            vector_status: VectorStatus::Pending,
            start_turn,
            end_turn,
            summary: None,
            source_episode_ids,
            error: None,
            vector_error: None,
            attempts: 0,
            created_at: now,
            updated_at: now,
        };
        self.episodes.write().insert(episode_id, episode);
        episode_id
    }

    /// Atomically claim the oldest PENDING episode of `kind`, marking it
    /// IN_PROGRESS. Returns `None` if there is no PENDING work.
    pub fn claim_one_pending(&self, kind: EpisodeKind) -> Option<Episode> {
        let mut episodes = self.episodes.write();
        let candidate_id = episodes
            .values()
            .filter(|e| e.status == EpisodeStatus::Pending && e.kind == kind)
            .min_by_key(|e| e.created_at)
            .map(|e| e.episode_id)?;

        let episode = episodes.get_mut(&candidate_id)?;
        episode.status = EpisodeStatus::InProgress;
        episode.updated_at = Utc::now();
        Some(episode.clone())
    }

    pub fn record_attempt(&self, episode_id: Uuid) -> u32 {
        let mut episodes = self.episodes.write();
        if let Some(episode) = episodes.get_mut(&episode_id) {
            episode.attempts += 1;
            episode.updated_at = Utc::now();
            episode.attempts
        } else {
            0
        }
    }

    pub fn mark_failed(&self, episode_id: Uuid, reason: impl Into<String>) {
        let from_status = self.transition(episode_id, |episode| {
            episode.status = EpisodeStatus::Failed;
            episode.error = Some(reason.into());
        });
        if let Some(from_status) = from_status {
            TraceEvent::EpisodeTransition {
                episode_id: episode_id.to_string(),
                from_status,
                to_status: "FAILED".to_string(),
            }
            .emit();
        }
    }

    pub fn mark_ready(
        &self,
        episode_id: Uuid,
        summary: String,
        vector_status: VectorStatus,
        vector_error: Option<String>,
    ) {
        let from_status = self.transition(episode_id, |episode| {
            episode.status = EpisodeStatus::Ready;
            episode.summary = Some(summary);
            episode.vector_status = vector_status;
            episode.vector_error = vector_error;
        });
        if let Some(from_status) = from_status {
            TraceEvent::EpisodeTransition {
                episode_id: episode_id.to_string(),
                from_status,
                to_status: "READY".to_string(),
            }
            .emit();
        }
    }

    fn transition(&self, episode_id: Uuid, apply: impl FnOnce(&mut Episode)) -> Option<String> {
        let mut episodes = self.episodes.write();
        let episode = episodes.get_mut(&episode_id)?;
        let from_status = status_str(episode.status).to_string();
        apply(episode);
        episode.updated_at = Utc::now();
        Some(from_status)
    }

    /// REGULAR episodes that are READY, created at least `min_age_days`
    /// ago, and not yet folded into a consolidated episode, grouped by
    /// session id and ordered by `start_turn` within each group.
    pub fn regular_ready_grouped_by_session_older_than(
        &self,
        min_age_days: i64,
        now: DateTime<Utc>,
    ) -> HashMap<String, Vec<Episode>> {
        let episodes = self.episodes.read();
        let cutoff = now - chrono::Duration::days(min_age_days);
        let already_consolidated: std::collections::HashSet<Uuid> = episodes
            .values()
            .filter(|e| e.kind == EpisodeKind::Consolidated)
            .flat_map(|e| e.source_episode_ids.iter().copied())
            .collect();

        let mut groups: HashMap<String, Vec<Episode>> = HashMap::new();
        for episode in episodes.values() {
            if episode.kind == EpisodeKind::Regular
                && episode.status == EpisodeStatus::Ready
                && episode.created_at <= cutoff
                && !already_consolidated.contains(&episode.episode_id)
            {
                groups
                    .entry(episode.session_id.clone())
                    .or_default()
                    .push(episode.clone());
            }
        }
        for group in groups.values_mut() {
            group.sort_by_key(|e| e.start_turn);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (EpisodeStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = EpisodeStore::new(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn create_and_claim_pending() {
        let (store, _dir) = store();
        let id = store.create_pending("u1", "s1", 1, 20);
        let claimed = store.claim_one_pending(EpisodeKind::Regular).unwrap();
        assert_eq!(claimed.episode_id, id);
        assert_eq!(claimed.status, EpisodeStatus::InProgress);
        assert!(store.claim_one_pending(EpisodeKind::Regular).is_none());
    }

    #[test]
    fn claim_oldest_first() {
        let (store, _dir) = store();
        let first = store.create_pending("u1", "s1", 1, 20);
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.create_pending("u1", "s1", 21, 40);
        let claimed = store.claim_one_pending(EpisodeKind::Regular).unwrap();
        assert_eq!(claimed.episode_id, first);
    }

    #[test]
    fn mark_failed_transitions_status() {
        let (store, _dir) = store();
        let id = store.create_pending("u1", "s1", 1, 20);
        store.claim_one_pending(EpisodeKind::Regular);
        store.mark_failed(id, "no turns in range");
        let episode = store.get(id).unwrap();
        assert_eq!(episode.status, EpisodeStatus::Failed);
        assert_eq!(episode.error.as_deref(), Some("no turns in range"));
    }

    #[test]
    fn mark_ready_sets_summary_and_vector_status() {
        let (store, _dir) = store();
        let id = store.create_pending("u1", "s1", 1, 20);
        store.claim_one_pending(EpisodeKind::Regular);
        store.mark_ready(id, "a summary".to_string(), VectorStatus::Ready, None);
        let episode = store.get(id).unwrap();
        assert_eq!(episode.status, EpisodeStatus::Ready);
        assert_eq!(episode.vector_status, VectorStatus::Ready);
        assert_eq!(episode.summary.as_deref(), Some("a summary"));
    }

    #[test]
    fn flush_persists_and_reload_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = EpisodeStore::new(dir.path()).unwrap();
            let id = store.create_pending("u1", "s1", 1, 20);
            store.flush().unwrap();
            id
        };
        let reloaded = EpisodeStore::new(dir.path()).unwrap();
        assert!(reloaded.get(id).is_some());
    }

    #[test]
    fn regular_ready_grouped_excludes_already_consolidated() {
        let (store, _dir) = store();
        let id1 = store.create_pending("u1", "s1", 1, 20);
        store.claim_one_pending(EpisodeKind::Regular);
        store.mark_ready(id1, "s".to_string(), VectorStatus::Ready, None);

        // Force created_at into the past by re-inserting isn't exposed;
        // instead verify grouping works at min_age_days = 0.
        let groups = store.regular_ready_grouped_by_session_older_than(0, Utc::now());
        assert_eq!(groups.get("s1").map(|g| g.len()), Some(1));

        store.create_consolidated_pending("u1", "s1", vec![id1]);
        let groups = store.regular_ready_grouped_by_session_older_than(0, Utc::now());
        assert!(groups.get("s1").is_none());
    }
}
