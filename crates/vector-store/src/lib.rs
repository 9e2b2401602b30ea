//! In-memory episodic vector store.
//!
//! An in-memory index built at startup and kept live by indexing new
//! entries as they arrive, filtered per caller, generalized from
//! token-match counts to cosine-similarity top-k, with the same
//! JSON-file persistence discipline used elsewhere in this workspace.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sa_domain::config::VectorStoreConfig;
use sa_domain::error::{Error, Result};
use sa_domain::trace::TraceEvent;

/// A stored embedding point, namespaced by owning user so search never
/// crosses users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPoint {
    pub point_id: Uuid,
    pub user_id: String,
    pub episode_id: String,
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub episode_id: String,
    pub similarity: f32,
}

/// Deterministic point id for an episode — re-upserting the same episode
/// always lands on the same point rather than accumulating duplicates.
pub fn point_id_for_episode(episode_id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, episode_id.as_bytes())
}

pub struct VectorStore {
    config: VectorStoreConfig,
    points_path: PathBuf,
    points: RwLock<HashMap<Uuid, VectorPoint>>,
}

impl VectorStore {
    pub fn new(state_path: &Path, config: VectorStoreConfig) -> Result<Self> {
        let dir = state_path.join("vectors");
        std::fs::create_dir_all(&dir).map_err(Error::Io)?;

        let points_path = dir.join("points.json");
        let points: HashMap<Uuid, VectorPoint> = if points_path.exists() {
            let raw = std::fs::read_to_string(&points_path).map_err(Error::Io)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            HashMap::new()
        };

        tracing::info!(points = points.len(), path = %points_path.display(), "vector store loaded");

        Ok(Self {
            config,
            points_path,
            points: RwLock::new(points),
        })
    }

    /// Insert or replace the embedding for an episode.
    pub fn upsert(&self, user_id: &str, episode_id: &str, embedding: Vec<f32>) -> Result<Uuid> {
        if embedding.len() != self.config.dimensions {
            return Err(Error::VectorStoreDegraded(format!(
                "embedding has {} dims, expected {}",
                embedding.len(),
                self.config.dimensions
            )));
        }

        let point_id = point_id_for_episode(episode_id);
        let dims = embedding.len();
        let point = VectorPoint {
            point_id,
            user_id: user_id.to_string(),
            episode_id: episode_id.to_string(),
            embedding,
            created_at: Utc::now(),
        };
        self.points.write().insert(point_id, point);

        TraceEvent::VectorUpsert {
            episode_id: episode_id.to_string(),
            point_id: point_id.to_string(),
            dims,
        }
        .emit();

        Ok(point_id)
    }

    pub fn remove(&self, episode_id: &str) {
        let point_id = point_id_for_episode(episode_id);
        self.points.write().remove(&point_id);
    }

    /// Cosine-similarity top-k search scoped to `user_id`.
    pub fn search(&self, user_id: &str, query: &[f32]) -> Vec<SearchHit> {
        let start = std::time::Instant::now();

        let mut scored: Vec<SearchHit> = self
            .points
            .read()
            .values()
            .filter(|p| p.user_id == user_id)
            .filter_map(|p| {
                let sim = cosine_similarity(query, &p.embedding);
                if sim >= self.config.min_similarity {
                    Some(SearchHit {
                        episode_id: p.episode_id.clone(),
                        similarity: sim,
                    })
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.config.top_k);

        TraceEvent::VectorSearch {
            user_id: user_id.to_string(),
            k: self.config.top_k,
            hits: scored.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        }
        .emit();

        scored
    }

    pub fn flush(&self) -> Result<()> {
        let points = self.points.read();
        let json = serde_json::to_string_pretty(&*points)
            .map_err(|e| Error::Other(format!("serializing vector points: {e}")))?;
        std::fs::write(&self.points_path, json).map_err(Error::Io)?;
        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> VectorStoreConfig {
        VectorStoreConfig {
            top_k: 2,
            min_similarity: 0.1,
            dimensions: 3,
        }
    }

    fn store() -> (VectorStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::new(dir.path(), cfg()).unwrap();
        (store, dir)
    }

    #[test]
    fn cosine_similarity_identical_vectors_is_one() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_orthogonal_vectors_is_zero() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn upsert_rejects_wrong_dimensions() {
        let (store, _dir) = store();
        let err = store.upsert("u1", "ep1", vec![1.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::VectorStoreDegraded(_)));
    }

    #[test]
    fn upsert_is_idempotent_by_episode_id() {
        let (store, _dir) = store();
        let id1 = store.upsert("u1", "ep1", vec![1.0, 0.0, 0.0]).unwrap();
        let id2 = store.upsert("u1", "ep1", vec![0.0, 1.0, 0.0]).unwrap();
        assert_eq!(id1, id2);
    }

    #[test]
    fn search_ranks_by_similarity_and_respects_top_k() {
        let (store, _dir) = store();
        store.upsert("u1", "ep1", vec![1.0, 0.0, 0.0]).unwrap();
        store.upsert("u1", "ep2", vec![0.9, 0.1, 0.0]).unwrap();
        store.upsert("u1", "ep3", vec![0.0, 1.0, 0.0]).unwrap();

        let hits = store.search("u1", &[1.0, 0.0, 0.0]);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].episode_id, "ep1");
    }

    #[test]
    fn search_scopes_to_user() {
        let (store, _dir) = store();
        store.upsert("u1", "ep1", vec![1.0, 0.0, 0.0]).unwrap();
        store.upsert("u2", "ep2", vec![1.0, 0.0, 0.0]).unwrap();

        let hits = store.search("u1", &[1.0, 0.0, 0.0]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].episode_id, "ep1");
    }

    #[test]
    fn flush_persists_and_reload_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::new(dir.path(), cfg()).unwrap();
        store.upsert("u1", "ep1", vec![1.0, 0.0, 0.0]).unwrap();
        store.flush().unwrap();

        let reloaded = VectorStore::new(dir.path(), cfg()).unwrap();
        let hits = reloaded.search("u1", &[1.0, 0.0, 0.0]);
        assert_eq!(hits.len(), 1);
    }
}
