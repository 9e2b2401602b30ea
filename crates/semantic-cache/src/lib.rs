//! Semantic response cache.
//!
//! An in-memory `RwLock<HashMap>` of per-key rolling state with
//! auto-expiry, generalized from daily token counters to
//! embedding-similarity cache entries with a fixed TTL and per-namespace
//! capacity eviction.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use sa_domain::config::SemanticCacheConfig;
use sa_domain::trace::TraceEvent;

struct CacheEntry {
    embedding: Vec<f32>,
    response: String,
    inserted_at: Instant,
}

/// A cache namespace — typically keyed by `(user_id, intent)` so lookups
/// never cross users or leak answers shaped for a different intent.
pub struct SemanticCache {
    config: SemanticCacheConfig,
    entries: RwLock<HashMap<String, Vec<CacheEntry>>>,
}

impl SemanticCache {
    pub fn new(config: SemanticCacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a cached response for `query_embedding` within `namespace`.
    /// Expired entries are evicted lazily on lookup.
    pub fn lookup(&self, namespace: &str, query_embedding: &[f32]) -> Option<String> {
        if !self.config.enabled {
            return None;
        }

        let ttl = Duration::from_secs(self.config.ttl_secs);
        let now = Instant::now();

        let mut entries = self.entries.write();
        let Some(bucket) = entries.get_mut(namespace) else {
            TraceEvent::SemanticCacheLookup {
                cache_key: namespace.to_string(),
                hit: false,
                similarity: None,
            }
            .emit();
            return None;
        };

        bucket.retain(|e| now.duration_since(e.inserted_at) < ttl);

        let best = bucket
            .iter()
            .map(|e| (cosine_similarity(query_embedding, &e.embedding), e))
            .filter(|(sim, _)| *sim >= self.config.similarity_threshold)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        match best {
            Some((sim, entry)) => {
                TraceEvent::SemanticCacheLookup {
                    cache_key: namespace.to_string(),
                    hit: true,
                    similarity: Some(sim),
                }
                .emit();
                Some(entry.response.clone())
            }
            None => {
                TraceEvent::SemanticCacheLookup {
                    cache_key: namespace.to_string(),
                    hit: false,
                    similarity: None,
                }
                .emit();
                None
            }
        }
    }

    /// Insert a response into the cache, evicting the oldest entry in the
    /// namespace when at capacity.
    pub fn insert(&self, namespace: &str, embedding: Vec<f32>, response: String) {
        if !self.config.enabled {
            return;
        }

        let mut entries = self.entries.write();
        let bucket = entries.entry(namespace.to_string()).or_default();

        if bucket.len() >= self.config.max_entries {
            // Oldest-first eviction; bucket is append-ordered.
            bucket.remove(0);
        }

        bucket.push(CacheEntry {
            embedding,
            response,
            inserted_at: Instant::now(),
        });
    }

    pub fn clear_namespace(&self, namespace: &str) {
        self.entries.write().remove(namespace);
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
