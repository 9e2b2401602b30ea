use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

/// Tracks in-flight run counts per job name for bounded fan-out, e.g.
/// `ObserverBatch`/`DueScannerBatch` running several users' work at once
/// under a `max_concurrency` ceiling.
pub struct ConcurrencyGuard {
    counts: RwLock<HashMap<String, Arc<AtomicU32>>>,
}

impl ConcurrencyGuard {
    pub fn new() -> Self {
        Self {
            counts: RwLock::new(HashMap::new()),
        }
    }

    /// Try to acquire a slot. Returns `true` if under the limit.
    pub async fn try_acquire(&self, job_name: &str, max: u32) -> bool {
        let counter = {
            let mut map = self.counts.write().await;
            map.entry(job_name.to_string())
                .or_insert_with(|| Arc::new(AtomicU32::new(0)))
                .clone()
        };
        let current = counter.load(Ordering::SeqCst);
        if current >= max {
            return false;
        }
        counter.fetch_add(1, Ordering::SeqCst);
        true
    }

    /// Release a slot after a run completes.
    pub async fn release(&self, job_name: &str) {
        let map = self.counts.read().await;
        if let Some(counter) = map.get(job_name) {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Current in-flight count for a job.
    pub async fn in_flight(&self, job_name: &str) -> u32 {
        let map = self.counts.read().await;
        map.get(job_name).map(|c| c.load(Ordering::SeqCst)).unwrap_or(0)
    }
}

impl Default for ConcurrencyGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquires_up_to_the_configured_max_then_blocks() {
        let guard = ConcurrencyGuard::new();
        assert!(guard.try_acquire("observer_batch", 2).await);
        assert!(guard.try_acquire("observer_batch", 2).await);
        assert!(!guard.try_acquire("observer_batch", 2).await);
        assert_eq!(guard.in_flight("observer_batch").await, 2);
    }

    #[tokio::test]
    async fn releasing_a_slot_frees_capacity_for_another_acquirer() {
        let guard = ConcurrencyGuard::new();
        assert!(guard.try_acquire("observer_batch", 1).await);
        assert!(!guard.try_acquire("observer_batch", 1).await);
        guard.release("observer_batch").await;
        assert!(guard.try_acquire("observer_batch", 1).await);
    }

    #[tokio::test]
    async fn jobs_track_independent_counters() {
        let guard = ConcurrencyGuard::new();
        assert!(guard.try_acquire("observer_batch", 1).await);
        assert!(guard.try_acquire("due_scanner_batch", 1).await);
        assert_eq!(guard.in_flight("observer_batch").await, 1);
        assert_eq!(guard.in_flight("due_scanner_batch").await, 1);
    }
}
