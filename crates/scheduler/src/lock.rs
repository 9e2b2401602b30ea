use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use sa_domain::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockRow {
    holder: String,
    expires_at: DateTime<Utc>,
}

/// Cross-process distributed lock rows: a TTL-based row re-read from disk
/// on every attempt, so any process on the box can contend for it. This is
/// a best-effort, coarse-grained lock (read-then-write is not itself
/// atomic); no dependency here provides a real cross-process file lock, so
/// this trades away hard atomicity rather than introduce one.
pub struct SchedulerLockStore {
    lock_path: PathBuf,
}

impl SchedulerLockStore {
    pub fn new(state_path: &Path) -> Result<Self> {
        let dir = state_path.join("scheduler");
        std::fs::create_dir_all(&dir).map_err(Error::Io)?;
        Ok(Self {
            lock_path: dir.join("locks.json"),
        })
    }

    fn read_rows(&self) -> HashMap<String, LockRow> {
        if !self.lock_path.exists() {
            return HashMap::new();
        }
        std::fs::read_to_string(&self.lock_path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn write_rows(&self, rows: &HashMap<String, LockRow>) -> Result<()> {
        let raw = serde_json::to_string_pretty(rows)?;
        std::fs::write(&self.lock_path, raw).map_err(Error::Io)
    }

    /// Atomically-in-intent acquire `name` for `holder`: succeeds if the
    /// lock is unheld, expired, or already held by `holder` (a renewal).
    pub fn try_acquire(&self, name: &str, holder: &str, ttl: Duration, now: DateTime<Utc>) -> (bool, DateTime<Utc>) {
        let mut rows = self.read_rows();
        let can_acquire = match rows.get(name) {
            None => true,
            Some(row) => row.expires_at <= now || row.holder == holder,
        };

        if can_acquire {
            let expires_at = now + ttl;
            rows.insert(
                name.to_string(),
                LockRow {
                    holder: holder.to_string(),
                    expires_at,
                },
            );
            let _ = self.write_rows(&rows);
            (true, expires_at)
        } else {
            (false, rows.get(name).map(|r| r.expires_at).unwrap_or(now))
        }
    }

    /// Release `name` if currently held by `holder` (no-op otherwise, so a
    /// stale/superseded holder can never clobber a newer one's release).
    pub fn release(&self, name: &str, holder: &str) {
        let mut rows = self.read_rows();
        if rows.get(name).is_some_and(|r| r.holder == holder) {
            rows.remove(name);
            let _ = self.write_rows(&rows);
        }
    }

    pub fn current_holder(&self, name: &str, now: DateTime<Utc>) -> Option<String> {
        self.read_rows()
            .get(name)
            .filter(|r| r.expires_at > now)
            .map(|r| r.holder.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (SchedulerLockStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (SchedulerLockStore::new(dir.path()).unwrap(), dir)
    }

    #[test]
    fn first_acquirer_wins_an_unheld_lock() {
        let (store, _dir) = store();
        let (acquired, _) = store.try_acquire("global_scheduler", "p1", Duration::seconds(90), Utc::now());
        assert!(acquired);
        assert_eq!(store.current_holder("global_scheduler", Utc::now()), Some("p1".to_string()));
    }

    #[test]
    fn second_holder_is_blocked_while_lease_is_live() {
        let (store, _dir) = store();
        let now = Utc::now();
        store.try_acquire("global_scheduler", "p1", Duration::seconds(90), now);
        let (acquired, _) = store.try_acquire("global_scheduler", "p2", Duration::seconds(90), now);
        assert!(!acquired);
    }

    #[test]
    fn same_holder_renews_without_conflict() {
        let (store, _dir) = store();
        let now = Utc::now();
        store.try_acquire("global_scheduler", "p1", Duration::seconds(90), now);
        let (acquired, _) = store.try_acquire("global_scheduler", "p1", Duration::seconds(90), now + Duration::seconds(10));
        assert!(acquired);
    }

    #[test]
    fn expired_lease_is_claimable_by_a_new_holder() {
        let (store, _dir) = store();
        let now = Utc::now();
        store.try_acquire("global_scheduler", "p1", Duration::seconds(90), now);
        let (acquired, _) = store.try_acquire("global_scheduler", "p2", Duration::seconds(90), now + Duration::seconds(91));
        assert!(acquired);
        assert_eq!(
            store.current_holder("global_scheduler", now + Duration::seconds(91)),
            Some("p2".to_string())
        );
    }

    #[test]
    fn release_only_clears_the_actual_holder() {
        let (store, _dir) = store();
        let now = Utc::now();
        store.try_acquire("global_scheduler", "p1", Duration::seconds(90), now);
        store.release("global_scheduler", "p2");
        assert_eq!(store.current_holder("global_scheduler", now), Some("p1".to_string()));
        store.release("global_scheduler", "p1");
        assert_eq!(store.current_holder("global_scheduler", now), None);
    }
}
