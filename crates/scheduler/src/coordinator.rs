use std::path::Path;

use chrono::{Duration, Utc};

use sa_domain::config::SchedulerConfig;
use sa_domain::error::Result;
use sa_domain::trace::TraceEvent;

use crate::lock::SchedulerLockStore;

const GLOBAL_LOCK_NAME: &str = "global_scheduler";

/// Tracks this instance's leadership over the `global_scheduler` lock and
/// emits `LeaderElected`/`LeaderLost` on state transitions only, not on
/// every poll.
pub struct SchedulerCoordinator {
    lock: SchedulerLockStore,
    instance_id: String,
    lease_ttl: Duration,
    is_leader: bool,
}

impl SchedulerCoordinator {
    pub fn new(state_path: &Path, config: &SchedulerConfig) -> Result<Self> {
        Ok(Self {
            lock: SchedulerLockStore::new(state_path)?,
            instance_id: config.instance_id.clone(),
            lease_ttl: Duration::seconds(config.lease_ttl_secs as i64),
            is_leader: false,
        })
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader
    }

    /// Attempt to acquire or renew the global leader lease; flips
    /// `is_leader` and emits the corresponding trace event only when it
    /// actually changes.
    pub fn tick(&mut self) -> bool {
        let now = Utc::now();
        let (acquired, expires_at) = self.lock.try_acquire(GLOBAL_LOCK_NAME, &self.instance_id, self.lease_ttl, now);

        if acquired && !self.is_leader {
            TraceEvent::LeaderElected {
                instance_id: self.instance_id.clone(),
                lock_name: GLOBAL_LOCK_NAME.to_string(),
                term_expires_at: expires_at.to_rfc3339(),
            }
            .emit();
        } else if !acquired && self.is_leader {
            TraceEvent::LeaderLost {
                instance_id: self.instance_id.clone(),
                lock_name: GLOBAL_LOCK_NAME.to_string(),
                reason: "lease not renewed in time".to_string(),
            }
            .emit();
        }

        self.is_leader = acquired;
        acquired
    }

    /// Release leadership explicitly, e.g. on graceful shutdown.
    pub fn step_down(&mut self) {
        if self.is_leader {
            self.lock.release(GLOBAL_LOCK_NAME, &self.instance_id);
            TraceEvent::LeaderLost {
                instance_id: self.instance_id.clone(),
                lock_name: GLOBAL_LOCK_NAME.to_string(),
                reason: "step down".to_string(),
            }
            .emit();
            self.is_leader = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SchedulerConfig {
        SchedulerConfig {
            instance_id: "node-a".to_string(),
            lease_ttl_secs: 90,
            ..SchedulerConfig::default()
        }
    }

    #[test]
    fn a_lone_instance_becomes_leader_on_first_tick() {
        let dir = tempfile::tempdir().unwrap();
        let mut coordinator = SchedulerCoordinator::new(dir.path(), &config()).unwrap();
        assert!(!coordinator.is_leader());
        assert!(coordinator.tick());
        assert!(coordinator.is_leader());
    }

    #[test]
    fn a_second_instance_cannot_win_leadership_while_lease_is_live() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = SchedulerCoordinator::new(dir.path(), &config()).unwrap();
        let mut b = SchedulerCoordinator::new(
            dir.path(),
            &SchedulerConfig {
                instance_id: "node-b".to_string(),
                ..config()
            },
        )
        .unwrap();

        assert!(a.tick());
        assert!(!b.tick());
        assert!(!b.is_leader());
    }

    #[test]
    fn stepping_down_releases_the_lease_for_another_instance() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = SchedulerCoordinator::new(dir.path(), &config()).unwrap();
        let mut b = SchedulerCoordinator::new(
            dir.path(),
            &SchedulerConfig {
                instance_id: "node-b".to_string(),
                ..config()
            },
        )
        .unwrap();

        assert!(a.tick());
        a.step_down();
        assert!(b.tick());
    }
}
