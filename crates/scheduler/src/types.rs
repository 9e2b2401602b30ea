use chrono::Duration;

/// A periodic job registered with the coordinator: name, cadence, jitter
/// ceiling, whether it only runs on the elected leader, and how many
/// instances of it may run concurrently (>1 for the fan-out batch jobs).
#[derive(Debug, Clone)]
pub struct BaseJob {
    pub name: String,
    pub interval: Duration,
    pub jitter: Duration,
    pub leader_only: bool,
    pub max_concurrency: u32,
}

impl BaseJob {
    pub fn new(name: &str, interval: Duration, jitter: Duration, leader_only: bool) -> Self {
        Self {
            name: name.to_string(),
            interval,
            jitter,
            leader_only,
            max_concurrency: 1,
        }
    }

    pub fn with_concurrency(mut self, max_concurrency: u32) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}

/// The fixed job catalog: `Heartbeat` runs on every instance; the rest are
/// leader-only. `ObserverBatch`/`DueScannerBatch` fan out over opted-in
/// users under a bounded concurrency semaphore.
pub fn builtin_jobs() -> Vec<BaseJob> {
    vec![
        BaseJob::new("heartbeat", Duration::minutes(9), Duration::seconds(20), false),
        BaseJob::new("episode_worker", Duration::minutes(2), Duration::seconds(10), true),
        BaseJob::new("consolidation_job", Duration::minutes(60), Duration::minutes(2), true),
        BaseJob::new("maintenance_job", Duration::hours(24), Duration::minutes(10), true),
        BaseJob::new("observer_batch", Duration::minutes(15), Duration::seconds(30), true)
            .with_concurrency(4),
        BaseJob::new("due_scanner_batch", Duration::minutes(5), Duration::seconds(15), true)
            .with_concurrency(4),
        BaseJob::new("decay", Duration::hours(24), Duration::minutes(15), false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_jobs_cover_the_full_catalog() {
        let names: Vec<&str> = builtin_jobs().iter().map(|j| j.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "heartbeat",
                "episode_worker",
                "consolidation_job",
                "maintenance_job",
                "observer_batch",
                "due_scanner_batch",
                "decay",
            ]
        );
    }

    #[test]
    fn only_heartbeat_and_decay_run_on_every_instance() {
        let jobs = builtin_jobs();
        let non_leader_only: Vec<&str> = jobs
            .iter()
            .filter(|j| !j.leader_only)
            .map(|j| j.name.as_str())
            .collect();
        assert_eq!(non_leader_only, vec!["heartbeat", "decay"]);
    }

    #[test]
    fn batch_jobs_carry_bounded_concurrency() {
        let jobs = builtin_jobs();
        let observer = jobs.iter().find(|j| j.name == "observer_batch").unwrap();
        assert_eq!(observer.max_concurrency, 4);
        let heartbeat = jobs.iter().find(|j| j.name == "heartbeat").unwrap();
        assert_eq!(heartbeat.max_concurrency, 1);
    }
}
