use chrono::{DateTime, Duration, Utc};

use crate::types::BaseJob;

/// Deterministic jitter offset derived from a seed string (the job name),
/// so the same job always lands at the same offset within its jitter
/// window rather than drifting tick to tick — avoids a `rand` dependency
/// the corpus never carries for scheduling jitter.
fn jitter_offset(seed: &str, ceiling: Duration) -> Duration {
    let ceiling_ms = ceiling.num_milliseconds().max(1) as u64;
    let hash = seed
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
    Duration::milliseconds((hash % ceiling_ms) as i64)
}

/// Whether `job` is due to run: never run before, or `interval + jitter`
/// has elapsed since `last_run`.
pub fn is_due(job: &BaseJob, last_run: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    let Some(last_run) = last_run else {
        return true;
    };
    let effective_interval = job.interval + jitter_offset(&job.name, job.jitter);
    now - last_run >= effective_interval
}

/// Filter `jobs` down to those that are both due and eligible to run given
/// the instance's current leadership status.
pub fn due_jobs<'a>(
    jobs: &'a [BaseJob],
    last_run: &std::collections::HashMap<String, DateTime<Utc>>,
    now: DateTime<Utc>,
    is_leader: bool,
) -> Vec<&'a BaseJob> {
    jobs.iter()
        .filter(|job| (is_leader || !job.leader_only) && is_due(job, last_run.get(&job.name).copied(), now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::builtin_jobs;

    #[test]
    fn never_run_job_is_always_due() {
        let job = BaseJob::new("x", Duration::minutes(10), Duration::seconds(0), false);
        assert!(is_due(&job, None, Utc::now()));
    }

    #[test]
    fn job_is_not_due_before_its_interval_elapses() {
        let job = BaseJob::new("x", Duration::minutes(10), Duration::seconds(0), false);
        let now = Utc::now();
        assert!(!is_due(&job, Some(now - Duration::minutes(5)), now));
    }

    #[test]
    fn job_is_due_once_interval_elapses() {
        let job = BaseJob::new("x", Duration::minutes(10), Duration::seconds(0), false);
        let now = Utc::now();
        assert!(is_due(&job, Some(now - Duration::minutes(11)), now));
    }

    #[test]
    fn jitter_is_deterministic_for_the_same_job_name() {
        let a = jitter_offset("episode_worker", Duration::seconds(10));
        let b = jitter_offset("episode_worker", Duration::seconds(10));
        assert_eq!(a, b);
    }

    #[test]
    fn due_jobs_excludes_leader_only_when_not_leader() {
        let jobs = builtin_jobs();
        let last_run = std::collections::HashMap::new();
        let due = due_jobs(&jobs, &last_run, Utc::now(), false);
        let names: Vec<&str> = due.iter().map(|j| j.name.as_str()).collect();
        assert!(names.contains(&"heartbeat"));
        assert!(names.contains(&"decay"));
        assert!(!names.contains(&"episode_worker"));
    }

    #[test]
    fn due_jobs_includes_leader_only_when_leader() {
        let jobs = builtin_jobs();
        let last_run = std::collections::HashMap::new();
        let due = due_jobs(&jobs, &last_run, Utc::now(), true);
        let names: Vec<&str> = due.iter().map(|j| j.name.as_str()).collect();
        assert!(names.contains(&"episode_worker"));
    }
}
