use std::future::Future;
use std::time::Duration;

use sa_domain::error::{Error, Result};

/// Exponential backoff with deterministic jitter derived from a seed
/// string (the episode id). No `rand` dependency exists anywhere in the
/// corpus's scheduling code, so jitter here is a cheap string hash rather
/// than a new dependency.
pub fn backoff_delay(base_ms: u64, attempt: u32, jitter_seed: &str) -> Duration {
    let exp = base_ms.saturating_mul(1u64 << attempt.min(10));
    let seed_hash = jitter_seed
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
    let jitter = seed_hash % (base_ms.max(1) / 2 + 1);
    Duration::from_millis(exp + jitter)
}

/// Retry `op` up to `max_attempts` times, sleeping with [`backoff_delay`]
/// between attempts, stopping early on the first non-retryable error.
pub async fn retry_with_backoff<T, F, Fut>(
    max_attempts: u32,
    base_delay_ms: u64,
    jitter_seed: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..max_attempts.max(1) {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                let delay = backoff_delay(base_delay_ms, attempt, jitter_seed);
                last_err = Some(e);
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| Error::Other("retry loop exited without attempting".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn backoff_doubles_each_attempt() {
        let d0 = backoff_delay(100, 0, "seed").as_millis();
        let d1 = backoff_delay(100, 1, "seed").as_millis();
        let d2 = backoff_delay(100, 2, "seed").as_millis();
        assert!(d1 >= 200 && d1 < 300);
        assert!(d2 >= 400 && d2 < 500);
        assert!(d0 < d1);
    }

    #[test]
    fn backoff_is_deterministic_for_same_seed() {
        assert_eq!(backoff_delay(100, 1, "episode-1"), backoff_delay(100, 1, "episode-1"));
    }

    #[test]
    fn backoff_varies_by_seed() {
        assert_ne!(
            backoff_delay(100, 1, "episode-1"),
            backoff_delay(100, 1, "episode-2")
        );
    }

    #[tokio::test]
    async fn retries_transient_errors_then_succeeds() {
        let attempts = AtomicU32::new(0);
        let result = retry_with_backoff(3, 1, "seed", |_| {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(Error::TransientExternal("blip".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_immediately_on_non_retryable_error() {
        let attempts = AtomicU32::new(0);
        let result: Result<i32> = retry_with_backoff(5, 1, "seed", |_| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::PermanentInput("bad".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let attempts = AtomicU32::new(0);
        let result: Result<i32> = retry_with_backoff(3, 1, "seed", |_| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::TransientExternal("still broken".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
