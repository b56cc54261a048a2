use std::time::Duration;

use rand::Rng;
use tracing::info;

/// Policy shared by every remote call: jitter the first attempt, then
/// retry up to `max_retry` times, `retry_interval` apart.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retry: u32,
    pub retry_interval: Duration,
    pub jitter: Duration,
}

impl RetryPolicy {
    /// `max_retry` is clamped to at least 1: `with_retry`'s loop runs
    /// `0..max_retry` attempts, and zero attempts would leave it with no
    /// error to return.
    pub fn new(max_retry: u32, retry_interval: Duration, jitter: Duration) -> Self {
        Self {
            max_retry: max_retry.max(1),
            retry_interval,
            jitter,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retry: 5,
            retry_interval: Duration::from_secs(5),
            jitter: Duration::from_millis(3000),
        }
    }
}

/// Sleep a random jitter within `policy.jitter`, then call `op` up to
/// `policy.max_retry` times, sleeping `policy.retry_interval` between
/// failed attempts. Returns the last error if every attempt fails.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, op_name: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    if !policy.jitter.is_zero() {
        let jitter_ms = rand::thread_rng().gen_range(0..=policy.jitter.as_millis() as u64);
        tokio::time::sleep(Duration::from_millis(jitter_ms)).await;
    }

    let attempts = policy.max_retry.max(1);
    let mut last_err = None;
    for attempt in 0..attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                info!(op_name, attempt, %err, "retrying");
                last_err = Some(err);
                if attempt + 1 < attempts {
                    tokio::time::sleep(policy.retry_interval).await;
                }
            }
        }
    }
    Err(last_err.expect("attempts >= 1 guarantees at least one attempt ran"))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn succeeds_without_retrying_when_first_attempt_works() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1), Duration::ZERO);
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(&policy, "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(42)
        })
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_up_to_max_then_returns_last_error() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1), Duration::ZERO);
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(&policy, "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err("boom")
        })
        .await;
        assert_eq!(result, Err("boom"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn recovers_after_a_transient_failure() {
        let policy = RetryPolicy::new(5, Duration::from_millis(1), Duration::ZERO);
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(&policy, "test", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err("not yet")
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_max_retry_still_attempts_once_instead_of_panicking() {
        let policy = RetryPolicy::new(0, Duration::from_millis(1), Duration::ZERO);
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(&policy, "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err("boom")
        })
        .await;
        assert_eq!(result, Err("boom"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
