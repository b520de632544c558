//! Acquisition loop: try the fetch until success or the attempt budget runs out.

use tracing::{debug, info, warn};

use super::classify::{classify, FetchClass};
use super::policy::BackoffPolicy;
use crate::fetch::ModelFetcher;

/// Attempt to obtain the model up to `policy.max_attempts` times.
///
/// Returns `true` on the first successful fetch, `false` once all attempts
/// are exhausted. Fetch errors are absorbed and logged, never propagated:
/// the service has its own on-demand download and must be launched either
/// way. Sleeps (blocking) between attempts but not after the last failure.
pub fn acquire(policy: &BackoffPolicy, fetcher: &dyn ModelFetcher) -> bool {
    for attempt in 0..policy.max_attempts {
        info!(
            "prefetching model (attempt {}/{})",
            attempt + 1,
            policy.max_attempts
        );

        match fetcher.fetch() {
            Ok(path) => {
                info!("model available at {}", path.display());
                return true;
            }
            Err(err) => match classify(&err) {
                FetchClass::RateLimited => {
                    warn!("attempt {} throttled by remote: {}", attempt + 1, err);
                }
                FetchClass::Other => {
                    warn!("attempt {} failed: {}", attempt + 1, err);
                }
            },
        }

        if attempt + 1 < policy.max_attempts {
            let delay = policy.delay_for(attempt);
            debug!("retrying in {:.1}s", delay.as_secs_f64());
            std::thread::sleep(delay);
        }
    }

    warn!(
        "model prefetch failed after {} attempts; the service will fetch on demand",
        policy.max_attempts
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Fetcher that plays back a fixed sequence of outcomes.
    struct Scripted {
        outcomes: Mutex<Vec<Result<PathBuf, FetchError>>>,
        calls: AtomicU32,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<PathBuf, FetchError>>) -> Self {
            let mut outcomes = outcomes;
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ModelFetcher for Scripted {
        fn fetch(&self) -> Result<PathBuf, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .expect("fetch called more times than scripted")
        }
    }

    fn fast_policy(max_attempts: u32) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            multiplier: 2.0,
        }
    }

    #[test]
    fn first_success_makes_exactly_one_attempt() {
        let fetcher = Scripted::new(vec![Ok(PathBuf::from("/cache/model.onnx"))]);
        assert!(acquire(&fast_policy(3), &fetcher));
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn retries_through_rate_limits_until_success() {
        let fetcher = Scripted::new(vec![
            Err(FetchError::new("rate limit exceeded")),
            Err(FetchError::new("HTTP 403 Forbidden")),
            Ok(PathBuf::from("/cache/model.onnx")),
        ]);
        assert!(acquire(&fast_policy(3), &fetcher));
        assert_eq!(fetcher.calls(), 3);
    }

    #[test]
    fn success_on_last_allowed_attempt_is_success() {
        let fetcher = Scripted::new(vec![
            Err(FetchError::new("connection reset")),
            Ok(PathBuf::from("/cache/model.onnx")),
        ]);
        assert!(acquire(&fast_policy(2), &fetcher));
        assert_eq!(fetcher.calls(), 2);
    }

    #[test]
    fn exhaustion_returns_false_after_exactly_n_attempts() {
        let fetcher = Scripted::new(vec![
            Err(FetchError::new("rate limit exceeded")),
            Err(FetchError::new("connection reset")),
            Err(FetchError::new("corrupt archive")),
        ]);
        assert!(!acquire(&fast_policy(3), &fetcher));
        assert_eq!(fetcher.calls(), 3);
    }

    #[test]
    fn single_attempt_budget_never_sleeps() {
        let fetcher = Scripted::new(vec![Err(FetchError::new("nope"))]);
        // A long base delay would hang this test if the loop slept after the
        // final failure.
        let policy = BackoffPolicy {
            max_attempts: 1,
            base_delay: Duration::from_secs(3600),
            multiplier: 2.0,
        };
        let start = std::time::Instant::now();
        assert!(!acquire(&policy, &fetcher));
        assert_eq!(fetcher.calls(), 1);
        assert!(start.elapsed() < Duration::from_secs(60));
    }
}
