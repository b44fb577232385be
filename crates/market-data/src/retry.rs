//! Bounded retry with exponential backoff

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use triarb_core::{MarketDataError, MarketDataResult, ProviderConfig};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }

    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (0-based), doubling up to the cap
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent.
    pub async fn run<F, Fut, T>(&self, what: &str, mut op: F) -> MarketDataResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = MarketDataResult<T>>,
    {
        let mut retry = 0;

        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            if retry >= self.max_retries {
                if self.max_retries == 0 {
                    return Err(err);
                }
                warn!("{} failed after {} attempts: {}", what, retry + 1, err);
                return Err(MarketDataError::RetriesExhausted {
                    attempts: retry + 1,
                    last: Box::new(err),
                });
            }

            let delay = self.backoff(retry);
            debug!(
                "{} failed (attempt {}/{}): {}, retrying in {:?}",
                what,
                retry + 1,
                self.max_retries + 1,
                err,
                delay
            );
            sleep(delay).await;
            retry += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_retries: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(1000),
        };

        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(800));
        assert_eq!(policy.backoff(4), Duration::from_millis(1000));
        assert_eq!(policy.backoff(40), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_recovers_from_transient_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result = fast_policy(3)
            .run("depth", move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(MarketDataError::Fetch("connection reset".into()))
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: MarketDataResult<()> = fast_policy(2)
            .run("depth", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(MarketDataError::Timeout(10))
            })
            .await;

        assert!(matches!(
            result,
            Err(MarketDataError::RetriesExhausted { attempts: 3, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_logical_errors() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: MarketDataResult<()> = fast_policy(5)
            .run("depth", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(MarketDataError::Provider {
                    status: "invalid-parameter".into(),
                    message: "invalid symbol".into(),
                })
            })
            .await;

        assert!(matches!(result, Err(MarketDataError::Provider { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_retries_returns_raw_error() {
        let result: MarketDataResult<()> = RetryPolicy::none()
            .run("symbols", || async { Err(MarketDataError::Fetch("down".into())) })
            .await;

        assert!(matches!(result, Err(MarketDataError::Fetch(_))));
    }
}
