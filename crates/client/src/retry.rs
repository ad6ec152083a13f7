use model::error::ApiError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// One transport-level attempt: status and raw body, or a transport error.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Decides error classification and retry pacing for one request.
///
/// `classify` may turn a transport-successful payload into a logical error;
/// `next_delay` is consulted after every failed attempt. Returning `None`
/// stops the loop and surfaces the last error.
pub trait RetryStrategy: Send + Sync {
    /// Inspect a 2xx payload for an application-level failure.
    fn classify(&self, _body: &str) -> Option<ApiError> {
        None
    }

    /// Delay before attempt `attempt + 1` (zero-based), or `None` to stop.
    fn next_delay(&self, attempt: u32, last: &ApiError) -> Option<Duration>;
}

/// Single attempt, no retries. The default for all API calls.
pub struct NoRetry;

impl RetryStrategy for NoRetry {
    fn next_delay(&self, _attempt: u32, _last: &ApiError) -> Option<Duration> {
        None
    }
}

/// Up to `attempts` tries with a constant delay, regardless of error kind.
pub struct FixedRetry {
    attempts: u32,
    delay: Duration,
}

impl FixedRetry {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        FixedRetry {
            attempts: attempts.max(1),
            delay,
        }
    }
}

impl RetryStrategy for FixedRetry {
    fn next_delay(&self, attempt: u32, _last: &ApiError) -> Option<Duration> {
        (attempt + 1 < self.attempts).then_some(self.delay)
    }
}

/// Capped exponential backoff, retrying transient errors only.
#[derive(Debug, Clone)]
pub struct BackoffRetry {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl BackoffRetry {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        BackoffRetry {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: if max_delay.is_zero() {
                base_delay
            } else {
                max_delay
            },
        }
    }

    /// Preset tuned for chain API reads.
    pub fn for_api() -> Self {
        Self::new(5, Duration::from_millis(250), Duration::from_secs(5))
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::from_millis(0);
        }

        let factor = 1u128 << attempt.min(6);
        let base_ms = self.base_delay.as_millis();
        let delay_ms = base_ms.saturating_mul(factor);
        let capped = delay_ms.min(self.max_delay.as_millis());
        Duration::from_millis(capped as u64)
    }
}

impl RetryStrategy for BackoffRetry {
    fn next_delay(&self, attempt: u32, last: &ApiError) -> Option<Duration> {
        if !last.is_transient() || attempt + 1 >= self.max_attempts {
            return None;
        }
        Some(self.backoff_delay(attempt))
    }
}

/// Runs `attempt_fn` under `strategy` until it yields an unclassified 2xx
/// body or the strategy stops, in which case the last observed error is
/// returned. The loop itself imposes no attempt cap.
pub async fn run_with_retry<F, Fut>(
    mut attempt_fn: F,
    strategy: &dyn RetryStrategy,
) -> Result<String, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<RawResponse, ApiError>>,
{
    let mut attempt: u32 = 0;
    loop {
        let err = match attempt_fn().await {
            Ok(resp) if resp.is_success() => match strategy.classify(&resp.body) {
                None => return Ok(resp.body),
                // A logical error overrides transport success.
                Some(err) => err,
            },
            Ok(resp) => ApiError::Http {
                status: resp.status,
                body: resp.body,
            },
            Err(err) => err,
        };

        match strategy.next_delay(attempt, &err) {
            Some(delay) => {
                debug!(attempt, ?delay, %err, "retrying request");
                sleep(delay).await;
                attempt += 1;
            }
            None => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn failing(counter: &AtomicU32) -> impl Future<Output = Result<RawResponse, ApiError>> + '_ {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Err(ApiError::Network("refused".into())) }
    }

    #[tokio::test]
    async fn no_retry_makes_exactly_one_attempt() {
        let attempts = AtomicU32::new(0);
        let result = run_with_retry(|| failing(&attempts), &NoRetry).await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_retry_stops_after_configured_attempts() {
        let attempts = AtomicU32::new(0);
        let strategy = FixedRetry::new(3, Duration::from_millis(10));
        let result = run_with_retry(|| failing(&attempts), &strategy).await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_gives_up_on_non_transient_errors() {
        let attempts = AtomicU32::new(0);
        let strategy = BackoffRetry::for_api();
        let result = run_with_retry(
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async {
                    Ok(RawResponse {
                        status: 400,
                        body: "bad request".into(),
                    })
                }
            },
            &strategy,
        )
        .await;
        assert!(matches!(result, Err(ApiError::Http { status: 400, .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_when_a_later_attempt_succeeds() {
        let attempts = AtomicU32::new(0);
        let strategy = FixedRetry::new(5, Duration::from_millis(5));
        let body = run_with_retry(
            || {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ApiError::Network("flaky".into()))
                    } else {
                        Ok(RawResponse {
                            status: 200,
                            body: "ok".into(),
                        })
                    }
                }
            },
            &strategy,
        )
        .await
        .unwrap();
        assert_eq!(body, "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn backoff_delay_doubles_and_caps() {
        let strategy = BackoffRetry::new(10, Duration::from_millis(200), Duration::from_secs(1));
        assert_eq!(strategy.backoff_delay(0), Duration::from_millis(200));
        assert_eq!(strategy.backoff_delay(1), Duration::from_millis(400));
        assert_eq!(strategy.backoff_delay(2), Duration::from_millis(800));
        assert_eq!(strategy.backoff_delay(3), Duration::from_secs(1));
        assert_eq!(strategy.backoff_delay(20), Duration::from_secs(1));
    }
}
