//! Retry with exponential backoff.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ClientError, ClientResult};

/// How often and how patiently failed provider calls are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry (doubles each retry)
    #[serde(with = "millis")]
    pub initial_delay: Duration,
    #[serde(with = "millis")]
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes a single attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Runs `attempt` until it succeeds, fails with a non-retryable error, or the
/// policy's retries are used up.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut attempt: F,
) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let mut retry_count = 0;

    loop {
        metrics::counter!("weather_fetch_attempts_total", "operation" => operation).increment(1);

        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => {
                metrics::counter!("weather_fetch_failures_total", "operation" => operation).increment(1);
                return Err(e);
            }
            Err(e) => {
                retry_count += 1;

                if retry_count > policy.max_retries {
                    metrics::counter!("weather_fetch_failures_total", "operation" => operation).increment(1);
                    return Err(ClientError::RetriesExhausted {
                        attempts: retry_count,
                        last: Box::new(e),
                    });
                }

                let delay = policy.delay_for(retry_count);
                warn!(
                    error = %e,
                    operation = operation,
                    retry = retry_count,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Weather fetch failed, retrying"
                );
                metrics::counter!("weather_fetch_retries_total", "operation" => operation).increment(1);

                tokio::time::sleep(delay).await;
            }
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
