//! Retry utilities for catalog requests
//!
//! Exponential backoff with jitter, applied only to failures that
//! [`CatalogError::is_transient`] classifies as transient.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::duration_serde::duration;
use crate::config::defaults::{
    DEFAULT_RETRY_INITIAL_DELAY_MS, DEFAULT_RETRY_MAX_ATTEMPTS, DEFAULT_RETRY_MAX_DELAY_MS,
};
use crate::errors::CatalogResult;
use crate::utils::jitter::generate_jitter_percent;

/// Configuration for catalog retry behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, the first try included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry
    #[serde(default = "default_initial_delay", with = "duration")]
    pub initial_delay: Duration,
    /// Ceiling for the backoff delay
    #[serde(default = "default_max_delay", with = "duration")]
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Whether to add up to 25% jitter to delays
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

fn default_max_attempts() -> u32 {
    DEFAULT_RETRY_MAX_ATTEMPTS
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(DEFAULT_RETRY_INITIAL_DELAY_MS)
}

fn default_max_delay() -> Duration {
    Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_jitter() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: default_jitter(),
        }
    }
}

/// Execute a catalog operation with retry logic
///
/// Returns the first success, the first non-transient error, or the last
/// transient error once `max_attempts` is exhausted.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    mut operation: F,
    operation_name: &str,
) -> CatalogResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CatalogResult<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(
                        "Catalog operation '{}' succeeded on attempt {}/{}",
                        operation_name, attempt, max_attempts
                    );
                }
                return Ok(result);
            }
            Err(err) if !err.is_transient() => {
                debug!(
                    "Catalog operation '{}' failed with non-retryable error: {}",
                    operation_name, err
                );
                return Err(err);
            }
            Err(err) if attempt >= max_attempts => {
                warn!(
                    "Catalog operation '{}' failed after {} attempts: {}",
                    operation_name, max_attempts, err
                );
                return Err(err);
            }
            Err(err) => {
                let delay = calculate_delay(config, attempt);
                warn!(
                    "Catalog operation '{}' failed on attempt {}/{}, retrying in {:?}: {}",
                    operation_name, attempt, max_attempts, delay, err
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Backoff delay before retry number `attempt` (1-based)
fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base_ms = config.initial_delay.as_millis() as f64
        * config.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
    let capped_ms = base_ms.min(config.max_delay.as_millis() as f64) as u64;

    let jitter_ms = if config.jitter {
        generate_jitter_percent(capped_ms, 25)
    } else {
        0
    };

    Duration::from_millis(capped_ms + jitter_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CatalogError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    fn server_error() -> CatalogError {
        CatalogError::Http {
            status: 502,
            message: "bad gateway".to_string(),
        }
    }

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = with_retry(
            &fast_config(3),
            || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(server_error())
                    } else {
                        Ok(42)
                    }
                }
            },
            "flaky",
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: CatalogResult<()> = with_retry(
            &fast_config(2),
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(server_error()) }
            },
            "always-failing",
        )
        .await;

        assert_eq!(result, Err(server_error()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_transient_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: CatalogResult<()> = with_retry(
            &fast_config(5),
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(CatalogError::parse("pokemon", "unexpected eof")) }
            },
            "bad-body",
        )
        .await;

        assert!(matches!(result, Err(CatalogError::Parse { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig {
            max_attempts: 10,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(300),
            backoff_multiplier: 2.0,
            jitter: false,
        };

        assert_eq!(calculate_delay(&config, 1), Duration::from_millis(100));
        assert_eq!(calculate_delay(&config, 2), Duration::from_millis(200));
        assert_eq!(calculate_delay(&config, 3), Duration::from_millis(300));
        assert_eq!(calculate_delay(&config, 8), Duration::from_millis(300));
    }
}
