// src/retry.rs

use anyhow::Result;
use std::{future::Future, time::Duration};
use tokio::time::sleep;
use tracing::{error, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Fixed-count retry: every attempt is a full re-run of the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `0` behaves like `1`.
    pub max_attempts: u32,
    /// Pause between attempts; zero means retry immediately.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// Run `op` until it succeeds or `policy.max_attempts` is used up.
///
/// `op` receives the 1-based attempt number. The error from the last attempt
/// is returned with context naming `what` and the number of attempts made.
pub async fn retry_fixed<T, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op(attempt).await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < max_attempts => {
                warn!(
                    what,
                    attempt,
                    max_attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    error = %e,
                    "Retrying"
                );
                if !policy.delay.is_zero() {
                    sleep(policy.delay).await;
                }
            }
            Err(e) => {
                error!(what, attempts = attempt, error = %e, "Exhausted retries");
                return Err(e.context(format!("{} failed after {} attempts", what, attempt)));
            }
        }
    }
}
