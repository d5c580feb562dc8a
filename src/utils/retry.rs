//! Attempt-bounded retry with a fixed delay
//!
//! Knowledge-graph lookups fail transiently often enough that a single
//! attempt is not acceptable, but callers degrade gracefully on
//! exhaustion, so the helper returns the last error instead of looping
//! forever.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry an async operation up to `attempts` times, sleeping `delay`
/// between attempts.
///
/// **Algorithm:**
/// 1. Attempt operation
/// 2. If successful, return result
/// 3. If failed and attempts remain: log WARN, sleep, retry
/// 4. If failed on the final attempt: log ERROR, return the error
///
/// # Arguments
/// * `operation` - Name for logging (e.g., "wikidata city candidates")
/// * `attempts` - Maximum number of attempts (at least 1)
/// * `delay` - Fixed sleep between attempts
/// * `op` - Async closure performing the operation
pub async fn retry_with_attempts<T, E, F, Fut>(
    operation: &str,
    attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match op().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::debug!(operation, attempt, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(err) => {
                if attempt >= attempts {
                    tracing::error!(
                        operation,
                        attempt,
                        error = %err,
                        "operation failed, attempts exhausted"
                    );
                    return Err(err);
                }

                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "operation failed, will retry after delay"
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}
