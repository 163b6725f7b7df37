//! Bounded retry budget for network calls.

use std::future::Future;

use tokio::time::Instant;

use crate::error::{AppError, Result};
use crate::models::RetryConfig;

/// Run `call` until it succeeds or the budget is spent.
///
/// Every error is retried. The budget is spent once `max_attempts` calls
/// failed or the window elapsed, whichever comes first; the last error is
/// wrapped in [`AppError::RetryExhausted`].
pub async fn with_retry<T, F, Fut>(policy: &RetryConfig, operation: &str, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let window_spent = started.elapsed() >= policy.window();
                if attempts >= policy.max_attempts || window_spent {
                    return Err(AppError::RetryExhausted {
                        operation: operation.to_string(),
                        attempts,
                        last: Box::new(e),
                    });
                }
                log::warn!(
                    "{} failed (attempt {}/{}): {}",
                    operation,
                    attempts,
                    policy.max_attempts,
                    e
                );
                tokio::time::sleep(policy.delay()).await;
            }
        }
    }
}
