//! Retry logic with a fixed delay between attempts
//!
//! Every upstream fetch and every chapter run goes through [`with_retry`]. When the retry
//! budget runs out the last error is wrapped in [`Error::RetriesExhausted`], so callers
//! always get a typed failure and decide explicitly whether to abort or move on.
//!
//! # Example
//!
//! ```no_run
//! use quran_etl::config::RetryConfig;
//! use quran_etl::retry::with_retry;
//!
//! # async fn example() -> quran_etl::Result<()> {
//! let config = RetryConfig::default();
//! let value = with_retry(&config, || async {
//!     // Your operation here
//!     Ok::<_, quran_etl::Error>(42)
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use crate::config::RetryConfig;
use crate::error::{Error, Result};
use std::future::Future;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (network errors, bad upstream responses, I/O hiccups) return `true`.
/// Failures that another attempt cannot fix (missing document, bad config) return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Upstream APIs are flaky; every transport or response problem gets another try
            Error::Network(_) => true,
            Error::UpstreamStatus { .. } => true,
            Error::Serialization(_) => true,
            Error::Io(_) => true,
            // Nested retries: an exhausted inner operation may succeed when the outer unit reruns
            Error::RetriesExhausted { last_error, .. } => last_error.is_retryable(),
            Error::MissingDocument { .. } => false,
            Error::InvalidDocument { .. } => false,
            Error::Config { .. } => false,
        }
    }
}

/// Execute an async operation, retrying transient failures after a fixed delay
///
/// The operation runs once, then up to `config.max_retries` more times while it keeps
/// failing with a retryable error, sleeping `config.delay` before each retry.
///
/// # Returns
///
/// - `Ok(value)` from the first successful attempt
/// - The error itself if it is not retryable (no delay is taken)
/// - [`Error::RetriesExhausted`] carrying the final error once the budget is spent
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    tracing::info!(attempts = attempt + 1, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && attempt < config.max_retries => {
                attempt += 1;

                tracing::warn!(
                    error = %e,
                    code = e.error_code(),
                    attempt = attempt,
                    retries_left = config.max_retries - attempt,
                    delay_ms = config.delay.as_millis() as u64,
                    "Operation failed, retrying"
                );

                tokio::time::sleep(config.delay).await;
            }
            Err(e) if e.is_retryable() => {
                tracing::error!(
                    error = %e,
                    attempts = attempt + 1,
                    "Operation failed after all retry attempts exhausted"
                );
                return Err(Error::RetriesExhausted {
                    attempts: attempt + 1,
                    last_error: Box::new(e),
                });
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    code = e.error_code(),
                    "Operation failed with non-retryable error"
                );
                return Err(e);
            }
        }
    }
}
