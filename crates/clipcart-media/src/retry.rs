//! Retry with exponential backoff for candidate downloads.
//!
//! Network-level failures and transient server statuses get another chance
//! after a backoff delay; everything else (bad status, validation failure,
//! local I/O) is propagated immediately — retrying won't fix it.

use std::future::Future;
use std::time::Duration;

use crate::error::MediaError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable:
/// - [`MediaError::Http`] when it is a timeout or connect failure.
/// - [`MediaError::UnexpectedStatus`] for 429 and 5xx responses.
///
/// Everything else is propagated immediately.
fn is_retriable(err: &MediaError) -> bool {
    match err {
        MediaError::Http(e) => e.is_timeout() || e.is_connect(),
        MediaError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps `backoff_base_secs * 2^attempt`
/// seconds and tries again, up to `max_retries` additional attempts after
/// the first try. Non-retriable errors are returned without sleeping.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, MediaError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MediaError>>,
{
    let mut last_err;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                last_err = err;
            }
        }

        // Exponential backoff: base * 2^attempt seconds, shift capped to
        // prevent overflow on extreme configs.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %last_err,
            "transient download error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
