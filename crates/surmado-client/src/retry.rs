//! Retry with exponential back-off and jitter around single HTTP calls.
//!
//! This only covers transport-level flakiness on one request. The report poll
//! loop keeps its fixed interval and never goes through here.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Returns `true` for errors on idempotent calls that are worth retrying.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection refused or reset.
/// - HTTP 5xx and 429 responses.
///
/// **Not retriable:** every other API status, deserialization failures, and
/// the report lifecycle errors.
pub(crate) fn is_transient(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::Api { status, .. } => *status == 429 || (500..600).contains(status),
        _ => false,
    }
}

/// Retry predicate for non-idempotent calls: only failures where the request
/// never reached the service.
pub(crate) fn is_connect_failure(err: &ClientError) -> bool {
    matches!(err, ClientError::Http(e) if e.is_connect())
}

/// Runs `operation` with up to `max_retries` additional attempts on errors
/// accepted by `retriable`.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Attempt | Sleep before next attempt    |
/// |---------|------------------------------|
/// | 1       | 1 000 ms × 2⁰ ± 25 % jitter |
/// | 2       | 1 000 ms × 2¹ ± 25 % jitter |
/// | 3       | 1 000 ms × 2² ± 25 % jitter |
///
/// Delay is capped at 60 s. Other errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    retriable: fn(&ClientError) -> bool,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient API error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
