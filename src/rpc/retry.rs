//! Retry logic utilities for RPC operations
//!
//! Helper functions for exponential backoff and hard-deadline wrapping of
//! network futures.

use std::future::Future;
use std::time::Duration;

use tokio::time::error::Elapsed;
use tokio::time::timeout;

/// Next backoff step: the current wait scaled by `multiplier`, saturating at
/// `max_backoff_seconds`.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use tx_indexer::rpc::calculate_next_backoff;
///
/// // Default request-layer settings: 200ms doubling towards a 10s cap
/// let next = calculate_next_backoff(Duration::from_millis(200), 2.0, 10);
/// assert_eq!(next, Duration::from_millis(400));
/// ```
pub fn calculate_next_backoff(
    current_backoff: Duration,
    multiplier: f64,
    max_backoff_seconds: u64,
) -> Duration {
    let scaled_ms = (current_backoff.as_millis() as f64 * multiplier).round() as u64;
    Duration::from_millis(scaled_ms).min(Duration::from_secs(max_backoff_seconds))
}

/// Run a network future under a hard deadline.
///
/// The future is dropped (cancelling the in-flight request) when the
/// deadline elapses; the caller decides whether to retry.
pub async fn execute_with_deadline<T, F>(timeout_seconds: u64, operation: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    timeout(Duration::from_secs(timeout_seconds), operation).await
}
