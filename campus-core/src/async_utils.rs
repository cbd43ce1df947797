//! Async utilities and patterns
//!
//! Timeouts, cancellation bound to a view's lifetime, and the periodic task
//! used for live polling.

use crate::error::{CampusError, CampusResult, ErrorContext};
use std::future::Future;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Timeout wrapper for async operations
pub async fn with_timeout<F, T>(future: F, timeout_ms: u64, operation_name: &str) -> CampusResult<T>
where
    F: Future<Output = T>,
{
    match timeout(Duration::from_millis(timeout_ms), future).await {
        Ok(result) => Ok(result),
        Err(_) => Err(CampusError::Timeout {
            operation: operation_name.to_string(),
            duration_ms: timeout_ms,
            context: ErrorContext::new("async_utils")
                .with_operation("timeout")
                .with_metadata("timeout_ms", &timeout_ms.to_string())
                .with_suggestion("Increase timeout duration")
                .with_suggestion("Check network connectivity"),
        }),
    }
}

/// Race a fallible operation against a cancellation token.
///
/// Returns `Cancelled` without polling the operation when the token already
/// fired, and drops the in-flight operation when it fires mid-way.
pub async fn with_cancellation<F, T>(
    token: &CancellationToken,
    operation_name: &str,
    future: F,
) -> CampusResult<T>
where
    F: Future<Output = CampusResult<T>>,
{
    if token.is_cancelled() {
        return Err(cancelled(operation_name));
    }

    tokio::select! {
        biased;
        () = token.cancelled() => {
            debug!(operation = operation_name, "Operation cancelled in flight");
            Err(cancelled(operation_name))
        }
        result = future => result,
    }
}

fn cancelled(operation_name: &str) -> CampusError {
    CampusError::Cancelled {
        operation: operation_name.to_string(),
        context: ErrorContext::new("async_utils").with_operation(operation_name),
    }
}

/// Run `tick` immediately and then every `period` until `token` is cancelled.
///
/// A tick still running when the token fires is dropped. Missed ticks are
/// delayed rather than bunched up.
pub fn spawn_periodic<F, Fut>(
    period: Duration,
    token: CancellationToken,
    mut tick: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => break,
                _ = interval.tick() => {
                    tokio::select! {
                        biased;
                        () = token.cancelled() => break,
                        () = tick() => {}
                    }
                }
            }
        }

        debug!(period_ms = period.as_millis() as u64, "Periodic task stopped");
    })
}
