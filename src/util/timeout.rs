//! Deadline and cancellation helpers for provider calls.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::AgenticsError;

/// Wrap a future with a timeout.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, AgenticsError>>,
) -> Result<T, AgenticsError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(AgenticsError::Timeout(duration.as_millis() as u64)),
    }
}

/// Race a future against a cancellation token.
pub async fn with_cancel<T>(
    cancel: &CancellationToken,
    future: impl Future<Output = Result<T, AgenticsError>>,
) -> Result<T, AgenticsError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AgenticsError::Cancelled),
        result = future => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn slow_future_times_out() {
        let err = with_timeout(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, AgenticsError>(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, AgenticsError::Timeout(50)));
    }

    #[tokio::test]
    async fn cancelled_token_wins() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = with_cancel(&cancel, std::future::pending::<Result<(), AgenticsError>>())
            .await
            .unwrap_err();
        assert!(matches!(err, AgenticsError::Cancelled));
    }

    #[tokio::test]
    async fn completed_future_passes_through() {
        let cancel = CancellationToken::new();
        let value = with_cancel(&cancel, async { Ok::<_, AgenticsError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }
}
