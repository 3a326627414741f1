use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{Result, TodoError};

/// Drive `operation` to completion unless `cancel` fires first.
///
/// On cancellation the operation future is dropped in place, so any
/// transaction it owns is rolled back by its destructor and the connection
/// goes back to the pool. A token that is already cancelled short-circuits
/// before the operation is polled at all.
pub async fn run_cancellable<T, F>(cancel: &CancellationToken, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(TodoError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TodoError::Cancelled),
        result = operation => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_completes_when_not_cancelled() {
        let cancel = CancellationToken::new();
        let result = run_cancellable(&cancel, async { Ok(5) }).await;
        assert_eq!(result, Ok(5));
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_never_polls_operation() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let polled = Arc::new(AtomicBool::new(false));
        let flag = polled.clone();
        let result: Result<()> = run_cancellable(&cancel, async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert_eq!(result, Err(TodoError::Cancelled));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_during_operation() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let result: Result<()> = run_cancellable(&cancel, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;

        assert_eq!(result, Err(TodoError::Cancelled));
    }
}
