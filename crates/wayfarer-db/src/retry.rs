//! Re-running transactions that lost a serialization race.

use std::future::Future;
use std::time::Duration;

use crate::error::DbError;

/// Pause before the first retry; doubled on each further attempt.
const BASE_BACKOFF: Duration = Duration::from_millis(10);

/// An error that may clear up if the whole operation is repeated.
pub trait Retryable {
    /// Whether repeating the operation may succeed.
    fn is_transient(&self) -> bool;
}

impl Retryable for DbError {
    fn is_transient(&self) -> bool {
        Self::is_transient(self)
    }
}

/// Run `op` until it succeeds, fails permanently, or has been attempted
/// `max_attempts` times. The last error is returned unchanged.
///
/// `op` must start a fresh transaction on every call.
pub async fn with_retry<T, E, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, E>
where
    E: Retryable + core::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 1;
    let mut backoff = BASE_BACKOFF;
    loop {
        match op().await {
            Err(err) if err.is_transient() && attempt < max_attempts => {
                tracing::warn!(attempt, error = %err, "Transaction conflict, retrying");
                tokio::time::sleep(backoff).await;
                attempt = attempt.saturating_add(1);
                backoff = backoff.saturating_mul(2);
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct Flaky(bool);

    impl Retryable for Flaky {
        fn is_transient(&self) -> bool {
            self.0
        }
    }

    impl core::fmt::Display for Flaky {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "flaky(transient={})", self.0)
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = with_retry(3, || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 { Err(Flaky(true)) } else { Ok(n) }
        })
        .await;
        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_limit() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), Flaky> = with_retry(2, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Flaky(true))
        })
        .await;
        assert_eq!(result, Err(Flaky(true)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), Flaky> = with_retry(5, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Flaky(false))
        })
        .await;
        assert_eq!(result, Err(Flaky(false)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
