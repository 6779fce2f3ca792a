// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry loop with configurable backoff for flaky network calls.
//!
//! Only errors that [`OpsError::is_transient`] classifies as transient are
//! retried; everything else returns to the caller immediately.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use homeops::runtime::{Backoff, RetryConfig};
//!
//! # async fn run() -> homeops::Result<()> {
//! let retry = RetryConfig::new(3, Backoff::Fixed(Duration::from_secs(1)));
//! let value = retry.execute("version check", || async { Ok(42) }).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::error;

use crate::error::{OpsError, Result};

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// No delay between retries.
    None,
    /// The same delay before every retry.
    Fixed(Duration),
    /// Delay grows by `step` per attempt: 0, step, 2*step, ... capped at `max`.
    Linear { step: Duration, max: Duration },
}

impl Backoff {
    /// Delay before retrying after the given zero-indexed attempt.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => *delay,
            Backoff::Linear { step, max } => (*step * attempt).min(*max),
        }
    }
}

/// How often and how patiently to retry a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay schedule between attempts.
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff: Backoff::Linear {
                step: Duration::from_secs(2),
                max: Duration::from_secs(30),
            },
        }
    }
}

impl RetryConfig {
    /// Create a retry configuration.
    #[must_use]
    pub fn new(max_retries: u32, backoff: Backoff) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Run `operation` until it succeeds, fails permanently, or retries are
    /// exhausted. `what` names the operation in logs and in the final
    /// [`OpsError::RetriesExhausted`].
    pub async fn execute<T, F, Fut>(&self, what: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    if attempt >= self.max_retries {
                        error!("Connection retries exhausted for {what}.");
                        return Err(OpsError::RetriesExhausted(what.to_string()));
                    }
                    error!("{e} for {what}.");
                    tokio::time::sleep(self.backoff.delay(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn refused() -> OpsError {
        OpsError::ConnectionRefused("127.0.0.1:1".to_string())
    }

    #[test]
    fn test_backoff_none() {
        assert_eq!(Backoff::None.delay(0), Duration::ZERO);
        assert_eq!(Backoff::None.delay(100), Duration::ZERO);
    }

    #[test]
    fn test_backoff_fixed() {
        let backoff = Backoff::Fixed(Duration::from_millis(100));
        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(7), Duration::from_millis(100));
    }

    #[test]
    fn test_backoff_linear() {
        let backoff = Backoff::Linear {
            step: Duration::from_secs(2),
            max: Duration::from_secs(5),
        };
        assert_eq!(backoff.delay(0), Duration::ZERO);
        assert_eq!(backoff.delay(1), Duration::from_secs(2));
        assert_eq!(backoff.delay(2), Duration::from_secs(4));
        assert_eq!(backoff.delay(10), Duration::from_secs(5)); // Capped
    }

    #[tokio::test]
    async fn test_execute_success() {
        let retry = RetryConfig::new(3, Backoff::None);
        let value = retry.execute("noop", || async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_execute_retries_transient_failures() {
        let retry = RetryConfig::new(3, Backoff::None);
        let calls = AtomicU32::new(0);

        let value = retry
            .execute("flaky", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(refused())
                } else {
                    Ok("up")
                }
            })
            .await
            .unwrap();

        assert_eq!(value, "up");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_exhausts_retries() {
        let retry = RetryConfig::new(2, Backoff::None);
        let calls = AtomicU32::new(0);

        let result: Result<()> = retry
            .execute("down", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(refused())
            })
            .await;

        match result {
            Err(OpsError::RetriesExhausted(what)) => assert_eq!(what, "down"),
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        // Initial attempt plus two retries.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_permanent_failure_is_not_retried() {
        let retry = RetryConfig::new(5, Backoff::None);
        let calls = AtomicU32::new(0);

        let result: Result<()> = retry
            .execute("misconfigured", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(OpsError::Config("bad input".to_string()))
            })
            .await;

        assert!(matches!(result, Err(OpsError::Config(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
