//! Condition-based waiting
//!
//! Polls a check until it reports `true` or the deadline passes. Used in
//! place of fixed sleeps wherever the page needs time to settle.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use super::{Error, Result};

/// Bounds for a polling wait
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl WaitOptions {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            interval: Duration::from_millis(100),
        }
    }
}

/// Poll `check` until it returns `Ok(true)`
///
/// The check always runs at least once, even with a zero timeout. Check
/// errors abort the wait immediately. Running out of time yields
/// [`Error::WaitTimeout`] naming `condition`.
pub async fn until<F, Fut>(options: WaitOptions, condition: &str, mut check: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    // A timeout past the clock's range never expires
    let deadline = Instant::now().checked_add(options.timeout);
    let mut polls: u32 = 0;

    loop {
        polls = polls.saturating_add(1);
        if check().await? {
            tracing::trace!(condition, polls, "Condition met");
            return Ok(());
        }

        let pause = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    tracing::debug!(condition, polls, "Condition wait timed out");
                    return Err(Error::WaitTimeout {
                        condition: condition.to_string(),
                        secs: options.timeout.as_secs_f64(),
                    });
                }
                options.interval.min(deadline - now)
            }
            None => options.interval,
        };

        tokio::time::sleep(pause).await;
    }
}

/// Like [`until`], but a timeout is reported as `Ok(false)` instead of an error
pub async fn settle<F, Fut>(options: WaitOptions, condition: &str, check: F) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    match until(options, condition, check).await {
        Ok(()) => Ok(true),
        Err(Error::WaitTimeout { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> WaitOptions {
        WaitOptions::new(Duration::from_millis(200), Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_until_returns_once_condition_holds() {
        let calls = AtomicU32::new(0);
        until(fast(), "third poll", || async {
            Ok(calls.fetch_add(1, Ordering::SeqCst) >= 2)
        })
        .await
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_until_times_out() {
        let err = until(
            WaitOptions::new(Duration::from_millis(10), Duration::from_millis(2)),
            "never",
            || async { Ok(false) },
        )
        .await
        .unwrap_err();

        match err {
            Error::WaitTimeout { condition, .. } => assert_eq!(condition, "never"),
            other => panic!("Expected WaitTimeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_until_polls_once_with_zero_timeout() {
        let calls = AtomicU32::new(0);
        until(
            WaitOptions::new(Duration::ZERO, Duration::from_millis(1)),
            "immediate",
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            },
        )
        .await
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_until_propagates_check_errors() {
        let err = until(fast(), "broken", || async {
            Err::<bool, _>(Error::ElementNotFound("x".to_string()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(_)));
    }

    #[tokio::test]
    async fn test_until_accepts_unbounded_timeout() {
        let calls = AtomicU32::new(0);
        until(
            WaitOptions::new(Duration::from_secs(u64::MAX), Duration::from_millis(1)),
            "second poll",
            || async { Ok(calls.fetch_add(1, Ordering::SeqCst) >= 1) },
        )
        .await
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_settle_swallows_timeout() {
        let settled = settle(
            WaitOptions::new(Duration::from_millis(5), Duration::from_millis(1)),
            "never",
            || async { Ok(false) },
        )
        .await
        .unwrap();
        assert!(!settled);
    }
}
