//! Bounded retry policy for remote calls.
//!
//! One policy shared by every chat call site, parameterized by a classifier
//! that decides, per error, whether to retry immediately, retry after a
//! delay, or give up at once.

use std::future::Future;
use std::time::Duration;

/// What to do with one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Try again immediately.
    Retry,
    /// Wait out a cooldown, then try again.
    RetryAfter(Duration),
    /// Give up now and hand the error back.
    Fatal,
}

/// Why [`retry_with`] gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error; holds the last one.
    Exhausted(E),
    /// The classifier declared an attempt's error fatal.
    Fatal(E),
}

impl<E> RetryError<E> {
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted(e) | RetryError::Fatal(e) => e,
        }
    }
}

/// Run `op` up to `max_attempts` times.
///
/// The first `Ok` wins.  Errors are classified per attempt; a `Fatal`
/// classification short-circuits, otherwise the loop continues (sleeping
/// first for `RetryAfter`) until the attempts are spent.
pub async fn retry_with<T, E, Fut, Op, Classify>(
    max_attempts: u32,
    classify: Classify,
    mut op: Op,
) -> Result<T, RetryError<E>>
where
    E: std::fmt::Display,
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Classify: Fn(&E) -> RetryClass,
{
    debug_assert!(max_attempts > 0);

    let mut attempt = 0;
    loop {
        attempt += 1;
        let error = match op().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        match classify(&error) {
            RetryClass::Fatal => return Err(RetryError::Fatal(error)),
            RetryClass::Retry => {
                if attempt >= max_attempts {
                    return Err(RetryError::Exhausted(error));
                }
                log::warn!("attempt {attempt}/{max_attempts} failed ({error}), retrying");
            }
            RetryClass::RetryAfter(delay) => {
                if attempt >= max_attempts {
                    return Err(RetryError::Exhausted(error));
                }
                log::warn!(
                    "attempt {attempt}/{max_attempts} rate limited, waiting {}s before retrying",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("boom")]
    struct Boom;

    #[tokio::test]
    async fn always_failing_op_runs_exactly_max_attempts() {
        let calls = Cell::new(0u32);

        let result: Result<(), RetryError<Boom>> = retry_with(
            3,
            |_| RetryClass::Retry,
            || {
                calls.set(calls.get() + 1);
                async { Err(Boom) }
            },
        )
        .await;

        assert_eq!(calls.get(), 3);
        assert!(matches!(result, Err(RetryError::Exhausted(_))));
    }

    #[tokio::test]
    async fn success_on_second_attempt_stops_there() {
        let calls = Cell::new(0u32);

        let result = retry_with(
            3,
            |_: &Boom| RetryClass::Retry,
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { if n >= 2 { Ok(n) } else { Err(Boom) } }
            },
        )
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn first_success_never_retries() {
        let calls = Cell::new(0u32);

        let result: Result<&str, RetryError<Boom>> = retry_with(
            3,
            |_| RetryClass::Retry,
            || {
                calls.set(calls.get() + 1);
                async { Ok("done") }
            },
        )
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn fatal_classification_short_circuits() {
        let calls = Cell::new(0u32);

        let result: Result<(), RetryError<Boom>> = retry_with(
            3,
            |_| RetryClass::Fatal,
            || {
                calls.set(calls.get() + 1);
                async { Err(Boom) }
            },
        )
        .await;

        assert_eq!(calls.get(), 1);
        assert!(matches!(result, Err(RetryError::Fatal(_))));
    }

    /// Paused tokio time auto-advances the cooldown sleeps, so this test
    /// exercises the rate-limit path without waiting two minutes.
    #[tokio::test(start_paused = true)]
    async fn rate_limit_cooldown_is_waited_between_attempts() {
        let calls = Cell::new(0u32);
        let started = tokio::time::Instant::now();

        let result: Result<(), RetryError<Boom>> = retry_with(
            3,
            |_| RetryClass::RetryAfter(Duration::from_secs(60)),
            || {
                calls.set(calls.get() + 1);
                async { Err(Boom) }
            },
        )
        .await;

        assert_eq!(calls.get(), 3);
        assert!(matches!(result, Err(RetryError::Exhausted(_))));
        // two cooldowns between three attempts
        assert!(started.elapsed() >= Duration::from_secs(120));
    }
}
