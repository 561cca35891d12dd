//! Fixed-interval retry with a give-up deadline.
//!
//! # Responsibilities
//! - Start a new attempt on every tick of a fixed interval
//! - Stop at the give-up deadline, measured from the first attempt
//! - Stop as soon as the shutdown signal fires
//!
//! An attempt still running when the deadline passes or the signal fires
//! is dropped. A tick missed by a slow attempt fires once, right after it.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

use crate::lifecycle::ShutdownSignal;

/// Pause between two attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(3);

/// Overall time budget before giving up.
pub const DEFAULT_GIVE_UP_AFTER: Duration = Duration::from_secs(600);

/// Retry cadence and deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Time between the starts of two attempts.
    pub interval: Duration,
    /// Give up once this much time has passed since the first attempt.
    pub give_up_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_RETRY_INTERVAL,
            give_up_after: DEFAULT_GIVE_UP_AFTER,
        }
    }
}

/// Why [`retry_until`] stopped without a result.
///
/// `last` is the error of the last finished attempt, `None` when the
/// first attempt was still running.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The give-up deadline passed.
    #[error("gave up after {attempts} attempts in {elapsed:?}")]
    GaveUp {
        attempts: u32,
        elapsed: Duration,
        last: Option<E>,
    },
    /// The shutdown signal fired.
    #[error("interrupted after {attempts} attempts")]
    Interrupted { attempts: u32, last: Option<E> },
}

/// Run `op` until it succeeds, the deadline passes, or shutdown fires.
///
/// `what` names the operation in log events.
pub async fn retry_until<T, E, F, Fut>(
    policy: RetryPolicy,
    what: &str,
    shutdown: &mut ShutdownSignal,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let started = Instant::now();
    let give_up = sleep(policy.give_up_after);
    tokio::pin!(give_up);

    let mut ticker = interval_at(started + policy.interval, policy.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut attempts: u32 = 0;
    let mut last: Option<E> = None;
    loop {
        attempts += 1;

        let result = tokio::select! {
            biased;
            result = op() => result,
            _ = shutdown.recv() => {
                tracing::info!(operation = what, attempt = attempts, "Interrupt received, attempt dropped");
                return Err(RetryError::Interrupted { attempts, last });
            }
            _ = &mut give_up => {
                return Err(RetryError::GaveUp {
                    attempts,
                    elapsed: started.elapsed(),
                    last,
                });
            }
        };

        let err = match result {
            Ok(value) => {
                tracing::debug!(operation = what, attempts, "Attempt succeeded");
                return Ok(value);
            }
            Err(err) => err,
        };

        tracing::warn!(
            operation = what,
            attempt = attempts,
            error = %err,
            interval = ?policy.interval,
            "Attempt failed"
        );

        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                tracing::info!(operation = what, "Interrupt received, stop retrying");
                return Err(RetryError::Interrupted { attempts, last: Some(err) });
            }
            _ = &mut give_up => {
                return Err(RetryError::GaveUp {
                    attempts,
                    elapsed: started.elapsed(),
                    last: Some(err),
                });
            }
            _ = ticker.tick() => {}
        }
        last = Some(err);
    }
}
