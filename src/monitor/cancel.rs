//! Session cancellation and deadline.
//!
//! Every blocking wait in a session goes through [`Cancellation::sleep`],
//! which wakes as soon as the token is cancelled or the deadline passes.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Why a session stopped before reaching a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CancelCause {
    #[error("cancelled")]
    Cancelled,
    #[error("timed out waiting for workflow runs (deadline exceeded)")]
    DeadlineExceeded,
}

#[derive(Debug)]
struct Inner {
    deadline: Option<Instant>,
    cancelled: Mutex<bool>,
    signal: Condvar,
}

/// Cloneable cancellation token with an optional deadline.
#[derive(Debug, Clone)]
pub struct Cancellation {
    inner: Arc<Inner>,
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancellation {
    /// A token with no deadline.
    pub fn new() -> Self {
        Self::with_deadline(None)
    }

    /// A token whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now().checked_add(timeout))
    }

    fn with_deadline(deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(Inner {
                deadline,
                cancelled: Mutex::new(false),
                signal: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancel the token and wake any sleeper.
    pub fn cancel(&self) {
        *self.lock() = true;
        self.inner.signal.notify_all();
    }

    fn cause_at(&self, cancelled: bool, now: Instant) -> Option<CancelCause> {
        if cancelled {
            return Some(CancelCause::Cancelled);
        }
        match self.inner.deadline {
            Some(deadline) if now >= deadline => Some(CancelCause::DeadlineExceeded),
            _ => None,
        }
    }

    /// The reason the token fired, if it has.
    pub fn cause(&self) -> Option<CancelCause> {
        let cancelled = *self.lock();
        self.cause_at(cancelled, Instant::now())
    }

    pub fn check(&self) -> Result<(), CancelCause> {
        self.cause().map_or(Ok(()), Err)
    }

    /// Time left before the deadline; `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.inner
            .deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Block for `duration`, returning early with the cause if the token
    /// fires first.
    pub fn sleep(&self, duration: Duration) -> Result<(), CancelCause> {
        let wake_at = Instant::now() + duration;
        let mut cancelled = self.lock();
        loop {
            let now = Instant::now();
            if let Some(cause) = self.cause_at(*cancelled, now) {
                return Err(cause);
            }
            if now >= wake_at {
                return Ok(());
            }
            let until = match self.inner.deadline {
                Some(deadline) => deadline.min(wake_at),
                None => wake_at,
            };
            let (guard, _) = self
                .inner
                .signal
                .wait_timeout(cancelled, until - now)
                .unwrap_or_else(PoisonError::into_inner);
            cancelled = guard;
        }
    }
}
