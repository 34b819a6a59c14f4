//! Cancellable, deadline-bearing execution context.
//!
//! A [`Context`] is threaded through every blocking operation in the crate
//! (entropy collection, random draws, the generation retry loop). Callers
//! running under their own concurrency model keep a clone and call
//! [`Context::cancel`] from another thread, or derive a child with a tighter
//! deadline via [`Context::with_timeout`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Reasons a context is no longer usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context cancelled")]
    Cancelled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Execution context carrying an optional deadline and a cancellation signal.
///
/// Clones share the same cancellation flag. Children created with
/// [`with_timeout`](Self::with_timeout) or [`with_deadline`](Self::with_deadline)
/// observe their parent's cancellation, but cancelling a child leaves the
/// parent untouched.
#[derive(Debug, Clone)]
pub struct Context {
    deadline: Option<Instant>,
    /// Own flag last; ancestors before it.
    flags: Vec<Arc<AtomicBool>>,
}

impl Context {
    /// Returns a context that is never done unless cancelled.
    pub fn background() -> Self {
        Self {
            deadline: None,
            flags: vec![Arc::new(AtomicBool::new(false))],
        }
    }

    /// Derives a child that expires after `timeout`, or at the parent's
    /// deadline if that is sooner.
    ///
    /// Timeouts too large to represent as an [`Instant`] impose no deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.child(self.deadline),
        }
    }

    /// Derives a child that expires at `deadline`, or at the parent's
    /// deadline if that is sooner.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let tighter = match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        };
        self.child(Some(tighter))
    }

    fn child(&self, deadline: Option<Instant>) -> Self {
        let mut flags = self.flags.clone();
        flags.push(Arc::new(AtomicBool::new(false)));
        Self { deadline, flags }
    }

    /// Cancels this context and every context derived from it.
    pub fn cancel(&self) {
        if let Some(own) = self.flags.last() {
            own.store(true, Ordering::Release);
        }
    }

    /// Returns true if this context or any ancestor was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.flags.iter().any(|flag| flag.load(Ordering::Acquire))
    }

    /// Returns the effective deadline, if any.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the time left before the deadline.
    ///
    /// `None` means no deadline; an expired deadline yields `Some(Duration::ZERO)`.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns true once the context is cancelled or past its deadline.
    pub fn is_done(&self) -> bool {
        self.check().is_err()
    }

    /// Returns the reason the context is done, or `Ok(())` if it is still live.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}
