//! Cooperative cancellation and timeouts
//!
//! A `CancellationToken` is handed to the search at construction and cloned
//! freely into whatever thread wants to stop it. The search polls it at the
//! top of every playout iteration and around every external call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a search was stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Interruption {
    #[error("Search was cancelled")]
    Cancelled,
    #[error("Search ran out of time")]
    TimedOut,
}

/// Shared cancellation flag with an optional deadline
///
/// Besides hard cancellation the token carries a raw interrupt flag.
/// Collaborators may raise it to abort a long call early; if no cancellation
/// or deadline backs the interrupt, the search clears it and carries on.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    interrupted: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that times out `budget` from now
    pub fn with_timeout(budget: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + budget),
            ..Self::default()
        }
    }

    /// Same flags, different deadline
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        Self {
            cancelled: Arc::clone(&self.cancelled),
            interrupted: Arc::clone(&self.interrupted),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.interrupted.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_timed_out(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Raise the raw interrupt flag without cancelling
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    pub fn clear_interrupt(&self) {
        self.interrupted.store(false, Ordering::SeqCst);
    }

    /// `Err` once cancelled or past the deadline
    pub fn check(&self) -> Result<(), Interruption> {
        if self.is_cancelled() {
            return Err(Interruption::Cancelled);
        }
        if self.is_timed_out() {
            return Err(Interruption::TimedOut);
        }
        Ok(())
    }

    /// Decide what a raw interrupt means
    ///
    /// Returns the terminal condition if one is active. Otherwise the interrupt
    /// was spurious: the flag is cleared and `Ok` tells the caller to retry.
    pub fn resolve_interrupt(&self) -> Result<(), Interruption> {
        self.check()?;
        self.clear_interrupt();
        Ok(())
    }
}
