// TraceSweep - core/cancel.rs
//
// Cooperative cancellation for find runs: a shared flag plus an optional
// deadline. The finder polls `check()` at every directory boundary.

use crate::util::error::{CancelCause, FindError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Token for cooperative cancellation of a find run.
///
/// Clone is cheap; clones share the cancel flag, so cancelling any clone
/// cancels them all. Deadlines are per-token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Create a new token (not cancelled, no deadline).
    pub fn new() -> Self {
        Self::default()
    }

    /// A clone sharing this token's flag that also expires at `deadline`.
    /// An earlier existing deadline is kept.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        };
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Some(deadline),
        }
    }

    /// A clone sharing this token's flag that expires after `timeout`.
    /// A timeout too large to represent as an `Instant` adds no deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => {
                tracing::debug!(secs = timeout.as_secs(), "Timeout overflows Instant; no deadline set");
                self.clone()
            }
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// `Err(FindError::Cancelled)` once the token is cancelled or expired.
    pub fn check(&self) -> Result<(), FindError> {
        if self.is_cancelled() {
            return Err(FindError::Cancelled {
                cause: CancelCause::Requested,
            });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(FindError::Cancelled {
                cause: CancelCause::DeadlineExceeded,
            });
        }
        Ok(())
    }
}
