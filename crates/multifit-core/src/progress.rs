//! Cooperative cancellation shared by the workers of one run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::ForecastError;

/// Cooperative cancellation token using an atomic flag.
///
/// # Example
/// ```
/// use multifit_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Checkpoint between groups: `Err(ForecastError::Cancelled)` once cancelled.
    pub fn check_cancelled(&self) -> Result<(), ForecastError> {
        if self.is_cancelled() {
            Err(ForecastError::Cancelled)
        } else {
            Ok(())
        }
    }
}
