//! Run options and configuration.

use std::time::Duration;

use crate::constants::DEFAULT_HORIZON;

/// What a worker does when the model fails for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the whole run with `FitFailure`.
    Abort,
    /// Record the model error as the group's result and continue.
    #[default]
    Skip,
    /// Retry the fit up to `attempts` more times, then skip.
    Retry { attempts: u32 },
}

/// How partitions are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One worker thread per slot.
    #[default]
    Parallel,
    /// Every group on the calling thread, as a single slot.
    Iterative,
}

/// Options for a fit-predict run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Number of worker slots (0 = available parallelism).
    pub workers: usize,
    /// Periods predicted per group (0 = default horizon).
    pub horizon: usize,
    /// Per-group failure handling.
    pub failure_policy: FailurePolicy,
    /// Parallel or iterative execution.
    pub mode: ExecutionMode,
    /// Watchdog timeout for the whole run (None = wait indefinitely).
    pub stall_timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            horizon: DEFAULT_HORIZON,
            failure_policy: FailurePolicy::default(),
            mode: ExecutionMode::default(),
            stall_timeout: None,
        }
    }
}

impl RunOptions {
    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.workers == 0 {
            self.workers = default_workers();
        }
        if self.horizon == 0 {
            self.horizon = DEFAULT_HORIZON;
        }
        if self.mode == ExecutionMode::Iterative {
            self.workers = 1;
        }
        self
    }
}

/// Number of worker slots used when none is configured: one per logical CPU.
#[must_use]
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}
