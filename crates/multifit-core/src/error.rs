//! Error types for model fitting and run orchestration.

use std::time::Duration;

use crate::series::GroupId;

/// Error raised by a single model fit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Too few observations for the model.
    #[error("insufficient data: need {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A model parameter is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The series or the fitted state contains NaN or infinite values.
    #[error("non-finite value in series or fitted state")]
    NonFinite,
}

/// Error type for a fit-predict run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ForecastError {
    /// Worker count is zero or there is nothing to partition.
    #[error("cannot split {groups} groups across {workers} workers")]
    InvalidPartitionCount { workers: usize, groups: usize },

    /// A group identifier appears more than once in the input.
    #[error("group {0} appears more than once in the input")]
    DuplicateGroup(GroupId),

    /// A model fit failed and the failure policy aborts the run.
    #[error("fit failed for group {group}: {reason}")]
    FitFailure { group: GroupId, reason: ModelError },

    /// Two workers produced a result for the same group.
    #[error("more than one worker produced a result for group {0}")]
    DuplicateGroupResult(GroupId),

    /// Job indices were still waiting on a worker when the watchdog expired.
    #[error("run stalled after {timeout:?}: job indices {pending:?} never completed")]
    StalledBarrier {
        timeout: Duration,
        pending: Vec<usize>,
    },

    /// A completion was recorded for a cell that cannot accept it.
    #[error("invalid completion for slot {slot}, job {job_index}: {reason}")]
    InvalidCompletion {
        slot: usize,
        job_index: usize,
        reason: &'static str,
    },

    /// The worker stopped because another worker aborted the run.
    #[error("run cancelled")]
    Cancelled,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = ForecastError::InvalidPartitionCount {
            workers: 3,
            groups: 0,
        };
        assert_eq!(err.to_string(), "cannot split 0 groups across 3 workers");

        let err = ForecastError::FitFailure {
            group: GroupId::from("a"),
            reason: ModelError::InsufficientData {
                required: 2,
                actual: 1,
            },
        };
        assert!(err.to_string().contains("group a"));
        assert!(err.to_string().contains("need 2"));
    }

    #[test]
    fn stalled_barrier_lists_pending_rows() {
        let err = ForecastError::StalledBarrier {
            timeout: Duration::from_secs(5),
            pending: vec![3, 4],
        };
        assert!(err.to_string().contains("[3, 4]"));
    }
}
