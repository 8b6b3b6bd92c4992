//! Sequential execution of one work partition.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use multifit_core::error::ForecastError;
use multifit_core::modeler::Modeler;
use multifit_core::options::FailurePolicy;
use multifit_core::progress::CancellationToken;
use multifit_core::series::{GroupId, Series};
use multifit_core::GroupOutcome;

use crate::partition::WorkPartition;
use crate::tracker::ProgressTracker;

/// Everything a worker shares with the rest of the run.
pub struct WorkerContext<'a> {
    pub modeler: &'a dyn Modeler,
    pub tracker: &'a ProgressTracker,
    pub policy: FailurePolicy,
    pub horizon: usize,
    pub cancel: &'a CancellationToken,
}

/// Private results of one worker, handed to the aggregator.
#[derive(Debug)]
pub struct WorkerOutput {
    /// Slot that produced these results.
    pub slot: usize,
    /// Outcome per group of the partition.
    pub results: HashMap<GroupId, GroupOutcome>,
    /// Groups whose fit failed and were recorded as errors.
    pub failures: usize,
    /// Time spent on the partition.
    pub elapsed: Duration,
}

/// Executes one partition in order, reporting each job to the tracker.
pub struct Worker {
    partition: WorkPartition,
}

impl Worker {
    #[must_use]
    pub fn new(partition: WorkPartition) -> Self {
        Self { partition }
    }

    #[must_use]
    pub fn slot(&self) -> usize {
        self.partition.slot()
    }

    /// Process every group of the partition.
    ///
    /// The tracker receives a completion for every job index that was
    /// started, including one whose fit failed under `FailurePolicy::Abort`.
    pub fn run(self, ctx: &WorkerContext<'_>) -> Result<WorkerOutput, ForecastError> {
        let start = Instant::now();
        let slot = self.partition.slot();
        let mut results = HashMap::with_capacity(self.partition.job_count());
        let mut failures = 0;

        for (job_index, series) in self.partition.into_groups().into_iter().enumerate() {
            ctx.cancel.check_cancelled()?;

            let outcome = fit_with_policy(ctx, &series);
            let failure = outcome.as_ref().err().cloned();
            ctx.tracker.record_completion(slot, job_index)?;

            if let Some(reason) = failure {
                if ctx.policy == FailurePolicy::Abort {
                    ctx.cancel.cancel();
                    return Err(ForecastError::FitFailure {
                        group: series.id,
                        reason,
                    });
                }
                warn!(group = %series.id, slot, error = %reason, "fit failed, recording error");
                failures += 1;
            }

            debug!(group = %series.id, slot, job_index, "group complete");
            results.insert(series.id, outcome);
        }

        Ok(WorkerOutput {
            slot,
            results,
            failures,
            elapsed: start.elapsed(),
        })
    }
}

fn fit_with_policy(ctx: &WorkerContext<'_>, series: &Series) -> GroupOutcome {
    let retries = match ctx.policy {
        FailurePolicy::Retry { attempts } => attempts,
        FailurePolicy::Abort | FailurePolicy::Skip => 0,
    };

    let mut outcome = ctx.modeler.fit_predict(series, ctx.horizon);
    let mut attempt = 0;
    while outcome.is_err() && attempt < retries {
        attempt += 1;
        debug!(group = %series.id, attempt, "retrying fit");
        outcome = ctx.modeler.fit_predict(series, ctx.horizon);
    }
    outcome
}
