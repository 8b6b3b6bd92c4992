//! Core orchestration: partition, run workers, track progress, aggregate.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, warn};

use multifit_core::error::ForecastError;
use multifit_core::modeler::Modeler;
use multifit_core::options::{ExecutionMode, RunOptions};
use multifit_core::progress::CancellationToken;
use multifit_core::series::{GroupId, Series};
use multifit_core::GroupOutcome;

use crate::aggregate::aggregate;
use crate::interfaces::BarrierReporter;
use crate::partition::{job_counts, partition, WorkPartition};
use crate::tracker::ProgressTracker;
use crate::worker::{Worker, WorkerContext, WorkerOutput};

/// Facts about a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Name of the modeler used.
    pub modeler: String,
    /// Number of input groups.
    pub groups: usize,
    /// Number of worker slots.
    pub workers: usize,
    /// Job count per slot.
    pub job_counts: Vec<usize>,
    /// Groups whose fit failed and were recorded as errors.
    pub failures: usize,
    /// Job indices in the order their barriers were satisfied.
    pub reported_rows: Vec<usize>,
    /// Wall time of the run.
    pub elapsed: Duration,
}

/// Results of a run plus its summary.
#[derive(Debug)]
pub struct RunOutput {
    pub results: BTreeMap<GroupId, GroupOutcome>,
    pub summary: RunSummary,
}

/// A validated run: partitions plus the tracker shared by their workers.
pub struct RunPlan {
    partitions: Vec<WorkPartition>,
    tracker: Arc<ProgressTracker>,
    groups: usize,
}

impl RunPlan {
    /// Partition the input and build the tracker. Setup errors surface here,
    /// before any worker starts.
    pub fn new(
        series: Vec<Series>,
        opts: &RunOptions,
        reporter: Arc<dyn BarrierReporter>,
    ) -> Result<Self, ForecastError> {
        let workers = match opts.mode {
            ExecutionMode::Parallel => opts.workers,
            ExecutionMode::Iterative => 1,
        };
        let groups = series.len();
        let partitions = partition(series, workers)?;
        let tracker = Arc::new(ProgressTracker::new(job_counts(&partitions), reporter));
        Ok(Self {
            partitions,
            tracker,
            groups,
        })
    }

    /// Tracker shared by this plan's workers.
    #[must_use]
    pub fn tracker(&self) -> &Arc<ProgressTracker> {
        &self.tracker
    }

    /// Run every partition and merge the results.
    pub fn execute(self, modeler: &dyn Modeler, opts: &RunOptions) -> Result<RunOutput, ForecastError> {
        let start = Instant::now();
        let workers = self.partitions.len();
        let job_counts = job_counts(&self.partitions);

        let pool = match opts.mode {
            ExecutionMode::Parallel => Some(build_pool(workers)?),
            ExecutionMode::Iterative => None,
        };

        info!(
            groups = self.groups,
            workers,
            model = modeler.name(),
            "starting fit-predict run"
        );

        let cancel = CancellationToken::new();
        let ctx = WorkerContext {
            modeler,
            tracker: &self.tracker,
            policy: opts.failure_policy,
            horizon: opts.horizon,
            cancel: &cancel,
        };

        self.tracker.begin();
        let outcomes = match &pool {
            Some(pool) => run_on_pool(pool, self.partitions, &ctx),
            None => self
                .partitions
                .into_iter()
                .map(|p| Worker::new(p).run(&ctx))
                .collect(),
        };
        self.tracker.finish();

        let outputs = collect_outputs(outcomes)?;
        let failures = outputs.iter().map(|o| o.failures).sum();
        let results = aggregate(outputs)?;
        let elapsed = start.elapsed();

        info!(groups = results.len(), failures, ?elapsed, "fit-predict run finished");

        Ok(RunOutput {
            results,
            summary: RunSummary {
                modeler: modeler.name().to_string(),
                groups: self.groups,
                workers,
                job_counts,
                failures,
                reported_rows: self.tracker.reported_rows(),
                elapsed,
            },
        })
    }
}

/// Fit and predict every series, reporting synchronized progress.
pub fn run_fit_predict(
    series: Vec<Series>,
    modeler: &dyn Modeler,
    opts: &RunOptions,
    reporter: Arc<dyn BarrierReporter>,
) -> Result<RunOutput, ForecastError> {
    RunPlan::new(series, opts, reporter)?.execute(modeler, opts)
}

/// Like `run_fit_predict`, but gives up after `opts.stall_timeout`.
///
/// The run executes on a background thread; if it has not returned when
/// the timeout expires (a worker died or hangs), the job indices still
/// waiting on their barrier are returned as `StalledBarrier`. The
/// background thread is detached, not stopped.
pub fn run_with_watchdog(
    series: Vec<Series>,
    modeler: Arc<dyn Modeler>,
    opts: &RunOptions,
    reporter: Arc<dyn BarrierReporter>,
) -> Result<RunOutput, ForecastError> {
    let Some(timeout) = opts.stall_timeout else {
        return run_fit_predict(series, modeler.as_ref(), opts, reporter);
    };

    let plan = RunPlan::new(series, opts, reporter)?;
    let tracker = Arc::clone(plan.tracker());
    let (tx, rx) = crossbeam_channel::bounded(1);
    let run_opts = opts.clone();

    std::thread::Builder::new()
        .name("multifit-run".to_string())
        .spawn(move || {
            let _ = tx.send(plan.execute(modeler.as_ref(), &run_opts));
        })
        .map_err(|e| ForecastError::Config(format!("failed to spawn run thread: {e}")))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
            let pending = tracker.pending_rows();
            warn!(?timeout, ?pending, "run stalled");
            Err(ForecastError::StalledBarrier { timeout, pending })
        }
    }
}

fn build_pool(workers: usize) -> Result<ThreadPool, ForecastError> {
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("multifit-worker-{i}"))
        .build()
        .map_err(|e| ForecastError::Config(format!("failed to create thread pool: {e}")))
}

/// Run each partition on its own pool thread: thread `i` owns slot `i`.
fn run_on_pool(
    pool: &ThreadPool,
    partitions: Vec<WorkPartition>,
    ctx: &WorkerContext<'_>,
) -> Vec<Result<WorkerOutput, ForecastError>> {
    let slots: Vec<Mutex<Option<WorkPartition>>> =
        partitions.into_iter().map(|p| Mutex::new(Some(p))).collect();

    pool.broadcast(|thread| {
        let partition = slots[thread.index()].lock().take();
        match partition {
            Some(partition) => Worker::new(partition).run(ctx),
            None => Err(ForecastError::Config(format!(
                "no partition for worker thread {}",
                thread.index()
            ))),
        }
    })
}

/// Keep the first real error; `Cancelled` only wins when nothing else failed.
fn collect_outputs(
    outcomes: Vec<Result<WorkerOutput, ForecastError>>,
) -> Result<Vec<WorkerOutput>, ForecastError> {
    let mut outputs = Vec::with_capacity(outcomes.len());
    let mut first_error: Option<ForecastError> = None;
    let mut cancelled = false;

    for outcome in outcomes {
        match outcome {
            Ok(output) => outputs.push(output),
            Err(ForecastError::Cancelled) => cancelled = true,
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    if cancelled {
        return Err(ForecastError::Cancelled);
    }
    Ok(outputs)
}
