//! Cross-worker progress tracking with a per-job-index completion barrier.
//!
//! Every worker slot owns one column of the progress matrix and writes the
//! completion instant of each of its jobs exactly once. Job index `K` is
//! globally complete once every slot with more than `K` jobs has written
//! row `K`; slots with `job_count <= K` are excluded. The write and the
//! barrier check happen under one lock, so the reporter fires exactly once
//! per row, in the order rows are satisfied (which need not be ascending).

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tracing::debug;

use multifit_core::error::ForecastError;

use crate::interfaces::{BarrierReport, BarrierReporter, RunLayout};

/// Grid of completion instants, shape `(max_jobs, workers)`, row-major.
struct ProgressMatrix {
    job_counts: Vec<usize>,
    max_jobs: usize,
    cells: Vec<Option<Instant>>,
    completed: Vec<usize>,
    reported: Vec<bool>,
    report_order: Vec<usize>,
    started: Instant,
}

impl ProgressMatrix {
    fn new(job_counts: Vec<usize>) -> Self {
        let workers = job_counts.len();
        let max_jobs = job_counts.iter().copied().max().unwrap_or(0);
        Self {
            cells: vec![None; max_jobs * workers],
            completed: vec![0; workers],
            reported: vec![false; max_jobs],
            report_order: Vec::with_capacity(max_jobs),
            max_jobs,
            job_counts,
            started: Instant::now(),
        }
    }

    fn workers(&self) -> usize {
        self.job_counts.len()
    }

    fn cell(&self, job_index: usize, slot: usize) -> Option<Instant> {
        self.cells[job_index * self.workers() + slot]
    }

    fn write(&mut self, slot: usize, job_index: usize, at: Instant) -> Result<(), ForecastError> {
        let invalid = |reason| ForecastError::InvalidCompletion {
            slot,
            job_index,
            reason,
        };
        if slot >= self.workers() {
            return Err(invalid("no such worker slot"));
        }
        if job_index >= self.job_counts[slot] {
            return Err(invalid("job index beyond the slot's job count"));
        }
        let idx = job_index * self.workers() + slot;
        if self.cells[idx].is_some() {
            return Err(invalid("job already recorded"));
        }
        self.cells[idx] = Some(at);
        self.completed[slot] += 1;
        Ok(())
    }

    /// Whether every slot that has a job at `job_index` has recorded it.
    fn row_complete(&self, job_index: usize) -> bool {
        (0..self.workers())
            .filter(|&slot| self.job_counts[slot] > job_index)
            .all(|slot| self.cell(job_index, slot).is_some())
    }

    fn splits(&self, job_index: usize) -> Vec<Option<Duration>> {
        (0..self.workers())
            .map(|slot| {
                let current = self.cell(job_index, slot)?;
                let previous = if job_index == 0 {
                    self.started
                } else {
                    self.cell(job_index - 1, slot)?
                };
                Some(current.saturating_duration_since(previous))
            })
            .collect()
    }

    fn report_for(&self, job_index: usize) -> BarrierReport {
        BarrierReport {
            job_index,
            max_jobs: self.max_jobs,
            wall_clock: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default(),
            splits: self.splits(job_index),
            completed: self.completed.clone(),
            job_counts: self.job_counts.clone(),
        }
    }
}

/// Shared progress state reachable by every worker of a run.
pub struct ProgressTracker {
    matrix: Mutex<ProgressMatrix>,
    reporter: Arc<dyn BarrierReporter>,
}

impl ProgressTracker {
    /// Create a tracker for slots with the given job counts.
    #[must_use]
    pub fn new(job_counts: Vec<usize>, reporter: Arc<dyn BarrierReporter>) -> Self {
        Self {
            matrix: Mutex::new(ProgressMatrix::new(job_counts)),
            reporter,
        }
    }

    /// Stamp the run start and emit the reporter header.
    pub fn begin(&self) {
        let mut matrix = self.matrix.lock();
        matrix.started = Instant::now();
        let layout = RunLayout {
            workers: matrix.workers(),
            job_counts: matrix.job_counts.clone(),
        };
        self.reporter.begin(&layout);
    }

    /// Emit the reporter trailer.
    pub fn finish(&self) {
        let _matrix = self.matrix.lock();
        self.reporter.finish();
    }

    /// Record that `slot` finished its job at `job_index`.
    ///
    /// Returns `true` when this call completed the row's barrier and the
    /// row was reported.
    pub fn record_completion(&self, slot: usize, job_index: usize) -> Result<bool, ForecastError> {
        let now = Instant::now();
        let mut matrix = self.matrix.lock();
        matrix.write(slot, job_index, now)?;

        if matrix.reported[job_index] || !matrix.row_complete(job_index) {
            return Ok(false);
        }
        matrix.reported[job_index] = true;
        matrix.report_order.push(job_index);

        let report = matrix.report_for(job_index);
        debug!(job_index, slot, "job index globally complete");
        self.reporter.report(&report);
        Ok(true)
    }

    /// Number of worker slots.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.matrix.lock().workers()
    }

    /// Job indices reported so far, in the order they were reported.
    #[must_use]
    pub fn reported_rows(&self) -> Vec<usize> {
        self.matrix.lock().report_order.clone()
    }

    /// Job indices whose barrier is not yet satisfied, ascending.
    #[must_use]
    pub fn pending_rows(&self) -> Vec<usize> {
        let matrix = self.matrix.lock();
        (0..matrix.max_jobs)
            .filter(|&row| !matrix.reported[row])
            .collect()
    }

    /// Jobs completed so far per slot.
    #[must_use]
    pub fn completed_per_slot(&self) -> Vec<usize> {
        self.matrix.lock().completed.clone()
    }
}
