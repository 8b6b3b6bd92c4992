//! Orchestration interfaces.

use std::time::Duration;

use crossbeam_channel::Sender;

/// Shape of a run, handed to the reporter when the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    /// Number of worker slots.
    pub workers: usize,
    /// Job count of each slot, indexed by slot.
    pub job_counts: Vec<usize>,
}

impl RunLayout {
    /// Largest job count across slots.
    #[must_use]
    pub fn max_jobs(&self) -> usize {
        self.job_counts.iter().copied().max().unwrap_or(0)
    }
}

/// Snapshot taken when a job index becomes globally complete.
#[derive(Debug, Clone, PartialEq)]
pub struct BarrierReport {
    /// Job index whose barrier was just satisfied.
    pub job_index: usize,
    /// Largest job count across slots.
    pub max_jobs: usize,
    /// Wall-clock time of the evaluation, since the Unix epoch.
    pub wall_clock: Duration,
    /// Per slot: time since that slot's previous job (or run start for
    /// job 0); `None` for slots with no job at this index.
    pub splits: Vec<Option<Duration>>,
    /// Per slot: jobs completed so far.
    pub completed: Vec<usize>,
    /// Per slot: total jobs.
    pub job_counts: Vec<usize>,
}

impl BarrierReport {
    #[must_use]
    pub fn total_completed(&self) -> usize {
        self.completed.iter().sum()
    }

    #[must_use]
    pub fn total_jobs(&self) -> usize {
        self.job_counts.iter().sum()
    }
}

/// Trait for emitting the synchronized progress stream.
///
/// Implementations only format and write; the tracker decides when
/// `report` fires and guarantees it fires at most once per job index.
pub trait BarrierReporter: Send + Sync {
    /// Called once before any worker starts.
    fn begin(&self, layout: &RunLayout);

    /// Called once per globally complete job index.
    fn report(&self, report: &BarrierReport);

    /// Called once after every worker has returned.
    fn finish(&self);
}

/// Null reporter (does nothing).
pub struct NullReporter;

impl BarrierReporter for NullReporter {
    fn begin(&self, _layout: &RunLayout) {}
    fn report(&self, _report: &BarrierReport) {}
    fn finish(&self) {}
}

/// Event forwarded by `ChannelReporter`.
#[derive(Debug, Clone, PartialEq)]
pub enum ReporterEvent {
    Begin(RunLayout),
    Report(BarrierReport),
    Finish,
}

/// Reporter that forwards every event through a channel.
pub struct ChannelReporter {
    sender: Sender<ReporterEvent>,
}

impl ChannelReporter {
    #[must_use]
    pub fn new(sender: Sender<ReporterEvent>) -> Self {
        Self { sender }
    }
}

impl BarrierReporter for ChannelReporter {
    fn begin(&self, layout: &RunLayout) {
        let _ = self.sender.send(ReporterEvent::Begin(layout.clone()));
    }

    fn report(&self, report: &BarrierReport) {
        let _ = self.sender.send(ReporterEvent::Report(report.clone()));
    }

    fn finish(&self) {
        let _ = self.sender.send(ReporterEvent::Finish);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> BarrierReport {
        BarrierReport {
            job_index: 1,
            max_jobs: 3,
            wall_clock: Duration::from_secs(3600),
            splits: vec![Some(Duration::from_secs(2)), None],
            completed: vec![2, 1],
            job_counts: vec![3, 1],
        }
    }

    #[test]
    fn null_reporter() {
        let reporter = NullReporter;
        reporter.begin(&RunLayout {
            workers: 1,
            job_counts: vec![1],
        });
        reporter.report(&sample_report());
        reporter.finish();
    }

    #[test]
    fn report_totals() {
        let report = sample_report();
        assert_eq!(report.total_completed(), 3);
        assert_eq!(report.total_jobs(), 4);
    }

    #[test]
    fn layout_max_jobs() {
        let layout = RunLayout {
            workers: 3,
            job_counts: vec![2, 5, 0],
        };
        assert_eq!(layout.max_jobs(), 5);
    }

    #[test]
    fn channel_reporter_forwards_events_in_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let reporter = ChannelReporter::new(tx);
        let layout = RunLayout {
            workers: 2,
            job_counts: vec![3, 1],
        };
        reporter.begin(&layout);
        reporter.report(&sample_report());
        reporter.finish();

        assert_eq!(rx.try_recv().unwrap(), ReporterEvent::Begin(layout));
        assert!(matches!(rx.try_recv().unwrap(), ReporterEvent::Report(r) if r.job_index == 1));
        assert_eq!(rx.try_recv().unwrap(), ReporterEvent::Finish);
    }

    #[test]
    fn channel_reporter_closed_channel_does_not_panic() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let reporter = ChannelReporter::new(tx);
        reporter.report(&sample_report());
    }
}
