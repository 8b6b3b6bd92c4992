//! End-of-run summary presenter.

use multifit_orchestration::orchestrator::RunSummary;

use crate::output::{format_duration, format_number};
use crate::ui;

/// Prints the summary of a finished run.
pub struct SummaryPresenter {
    quiet: bool,
}

impl SummaryPresenter {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Lines describing a run.
    #[must_use]
    pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
        let max_jobs = summary.job_counts.iter().copied().max().unwrap_or(0);
        let mut lines = vec![
            format!("Model: {}", summary.modeler),
            format!(
                "Groups: {} across {} workers ({} jobs max per worker)",
                format_number(summary.groups),
                summary.workers,
                format_number(max_jobs)
            ),
            format!("Duration: {}", format_duration(summary.elapsed)),
        ];
        if summary.failures > 0 {
            lines.push(format!(
                "Failed fits: {} (recorded without forecast)",
                format_number(summary.failures)
            ));
        }
        let out_of_order = summary
            .reported_rows
            .windows(2)
            .filter(|pair| pair[1] < pair[0])
            .count();
        if out_of_order > 0 {
            lines.push(format!("Rows reported out of order: {out_of_order}"));
        }
        lines
    }

    pub fn present_summary(&self, summary: &RunSummary) {
        if self.quiet {
            return;
        }
        let mut lines = Self::summary_lines(summary).into_iter();
        if let Some(first) = lines.next() {
            ui::print_end(&first);
        }
        for line in lines {
            println!("  {line}");
        }
    }

    pub fn present_error(&self, error: &str) {
        ui::print_error(error);
    }
}
