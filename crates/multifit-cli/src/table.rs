//! Console progress table.
//!
//! Renders the synchronized progress stream as a fixed-width table: one row
//! per globally complete job index, one column per worker slot.

use std::io::{self, Write};

use parking_lot::Mutex;
use tracing::warn;

use multifit_core::constants::{JOB_COLUMN_WIDTH, TABLE_WIDTH, TIME_COLUMN_WIDTH};
use multifit_orchestration::interfaces::{BarrierReport, BarrierReporter, RunLayout};

use crate::output::{format_clock, format_split};

/// Widest split cell, `H:MM:SS`. Splits of ten hours or more widen their row.
const SPLIT_CELL_WIDTH: usize = 7;

/// Column widths for a given worker count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    workers: usize,
    time_width: usize,
    job_width: usize,
    worker_width: usize,
}

impl TableLayout {
    /// Layout for `workers` slots showing job rows only.
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self::with_cells(workers, 0, 0)
    }

    /// Layout wide enough for every cell a run can print, including the
    /// `completed / total` cells of the status row when `status_line` is set.
    #[must_use]
    pub fn for_run(layout: &RunLayout, status_line: bool) -> Self {
        let mut job_cell = count_pair_width(layout.max_jobs());
        let mut worker_cell = 0;
        if status_line {
            let total = layout.job_counts.iter().sum();
            job_cell = job_cell.max(count_pair_width(total));
            worker_cell = layout
                .job_counts
                .iter()
                .map(|&n| count_pair_width(n))
                .max()
                .unwrap_or(0);
        }
        Self::with_cells(layout.workers, job_cell, worker_cell)
    }

    /// Split the table width across the time, job and worker columns.
    ///
    /// Worker columns share what the fixed columns leave of `TABLE_WIDTH`
    /// and the remainder goes to the time column. When an even share cannot
    /// hold the widest worker cell, every worker column gets exactly that
    /// width and the table grows past `TABLE_WIDTH`.
    fn with_cells(workers: usize, job_cell: usize, worker_cell: usize) -> Self {
        let workers = workers.max(1);
        let job_width = JOB_COLUMN_WIDTH.max(job_cell + 3);
        let worker_cell = worker_cell
            .max(SPLIT_CELL_WIDTH)
            .max(format!("P_{workers}").len());
        let min_worker_width = worker_cell + 3;

        let available = TABLE_WIDTH.saturating_sub(TIME_COLUMN_WIDTH + job_width);
        let worker_width = available / workers;
        if worker_width < min_worker_width {
            return Self {
                workers,
                time_width: TIME_COLUMN_WIDTH,
                job_width,
                worker_width: min_worker_width,
            };
        }
        Self {
            workers,
            time_width: TIME_COLUMN_WIDTH + available - worker_width * workers,
            job_width,
            worker_width,
        }
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Total line width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.time_width + self.job_width + self.worker_width * self.workers
    }

    /// `+----+----+...+`
    #[must_use]
    pub fn divider(&self) -> String {
        let mut line = String::with_capacity(self.width());
        line.push('+');
        line.push_str(&"-".repeat(self.time_width - 2));
        line.push('+');
        line.push_str(&"-".repeat(self.job_width - 1));
        line.push('+');
        for _ in 0..self.workers {
            line.push_str(&"-".repeat(self.worker_width - 1));
            line.push('+');
        }
        line
    }

    /// `| Time | Job # / Total | P_1 | ... |`
    #[must_use]
    pub fn title(&self) -> String {
        let cells: Vec<String> = (1..=self.workers).map(|i| format!("P_{i}")).collect();
        self.row("Time", "Job # / Total", &cells)
    }

    /// One right-aligned row; missing worker cells are left blank.
    #[must_use]
    pub fn row(&self, time: &str, job: &str, cells: &[String]) -> String {
        let mut line = String::with_capacity(self.width());
        line.push_str(&format!("| {time:>w$} |", w = self.time_width - 4));
        line.push_str(&format!(" {job:>w$} |", w = self.job_width - 3));
        for slot in 0..self.workers {
            let cell = cells.get(slot).map_or("", String::as_str);
            line.push_str(&format!(" {cell:>w$} |", w = self.worker_width - 3));
        }
        line
    }
}

struct TableState<W> {
    out: W,
    layout: Option<TableLayout>,
    /// Length of a status row still on screen, to be cleared before the next write.
    status_len: usize,
}

/// `BarrierReporter` that draws the progress table to a writer.
pub struct TableReporter<W: Write + Send> {
    state: Mutex<TableState<W>>,
    status_line: bool,
}

impl<W: Write + Send> TableReporter<W> {
    /// Reporter writing to `out`; `status_line` adds a live
    /// `completed / total` row under the last job row.
    pub fn with_writer(out: W, status_line: bool) -> Self {
        Self {
            state: Mutex::new(TableState {
                out,
                layout: None,
                status_len: 0,
            }),
            status_line,
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.state.into_inner().out
    }
}

impl TableReporter<io::Stdout> {
    #[must_use]
    pub fn stdout(status_line: bool) -> Self {
        Self::with_writer(io::stdout(), status_line)
    }
}

impl<W: Write + Send> TableState<W> {
    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        if self.status_len > 0 {
            write!(self.out, "\r{}\r", " ".repeat(self.status_len))?;
            self.status_len = 0;
        }
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }

    fn write_status(&mut self, status: &str) -> io::Result<()> {
        write!(self.out, "{status}\r")?;
        self.status_len = status.chars().count();
        self.out.flush()
    }
}

/// Same-template row with jobs completed so far, overall and per slot.
fn status_row(table: &TableLayout, report: &BarrierReport) -> String {
    let cells: Vec<String> = report
        .completed
        .iter()
        .zip(&report.job_counts)
        .map(|(done, total)| format!("{done} / {total}"))
        .collect();
    table.row(
        &format_clock(report.wall_clock),
        &format!("{} / {}", report.total_completed(), report.total_jobs()),
        &cells,
    )
}

/// Width of a `"{n} / {n}"` cell.
fn count_pair_width(n: usize) -> usize {
    2 * n.to_string().len() + 3
}

impl<W: Write + Send> BarrierReporter for TableReporter<W> {
    fn begin(&self, layout: &RunLayout) {
        let table = TableLayout::for_run(layout, self.status_line);
        let mut state = self.state.lock();
        let lines = [table.divider(), table.title(), table.divider()];
        state.layout = Some(table);
        if let Err(e) = state.write_lines(&lines) {
            warn!(error = %e, "failed to write progress table header");
        }
    }

    fn report(&self, report: &BarrierReport) {
        let mut state = self.state.lock();
        let Some(table) = state.layout.clone() else {
            warn!(job_index = report.job_index, "progress row reported before begin");
            return;
        };

        let cells: Vec<String> = report
            .splits
            .iter()
            .map(|split| split.map_or_else(|| "-".to_string(), format_split))
            .collect();
        let row = table.row(
            &format_clock(report.wall_clock),
            &format!("{} / {}", report.job_index + 1, report.max_jobs),
            &cells,
        );

        let mut result = state.write_lines(&[row]);
        if result.is_ok() && self.status_line {
            result = state.write_status(&status_row(&table, report));
        }
        if let Err(e) = result {
            warn!(error = %e, job_index = report.job_index, "failed to write progress row");
        }
    }

    fn finish(&self) {
        let mut state = self.state.lock();
        let Some(table) = state.layout.clone() else {
            return;
        };
        if let Err(e) = state.write_lines(&[table.divider()]) {
            warn!(error = %e, "failed to write progress table trailer");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn report(job_index: usize, splits: Vec<Option<Duration>>) -> BarrierReport {
        BarrierReport {
            job_index,
            max_jobs: 3,
            wall_clock: Duration::from_secs(13 * 3600 + 5 * 60 + 9),
            completed: vec![job_index + 1; splits.len()],
            job_counts: vec![3; splits.len()],
            splits,
        }
    }

    fn render(status: bool, events: impl FnOnce(&TableReporter<Vec<u8>>)) -> String {
        let reporter = TableReporter::with_writer(Vec::new(), status);
        events(&reporter);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn every_line_matches_layout_width() {
        for workers in 1..=64 {
            let layout = TableLayout::new(workers);
            let splits = vec![format_split(Duration::from_secs(3599)); workers];
            let row = layout.row("13:05:09", "30490 / 30490", &splits);
            assert_eq!(layout.divider().len(), layout.width(), "workers = {workers}");
            assert_eq!(layout.title().len(), layout.width(), "workers = {workers}");
            assert_eq!(row.len(), layout.width(), "workers = {workers}");
        }
    }

    #[test]
    fn layout_fills_table_width_while_cells_fit() {
        // 91 columns leave at least 10 per worker up to 9 workers.
        for workers in 1..=9 {
            assert_eq!(TableLayout::new(workers).width(), TABLE_WIDTH, "workers = {workers}");
        }
        assert!(TableLayout::new(10).width() > TABLE_WIDTH);
    }

    #[test]
    fn layout_remainder_goes_to_time_column() {
        // 91 columns across 4 workers: 22 each, 3 left over.
        let layout = TableLayout::new(4);
        assert_eq!(layout.worker_width, 22);
        assert_eq!(layout.time_width, TIME_COLUMN_WIDTH + 3);
    }

    #[test]
    fn layout_grows_to_widest_cell() {
        let layout = TableLayout::new(16);
        assert_eq!(layout.worker_width, SPLIT_CELL_WIDTH + 3);
        assert_eq!(layout.time_width, TIME_COLUMN_WIDTH);
        assert_eq!(layout.width(), TIME_COLUMN_WIDTH + JOB_COLUMN_WIDTH + 16 * 10);

        // "P_100000" is wider than a split.
        assert_eq!(TableLayout::new(100_000).worker_width, 11);
    }

    #[test]
    fn status_layout_fits_large_counts() {
        let run = RunLayout {
            workers: 4,
            job_counts: vec![250_000; 4],
        };
        let table = TableLayout::for_run(&run, true);
        let mut r = report(0, vec![None; 4]);
        r.completed = vec![250_000; 4];
        r.job_counts = vec![250_000; 4];
        assert_eq!(status_row(&table, &r).len(), table.width());
        assert_eq!(table.title().len(), table.width());
        let small = RunLayout {
            workers: 4,
            job_counts: vec![3; 4],
        };
        assert_eq!(TableLayout::for_run(&small, true), TableLayout::new(4));
    }

    #[test]
    fn layout_zero_workers_treated_as_one() {
        assert_eq!(TableLayout::new(0).workers(), 1);
    }

    #[test]
    fn title_cells() {
        let title = TableLayout::new(2).title();
        assert!(title.starts_with("| "));
        assert!(title.contains(" Time |"));
        assert!(title.contains(" Job # / Total |"));
        assert!(title.contains(" P_1 |"));
        assert!(title.ends_with(" P_2 |"));
    }

    #[test]
    fn begin_and_finish_frame_the_table() {
        let text = render(false, |r| {
            r.begin(&RunLayout {
                workers: 2,
                job_counts: vec![3, 2],
            });
            r.finish();
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("+-"));
        assert!(lines[1].contains("P_2"));
        assert_eq!(lines[0], lines[2]);
        assert_eq!(lines[0], lines[3]);
    }

    #[test]
    fn report_row_contents() {
        let text = render(false, |r| {
            r.begin(&RunLayout {
                workers: 2,
                job_counts: vec![3, 2],
            });
            r.report(&report(2, vec![Some(Duration::from_secs(65)), None]));
        });
        let row = text.lines().nth(3).unwrap();
        assert!(row.contains(" 13:05:09 |"));
        assert!(row.contains(" 3 / 3 |"));
        assert!(row.contains(" 0:01:05 |"));
        assert!(row.ends_with(" - |"));
        assert_eq!(row.len(), TABLE_WIDTH);
    }

    #[test]
    fn status_line_is_cleared_before_next_write() {
        let text = render(true, |r| {
            r.begin(&RunLayout {
                workers: 1,
                job_counts: vec![3],
            });
            r.report(&report(0, vec![Some(Duration::from_secs(1))]));
            r.finish();
        });
        let status = status_row(&TableLayout::new(1), &report(0, vec![None]));
        assert!(status.contains(" 13:05:09 |"));
        assert!(status.ends_with(" 1 / 3 |"));
        assert!(text.contains(&format!("{status}\r")));
        assert!(text.trim_end().ends_with('+'));
    }

    #[test]
    fn report_before_begin_writes_nothing() {
        let text = render(false, |r| {
            r.report(&report(0, vec![None]));
            r.finish();
        });
        assert!(text.is_empty());
    }

    #[test]
    fn status_row_totals() {
        let mut r = report(0, vec![Some(Duration::ZERO), None]);
        r.completed = vec![2, 0];
        r.job_counts = vec![3, 1];
        let row = status_row(&TableLayout::new(2), &r);
        assert!(row.contains(" 2 / 4 |"));
        assert!(row.contains(" 2 / 3 |"));
        assert!(row.ends_with(" 0 / 1 |"));
        assert_eq!(row.len(), TABLE_WIDTH);
    }
}
