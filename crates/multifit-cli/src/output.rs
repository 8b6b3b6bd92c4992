//! Formatting helpers and prediction file output.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use multifit_core::series::GroupId;
use multifit_core::GroupOutcome;

/// Error writing a predictions file.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("submission layout needs an even horizon, got {0}")]
    OddHorizon(usize),
}

/// Shape of a CSV predictions file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionLayout {
    /// One row per group: `id,F_1..F_horizon`.
    #[default]
    Wide,
    /// Two rows per group: `{id}_validation` with the first half of the
    /// horizon and `{id}_evaluation` with the second, both under
    /// `id,F_1..F_{horizon/2}`. Validation rows come first.
    Submission,
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a split as `H:MM:SS`, truncated to whole seconds.
#[must_use]
pub fn format_split(d: Duration) -> String {
    let total = d.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

/// Format a time since the Unix epoch as a UTC `HH:MM:SS` clock.
#[must_use]
pub fn format_clock(since_epoch: Duration) -> String {
    let secs = since_epoch.as_secs() % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Write predictions to `path`: JSON when the extension is `.json`, CSV in
/// `layout` otherwise.
pub fn write_predictions(
    path: &Path,
    results: &BTreeMap<GroupId, GroupOutcome>,
    horizon: usize,
    layout: PredictionLayout,
) -> Result<(), OutputError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json && layout == PredictionLayout::Submission && horizon % 2 != 0 {
        return Err(OutputError::OddHorizon(horizon));
    }
    let file = BufWriter::new(File::create(path)?);
    match (is_json, layout) {
        (true, _) => write_predictions_json(file, results),
        (false, PredictionLayout::Wide) => write_predictions_csv(file, results, horizon),
        (false, PredictionLayout::Submission) => write_submission_csv(file, results, horizon),
    }
}

fn header(columns: usize) -> Vec<String> {
    let mut header = Vec::with_capacity(columns + 1);
    header.push("id".to_string());
    header.extend((1..=columns).map(|i| format!("F_{i}")));
    header
}

/// Cells `range` of a group's forecast; empty when its fit failed.
fn forecast_cells(outcome: &GroupOutcome, range: std::ops::Range<usize>) -> Vec<String> {
    match outcome {
        Ok(forecast) => forecast
            .values()
            .get(range)
            .unwrap_or_default()
            .iter()
            .map(f64::to_string)
            .collect(),
        Err(_) => vec![String::new(); range.len()],
    }
}

/// CSV with header `id,F_1..F_horizon`; failed groups get empty cells.
pub fn write_predictions_csv<W: Write>(
    out: W,
    results: &BTreeMap<GroupId, GroupOutcome>,
    horizon: usize,
) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(header(horizon))?;

    for (id, outcome) in results {
        let mut record = vec![id.to_string()];
        record.extend(forecast_cells(outcome, 0..horizon));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// CSV in the validation/evaluation submission layout. `horizon` must be even.
pub fn write_submission_csv<W: Write>(
    out: W,
    results: &BTreeMap<GroupId, GroupOutcome>,
    horizon: usize,
) -> Result<(), OutputError> {
    if horizon % 2 != 0 {
        return Err(OutputError::OddHorizon(horizon));
    }
    let half = horizon / 2;
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(header(half))?;

    for (suffix, range) in [("validation", 0..half), ("evaluation", half..horizon)] {
        for (id, outcome) in results {
            let mut record = vec![format!("{id}_{suffix}")];
            record.extend(forecast_cells(outcome, range.clone()));
            writer.write_record(&record)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// JSON object mapping each group to its forecast, or `null` when its fit failed.
pub fn write_predictions_json<W: Write>(
    out: W,
    results: &BTreeMap<GroupId, GroupOutcome>,
) -> Result<(), OutputError> {
    let forecasts: BTreeMap<&GroupId, Option<&[f64]>> = results
        .iter()
        .map(|(id, outcome)| (id, outcome.as_ref().ok().map(|f| f.values())))
        .collect();
    serde_json::to_writer_pretty(out, &forecasts)?;
    Ok(())
}
