//! Wide CSV input: one row per group, one column per observation.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use multifit_core::series::Series;

/// Error reading the input file.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("group column '{0}' not found in header")]
    MissingIdColumn(String),

    #[error("no observation columns start with '{0}'")]
    NoValueColumns(String),

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidValue {
        row: u64,
        column: String,
        value: String,
    },
}

/// Column selection for a wide CSV file.
#[derive(Debug, Clone)]
pub struct InputFormat {
    /// Header of the group identifier column.
    pub id_column: String,
    /// Prefix shared by every observation column header.
    pub value_prefix: String,
}

impl Default for InputFormat {
    fn default() -> Self {
        Self {
            id_column: "id".to_string(),
            value_prefix: "d_".to_string(),
        }
    }
}

/// Read every group from a wide CSV file.
pub fn read_series_file(path: &Path, format: &InputFormat) -> Result<Vec<Series>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_series(BufReader::new(file), format)
}

/// Read every group from wide CSV data.
pub fn read_series<R: Read>(input: R, format: &InputFormat) -> Result<Vec<Series>, InputError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let id_idx = headers
        .iter()
        .position(|h| h == format.id_column)
        .ok_or_else(|| InputError::MissingIdColumn(format.id_column.clone()))?;
    let value_cols: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|&(i, h)| i != id_idx && h.starts_with(&format.value_prefix))
        .map(|(i, _)| i)
        .collect();
    if value_cols.is_empty() {
        return Err(InputError::NoValueColumns(format.value_prefix.clone()));
    }

    let mut series = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row = record.position().map_or(0, csv::Position::line);
        let id = record.get(id_idx).unwrap_or_default();

        let values = value_cols
            .iter()
            .map(|&col| {
                let cell = record.get(col).unwrap_or_default().trim();
                cell.parse::<f64>().map_err(|_| InputError::InvalidValue {
                    row,
                    column: headers.get(col).unwrap_or_default().to_string(),
                    value: cell.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        series.push(Series::new(id, values));
    }

    debug!(groups = series.len(), observations = value_cols.len(), "read input");
    Ok(series)
}
