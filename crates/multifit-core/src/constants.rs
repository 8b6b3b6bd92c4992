//! Constants for forecasting defaults and progress table layout.

/// Default number of periods predicted per group.
pub const DEFAULT_HORIZON: usize = 56;

/// Default season length (weekly seasonality on daily data).
pub const DEFAULT_SEASON: usize = 7;

/// Default window for the moving-mean forecaster.
pub const DEFAULT_MEAN_WINDOW: usize = 28;

/// Default modeler name.
pub const DEFAULT_MODEL: &str = "ses";

/// Total width of a progress table line, in characters.
pub const TABLE_WIDTH: usize = 120;

/// Base width of the wall-clock column.
pub const TIME_COLUMN_WIDTH: usize = 12;

/// Width of the "Job # / Total" column.
pub const JOB_COLUMN_WIDTH: usize = 17;

/// Exit codes returned by the `multifit` binary.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// The run stalled past the watchdog timeout.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// A partitioning or aggregation invariant was violated.
    pub const ERROR_INVARIANT: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Run stopped early after a worker aborted.
    pub const ERROR_CANCELED: i32 = 130;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_columns_fit_in_table() {
        assert!(TIME_COLUMN_WIDTH + JOB_COLUMN_WIDTH < TABLE_WIDTH);
    }

    #[test]
    fn exit_codes_distinct() {
        let codes = [
            exit_codes::SUCCESS,
            exit_codes::ERROR_GENERIC,
            exit_codes::ERROR_TIMEOUT,
            exit_codes::ERROR_INVARIANT,
            exit_codes::ERROR_CONFIG,
            exit_codes::ERROR_CANCELED,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
