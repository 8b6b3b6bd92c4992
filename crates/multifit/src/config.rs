//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use multifit_cli::output::PredictionLayout;
use multifit_core::constants::{DEFAULT_HORIZON, DEFAULT_MODEL, DEFAULT_SEASON};
use multifit_core::error::ForecastError;
use multifit_core::options::{ExecutionMode, FailurePolicy, RunOptions};

/// What to do when a group's fit fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicyArg {
    /// Stop the run.
    Abort,
    /// Record the failure and continue.
    Skip,
    /// Retry the fit, then skip.
    Retry,
}

/// multifit: fit a forecasting model to every group of a wide CSV file in
/// parallel, with a synchronized progress table.
#[derive(Parser, Debug)]
#[command(name = "multifit", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Input CSV: one row per group.
    #[arg(short, long, env = "MULTIFIT_INPUT", required_unless_present = "completion")]
    pub input: Option<PathBuf>,

    /// Predictions output path (.csv or .json).
    #[arg(short, long, env = "MULTIFIT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Header of the group identifier column.
    #[arg(long, default_value = "id", env = "MULTIFIT_ID_COLUMN")]
    pub id_column: String,

    /// Prefix of the observation column headers.
    #[arg(long, default_value = "d_", env = "MULTIFIT_VALUE_PREFIX")]
    pub value_prefix: String,

    /// Number of parallel workers (0 = one per CPU).
    #[arg(short, long, default_value = "0", env = "MULTIFIT_WORKERS")]
    pub workers: usize,

    /// Periods to predict per group.
    #[arg(long, default_value_t = DEFAULT_HORIZON, env = "MULTIFIT_HORIZON")]
    pub horizon: usize,

    /// Model: naive, seasonal-naive, mean, ses, or holt.
    #[arg(short, long, default_value = DEFAULT_MODEL, env = "MULTIFIT_MODEL")]
    pub model: String,

    /// Season length for seasonal models.
    #[arg(long, default_value_t = DEFAULT_SEASON, env = "MULTIFIT_SEASON")]
    pub season: usize,

    /// Failure handling for individual groups.
    #[arg(long, value_enum, default_value = "skip", env = "MULTIFIT_FAILURE_POLICY")]
    pub failure_policy: FailurePolicyArg,

    /// Extra attempts per group with `--failure-policy retry`.
    #[arg(long, default_value = "2", env = "MULTIFIT_RETRIES")]
    pub retries: u32,

    /// Give up when the run has not finished after this long (e.g. "30m", "90s").
    #[arg(long, env = "MULTIFIT_STALL_TIMEOUT")]
    pub stall_timeout: Option<String>,

    /// Write CSV predictions as `{id}_validation` and `{id}_evaluation` rows,
    /// each holding half the horizon.
    #[arg(long, env = "MULTIFIT_SUBMISSION")]
    pub submission: bool,

    /// Fit every group on one thread.
    #[arg(long)]
    pub serial: bool,

    /// Print a live completion status line after each progress row.
    #[arg(long)]
    pub status: bool,

    /// Suppress notifications and the summary.
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse the stall timeout, if any.
    pub fn stall_timeout_duration(&self) -> Result<Option<Duration>, ForecastError> {
        self.stall_timeout
            .as_deref()
            .map(|s| {
                parse_duration(s)
                    .ok_or_else(|| ForecastError::Config(format!("invalid stall timeout: {s}")))
            })
            .transpose()
    }

    /// Layout of a CSV predictions file. The submission layout needs an even
    /// horizon.
    pub fn prediction_layout(&self) -> Result<PredictionLayout, ForecastError> {
        if !self.submission {
            return Ok(PredictionLayout::Wide);
        }
        if self.horizon % 2 != 0 {
            return Err(ForecastError::Config(format!(
                "--submission needs an even horizon, got {}",
                self.horizon
            )));
        }
        Ok(PredictionLayout::Submission)
    }

    /// Build normalized run options.
    pub fn run_options(&self) -> Result<RunOptions, ForecastError> {
        let failure_policy = match self.failure_policy {
            FailurePolicyArg::Abort => FailurePolicy::Abort,
            FailurePolicyArg::Skip => FailurePolicy::Skip,
            FailurePolicyArg::Retry => FailurePolicy::Retry {
                attempts: self.retries,
            },
        };
        let mode = if self.serial {
            ExecutionMode::Iterative
        } else {
            ExecutionMode::Parallel
        };
        Ok(RunOptions {
            workers: self.workers,
            horizon: self.horizon,
            failure_policy,
            mode,
            stall_timeout: self.stall_timeout_duration()?,
        }
        .normalize())
    }
}

/// Parse a duration string like "5m", "1h", "30s".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_secs(n))
    }
}
