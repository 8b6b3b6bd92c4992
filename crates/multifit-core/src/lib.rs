//! # multifit-core
//!
//! Core types for the multifit forecaster: series and forecasts, the
//! pluggable `Modeler` strategy with its built-in algorithms, run options,
//! cancellation, and the error taxonomy shared by every crate.

pub mod constants;
pub mod error;
pub mod modeler;
pub mod models;
pub mod options;
pub mod progress;
pub mod registry;
pub mod series;

// Re-exports
pub use constants::{exit_codes, DEFAULT_HORIZON, DEFAULT_SEASON};
pub use error::{ForecastError, ModelError};
pub use modeler::{CheckedModeler, CoreModeler, Modeler};
pub use options::{ExecutionMode, FailurePolicy, RunOptions};
pub use progress::CancellationToken;
pub use registry::{DefaultFactory, ModelerFactory};
pub use series::{Forecast, GroupId, Series};

/// Outcome of fitting one group: a forecast, or the model error recorded
/// in its place.
pub type GroupOutcome = Result<Forecast, ModelError>;
