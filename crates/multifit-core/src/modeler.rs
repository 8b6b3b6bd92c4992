//! Modeler traits and the `CheckedModeler` decorator.
//!
//! `Modeler` is the public fit-predict strategy consumed by orchestration.
//! `CoreModeler` is the internal trait implemented by forecasting algorithms.
//! `CheckedModeler` wraps a core model with input and output validation so
//! every algorithm sees finite, non-empty data and returns `horizon` values.

use std::sync::Arc;

use tracing::trace;

use crate::error::ModelError;
use crate::series::{Forecast, Series};

/// Public fit-predict strategy, consumed by workers.
pub trait Modeler: Send + Sync {
    /// Fit a model to `series` and predict the next `horizon` periods.
    fn fit_predict(&self, series: &Series, horizon: usize) -> Result<Forecast, ModelError>;

    /// Name of this modeler.
    fn name(&self) -> &str;
}

/// Internal trait for forecasting algorithms.
/// Wrapped by `CheckedModeler`, which validates inputs and outputs.
pub trait CoreModeler: Send + Sync {
    /// Fit on validated observations and predict `horizon` values.
    fn forecast(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>, ModelError>;

    /// Minimum number of observations the algorithm needs.
    fn min_observations(&self) -> usize {
        1
    }

    /// Name of the algorithm.
    fn name(&self) -> &'static str;
}

/// Decorator adding validation around a `CoreModeler`.
pub struct CheckedModeler {
    core: Arc<dyn CoreModeler>,
}

impl CheckedModeler {
    #[must_use]
    pub fn new(core: Arc<dyn CoreModeler>) -> Self {
        Self { core }
    }
}

impl Modeler for CheckedModeler {
    fn fit_predict(&self, series: &Series, horizon: usize) -> Result<Forecast, ModelError> {
        let required = self.core.min_observations();
        if series.len() < required {
            return Err(ModelError::InsufficientData {
                required,
                actual: series.len(),
            });
        }
        if series.values.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite);
        }

        let values = self.core.forecast(&series.values, horizon)?;
        if values.len() != horizon || values.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite);
        }

        trace!(group = %series.id, model = self.core.name(), "fit complete");
        Ok(Forecast::new(values))
    }

    fn name(&self) -> &str {
        self.core.name()
    }
}
