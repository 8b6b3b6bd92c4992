//! Modeler factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::constants::{DEFAULT_MEAN_WINDOW, DEFAULT_SEASON};
use crate::error::{ForecastError, ModelError};
use crate::modeler::{CheckedModeler, CoreModeler, Modeler};
use crate::models::{HoltLinear, MovingMean, Naive, SeasonalNaive, SimpleExponentialSmoothing};

/// Factory trait for resolving modelers by name.
pub trait ModelerFactory: Send + Sync {
    /// Get or create a modeler by name.
    fn get(&self, name: &str) -> Result<Arc<dyn Modeler>, ForecastError>;

    /// List all available modeler names.
    fn available(&self) -> Vec<&str>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory {
    season: usize,
    window: usize,
    cache: RwLock<HashMap<String, Arc<dyn Modeler>>>,
}

impl DefaultFactory {
    /// Create a factory with the default season length and mean window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(DEFAULT_SEASON, DEFAULT_MEAN_WINDOW)
    }

    /// Create a factory with explicit season length and mean window.
    #[must_use]
    pub fn with_params(season: usize, window: usize) -> Self {
        Self {
            season,
            window,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn create_modeler(&self, name: &str) -> Result<Arc<dyn Modeler>, ForecastError> {
        let core: Arc<dyn CoreModeler> = match name {
            "naive" => Arc::new(Naive::new()),
            "seasonal-naive" | "snaive" => {
                Arc::new(SeasonalNaive::new(self.season).map_err(config_error)?)
            }
            "mean" => Arc::new(MovingMean::new(self.window).map_err(config_error)?),
            "ses" => Arc::new(SimpleExponentialSmoothing::auto()),
            "holt" => Arc::new(HoltLinear::new(0.3, 0.1).map_err(config_error)?),
            _ => return Err(ForecastError::Config(format!("unknown model: {name}"))),
        };
        Ok(Arc::new(CheckedModeler::new(core)))
    }
}

fn config_error(err: ModelError) -> ForecastError {
    ForecastError::Config(err.to_string())
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelerFactory for DefaultFactory {
    fn get(&self, name: &str) -> Result<Arc<dyn Modeler>, ForecastError> {
        if let Some(modeler) = self.cache.read().get(name) {
            return Ok(Arc::clone(modeler));
        }

        let modeler = self.create_modeler(name)?;
        self.cache
            .write()
            .insert(name.to_string(), Arc::clone(&modeler));
        Ok(modeler)
    }

    fn available(&self) -> Vec<&str> {
        vec!["naive", "seasonal-naive", "mean", "ses", "holt"]
    }
}
