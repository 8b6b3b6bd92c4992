//! Built-in forecasting algorithms.
//!
//! These are simple baselines; any other algorithm can be
//! plugged in through `CoreModeler` or `Modeler`.

use crate::error::ModelError;
use crate::modeler::CoreModeler;

fn check_unit_interval(name: &str, value: f64) -> Result<(), ModelError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter {
            name: name.to_string(),
            reason: "must be between 0 and 1 (exclusive)".to_string(),
        })
    }
}

/// Fails with `InsufficientData` when `values` is shorter than `required`.
fn require(values: &[f64], required: usize) -> Result<(), ModelError> {
    if values.len() < required {
        return Err(ModelError::InsufficientData {
            required,
            actual: values.len(),
        });
    }
    Ok(())
}

fn check_positive(name: &str, value: usize) -> Result<(), ModelError> {
    if value == 0 {
        Err(ModelError::InvalidParameter {
            name: name.to_string(),
            reason: "must be at least 1".to_string(),
        })
    } else {
        Ok(())
    }
}

/// Repeats the last observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

impl Naive {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CoreModeler for Naive {
    fn forecast(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>, ModelError> {
        require(values, self.min_observations())?;
        Ok(vec![values[values.len() - 1]; horizon])
    }

    fn name(&self) -> &'static str {
        "Naive"
    }
}

/// Repeats the last full season.
#[derive(Debug, Clone, Copy)]
pub struct SeasonalNaive {
    period: usize,
}

impl SeasonalNaive {
    pub fn new(period: usize) -> Result<Self, ModelError> {
        check_positive("period", period)?;
        Ok(Self { period })
    }

    #[must_use]
    pub fn period(&self) -> usize {
        self.period
    }
}

impl CoreModeler for SeasonalNaive {
    fn forecast(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>, ModelError> {
        require(values, self.min_observations())?;
        let season = &values[values.len() - self.period..];
        Ok((0..horizon).map(|h| season[h % self.period]).collect())
    }

    fn min_observations(&self) -> usize {
        self.period
    }

    fn name(&self) -> &'static str {
        "SeasonalNaive"
    }
}

/// Mean of the trailing window.
#[derive(Debug, Clone, Copy)]
pub struct MovingMean {
    window: usize,
}

impl MovingMean {
    pub fn new(window: usize) -> Result<Self, ModelError> {
        check_positive("window", window)?;
        Ok(Self { window })
    }
}

impl CoreModeler for MovingMean {
    #[allow(clippy::cast_precision_loss)]
    fn forecast(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>, ModelError> {
        require(values, self.min_observations())?;
        let tail = &values[values.len().saturating_sub(self.window)..];
        let mean = tail.iter().sum::<f64>() / tail.len() as f64;
        Ok(vec![mean; horizon])
    }

    fn name(&self) -> &'static str {
        "MovingMean"
    }
}

/// Simple exponential smoothing: `S_t = α·Y_t + (1 − α)·S_{t−1}`.
///
/// With no fixed alpha, alpha is chosen per series by a grid search over
/// 0.01..=0.99 minimising the one-step-ahead squared error.
#[derive(Debug, Clone, Copy)]
pub struct SimpleExponentialSmoothing {
    alpha: Option<f64>,
}

impl SimpleExponentialSmoothing {
    pub fn new(alpha: f64) -> Result<Self, ModelError> {
        check_unit_interval("alpha", alpha)?;
        Ok(Self { alpha: Some(alpha) })
    }

    /// Smoothing with a per-series grid-searched alpha.
    #[must_use]
    pub fn auto() -> Self {
        Self { alpha: None }
    }

    fn level(alpha: f64, values: &[f64]) -> f64 {
        values[1..]
            .iter()
            .fold(values[0], |level, &y| alpha * y + (1.0 - alpha) * level)
    }

    fn one_step_sse(alpha: f64, values: &[f64]) -> f64 {
        let mut level = values[0];
        let mut sse = 0.0;
        for &y in &values[1..] {
            let err = y - level;
            sse += err * err;
            level = alpha * y + (1.0 - alpha) * level;
        }
        sse
    }

    fn best_alpha(values: &[f64]) -> f64 {
        let mut best = (0.5, f64::MAX);
        for step in 1..100u32 {
            let alpha = f64::from(step) / 100.0;
            let sse = Self::one_step_sse(alpha, values);
            if sse < best.1 {
                best = (alpha, sse);
            }
        }
        best.0
    }
}

impl CoreModeler for SimpleExponentialSmoothing {
    fn forecast(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>, ModelError> {
        require(values, self.min_observations())?;
        let alpha = self.alpha.unwrap_or_else(|| Self::best_alpha(values));
        Ok(vec![Self::level(alpha, values); horizon])
    }

    fn min_observations(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "SimpleExponentialSmoothing"
    }
}

/// Holt's linear trend method.
#[derive(Debug, Clone, Copy)]
pub struct HoltLinear {
    alpha: f64,
    beta: f64,
}

impl HoltLinear {
    pub fn new(alpha: f64, beta: f64) -> Result<Self, ModelError> {
        check_unit_interval("alpha", alpha)?;
        check_unit_interval("beta", beta)?;
        Ok(Self { alpha, beta })
    }
}

impl CoreModeler for HoltLinear {
    #[allow(clippy::cast_precision_loss)]
    fn forecast(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>, ModelError> {
        require(values, self.min_observations())?;
        let mut level = values[0];
        let mut trend = values[1] - values[0];
        for &y in &values[1..] {
            let prev_level = level;
            level = self.alpha * y + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - prev_level) + (1.0 - self.beta) * trend;
        }
        Ok((1..=horizon).map(|h| level + h as f64 * trend).collect())
    }

    fn min_observations(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "HoltLinear"
    }
}
