//! Group identifiers, input series and forecasts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of one independently modeled series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GroupId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The observations of one group, in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Group this series belongs to.
    pub id: GroupId,
    /// Observed values, oldest first.
    pub values: Vec<f64>,
}

impl Series {
    #[must_use]
    pub fn new(id: impl Into<GroupId>, values: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Last observed value, if any.
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Predicted values for one group, one per future period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forecast(Vec<f64>);

impl Forecast {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// A forecast repeating `value` for every period of `horizon`.
    #[must_use]
    pub fn flat(value: f64, horizon: usize) -> Self {
        Self(vec![value; horizon])
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn horizon(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}
