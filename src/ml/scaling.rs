use crate::error::{BwallocError, Result};
use serde::{Deserialize, Serialize};

/// Maps the observed `[min, max]` of a training series onto `[0, 1]`.
///
/// The bounds are fixed at fit time. Values outside them are transformed
/// linearly and never clamped. A constant series gets a unit scale, so every
/// value maps to its offset from the constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    pub fn fit(series: &[f64]) -> Result<Self> {
        if series.is_empty() {
            return Err(BwallocError::shape("scaler fit series length", 1, 0));
        }
        if let Some(bad) = series.iter().find(|v| !v.is_finite()) {
            return Err(BwallocError::DataLoading(format!(
                "Cannot fit scaler on non-finite value {}",
                bad
            )));
        }

        let min = series.iter().copied().fold(f64::INFINITY, f64::min);
        let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range > 0.0 {
            range
        } else {
            1.0
        }
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.min) / self.range()
    }

    pub fn inverse_transform(&self, scaled: f64) -> f64 {
        scaled * self.range() + self.min
    }

    pub fn transform_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform(v)).collect()
    }
}
