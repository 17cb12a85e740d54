use crate::error::{BwallocError, Result};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Denominator guard shared by the fitness model and the metrics pipeline.
pub const EPSILON: f64 = 1e-9;

/// Realized per-cell demand, rows = cells, columns = time steps.
///
/// The matrix is read-only once built: every engine borrows it and none of
/// them can mutate it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageMatrix {
    data: Array2<f64>,
}

impl UsageMatrix {
    pub fn new(data: Array2<f64>) -> Result<Self> {
        if let Some(((cell, step), value)) = data
            .indexed_iter()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(BwallocError::DataLoading(format!(
                "Usage at cell {} step {} must be finite and non-negative, found {}",
                cell, step, value
            )));
        }
        Ok(Self { data })
    }

    /// Build from one row per cell. Rows must share a length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cells = rows.len();
        let steps = rows.first().map(|r| r.len()).unwrap_or(0);

        let mut flat = Vec::with_capacity(cells * steps);
        for row in rows {
            if row.len() != steps {
                return Err(BwallocError::shape("usage row length", steps, row.len()));
            }
            flat.extend(row);
        }

        let data = Array2::from_shape_vec((cells, steps), flat)
            .map_err(|e| BwallocError::DataLoading(format!("Failed to shape usage: {}", e)))?;
        Self::new(data)
    }

    pub fn cells(&self) -> usize {
        self.data.nrows()
    }

    pub fn steps(&self) -> usize {
        self.data.ncols()
    }

    pub fn step(&self, t: usize) -> ArrayView1<'_, f64> {
        self.data.column(t)
    }

    pub fn cell(&self, c: usize) -> ArrayView1<'_, f64> {
        self.data.row(c)
    }

    pub fn view(&self) -> ndarray::ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Total demand per time step.
    pub fn step_totals(&self) -> Vec<f64> {
        self.data.sum_axis(Axis(0)).to_vec()
    }

    /// Replay the history cyclically until it spans `len` steps.
    pub fn cycled(&self, len: usize) -> Result<Self> {
        let steps = self.steps();
        if steps == 0 && len > 0 {
            return Err(BwallocError::DataLoading(
                "Cannot replay an empty usage history".to_string(),
            ));
        }
        let data = Array2::from_shape_fn((self.cells(), len), |(c, t)| self.data[[c, t % steps]]);
        Ok(Self { data })
    }
}

/// Aggregate demand scale per time step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSeries(Vec<f64>);

impl TrafficSeries {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if let Some((i, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(BwallocError::DataLoading(format!(
                "Traffic at step {} must be finite and non-negative, found {}",
                i, v
            )));
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recent `n` observations (the whole series if shorter).
    pub fn tail(&self, n: usize) -> &[f64] {
        &self.0[self.0.len().saturating_sub(n)..]
    }
}

/// Per-cell share of total capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation(Vec<f64>);

impl Allocation {
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(BwallocError::Configuration(format!(
                "Allocation weight {} must be finite and non-negative, found {}",
                i, w
            )));
        }
        Ok(Self(weights))
    }

    /// Uniform share for every cell.
    pub fn uniform(cells: usize) -> Self {
        Self(vec![1.0 / cells.max(1) as f64; cells])
    }

    /// Rescale to shares summing to one, falling back to uniform when the
    /// weights carry no mass.
    pub fn normalized(&self) -> Self {
        Self(normalize_weights(&self.0))
    }

    pub fn weights(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

pub(crate) fn normalize_weights(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total < EPSILON {
        log::debug!("Allocation sums to {:e}, using uniform shares", total);
        return vec![1.0 / weights.len().max(1) as f64; weights.len()];
    }
    weights.iter().map(|w| w / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_ragged() {
        let result = UsageMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(
            result,
            Err(BwallocError::Shape { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_negative_usage() {
        let result = UsageMatrix::from_rows(vec![vec![1.0, -2.0]]);
        assert!(matches!(result, Err(BwallocError::DataLoading(_))));
    }

    #[test]
    fn test_cycled_wraps_columns() {
        let usage = UsageMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let cycled = usage.cycled(7).unwrap();

        assert_eq!(cycled.cells(), 2);
        assert_eq!(cycled.steps(), 7);
        assert_eq!(cycled.step(3).to_vec(), vec![1.0, 4.0]);
        assert_eq!(cycled.step(5).to_vec(), vec![3.0, 6.0]);
        assert_eq!(cycled.step(6).to_vec(), vec![1.0, 4.0]);
    }

    #[test]
    fn test_step_totals() {
        let usage = UsageMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(usage.step_totals(), vec![4.0, 6.0]);
    }

    #[test]
    fn test_normalized_falls_back_to_uniform() {
        let alloc = Allocation::new(vec![0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(alloc.normalized().weights(), &[0.25, 0.25, 0.25, 0.25]);

        let alloc = Allocation::new(vec![1.0, 3.0]).unwrap();
        assert_eq!(alloc.normalized().weights(), &[0.25, 0.75]);
    }

    #[test]
    fn test_traffic_tail() {
        let traffic = TrafficSeries::new(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(traffic.tail(2), &[3.0, 4.0]);
        assert_eq!(traffic.tail(10), &[1.0, 2.0, 3.0, 4.0]);
    }
}
