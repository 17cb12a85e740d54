// src/engines/metrics/engine.rs
use crate::error::{BwallocError, Result};
use crate::types::{Allocation, UsageMatrix, EPSILON};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Where the per-cell shares come from at each time step.
#[derive(Debug, Clone)]
pub enum AllocationSource {
    /// One vector reused at every step.
    Fixed(Allocation),
    /// One column per step, shape `[cells, steps]`.
    PerStep(Array2<f64>),
}

impl AllocationSource {
    fn share(&self, cell: usize, step: usize) -> f64 {
        match self {
            Self::Fixed(allocation) => allocation.weights()[cell],
            Self::PerStep(matrix) => matrix[[cell, step]],
        }
    }

    fn check(&self, cells: usize, steps: usize) -> Result<()> {
        match self {
            Self::Fixed(allocation) => {
                if allocation.len() != cells {
                    return Err(BwallocError::shape("allocation cells", cells, allocation.len()));
                }
            }
            Self::PerStep(matrix) => {
                if matrix.nrows() != cells {
                    return Err(BwallocError::shape("allocation cells", cells, matrix.nrows()));
                }
                if matrix.ncols() != steps {
                    return Err(BwallocError::shape("allocation steps", steps, matrix.ncols()));
                }
                if let Some(((cell, step), share)) = matrix
                    .indexed_iter()
                    .find(|(_, v)| !v.is_finite() || **v < 0.0)
                {
                    return Err(BwallocError::Configuration(format!(
                        "Allocation share at cell {} step {} must be finite and non-negative, \
                         found {}",
                        cell, step, share
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Five aligned per-step statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub utilization: Vec<f64>,
    pub unsatisfied_cells: Vec<usize>,
    pub throughput: Vec<f64>,
    pub latency: Vec<f64>,
    pub packet_loss: Vec<f64>,
}

impl MetricSeries {
    fn with_capacity(steps: usize) -> Self {
        Self {
            utilization: Vec::with_capacity(steps),
            unsatisfied_cells: Vec::with_capacity(steps),
            throughput: Vec::with_capacity(steps),
            latency: Vec::with_capacity(steps),
            packet_loss: Vec::with_capacity(steps),
        }
    }

    pub fn len(&self) -> usize {
        self.utilization.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utilization.is_empty()
    }
}

pub struct MetricsEngine;

impl MetricsEngine {
    /// Derive the per-step statistics for `allocation` scaled by `demand`.
    ///
    /// `usage` must have exactly one column per demand value. Zero supply
    /// never fails: latency always adds `EPSILON` to its denominator and
    /// utilization substitutes it when total supply vanishes.
    pub fn compute(
        usage: &UsageMatrix,
        demand: &[f64],
        allocation: &AllocationSource,
    ) -> Result<MetricSeries> {
        let cells = usage.cells();
        let steps = demand.len();
        if usage.steps() != steps {
            return Err(BwallocError::shape("usage steps", steps, usage.steps()));
        }
        allocation.check(cells, steps)?;

        let mut metrics = MetricSeries::with_capacity(steps);
        if cells == 0 {
            log::warn!("Computing metrics over a usage matrix with no cells");
        }

        for (t, &scale) in demand.iter().enumerate() {
            let current = usage.step(t);

            let mut used_total = 0.0;
            let mut supply_total = 0.0;
            let mut unsatisfied = 0usize;
            let mut latency_sum = 0.0;

            for (c, &used) in current.iter().enumerate() {
                let supply = allocation.share(c, t) * scale;
                used_total += used;
                supply_total += supply;
                if used > supply {
                    unsatisfied += 1;
                }
                latency_sum += used / (supply + EPSILON);
            }

            let denominator = if supply_total.abs() < EPSILON {
                log::debug!("Step {}: total supply {:e}, substituting epsilon", t, supply_total);
                EPSILON
            } else {
                supply_total
            };
            let cell_count = cells.max(1) as f64;

            metrics.utilization.push(used_total / denominator);
            metrics.unsatisfied_cells.push(unsatisfied);
            metrics.throughput.push(used_total);
            metrics.latency.push(latency_sum / cell_count);
            metrics.packet_loss.push(unsatisfied as f64 / cell_count);
        }

        Ok(metrics)
    }
}
