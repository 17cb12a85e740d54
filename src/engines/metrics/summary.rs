// src/engines/metrics/summary.rs
use super::engine::MetricSeries;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    pub fn calculate(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self { mean, min, max }
    }
}

/// Per-metric aggregates over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub steps: usize,
    pub utilization: Stats,
    pub unsatisfied_cells: Stats,
    pub throughput: Stats,
    pub latency: Stats,
    pub packet_loss: Stats,
}

impl MetricSummary {
    pub fn from_series(series: &MetricSeries) -> Self {
        let unsatisfied: Vec<f64> = series.unsatisfied_cells.iter().map(|&n| n as f64).collect();

        Self {
            steps: series.len(),
            utilization: Stats::calculate(&series.utilization),
            unsatisfied_cells: Stats::calculate(&unsatisfied),
            throughput: Stats::calculate(&series.throughput),
            latency: Stats::calculate(&series.latency),
            packet_loss: Stats::calculate(&series.packet_loss),
        }
    }
}

/// One strategy's series plus their summary, ready for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyMetrics {
    pub name: String,
    pub series: MetricSeries,
    pub summary: MetricSummary,
}

impl StrategyMetrics {
    pub fn new(name: impl Into<String>, series: MetricSeries) -> Self {
        let summary = MetricSummary::from_series(&series);
        Self {
            name: name.into(),
            series,
            summary,
        }
    }
}
