pub mod engine;
pub mod summary;

pub use engine::{AllocationSource, MetricSeries, MetricsEngine};
pub use summary::{MetricSummary, Stats, StrategyMetrics};
