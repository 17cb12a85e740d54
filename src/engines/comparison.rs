use crate::config::AppConfig;
use crate::engines::generation::{EvolutionEngine, GenerationSnapshot, ProgressCallback};
use crate::engines::metrics::{AllocationSource, MetricsEngine, StrategyMetrics};
use crate::error::Result;
use crate::ml::NarForecaster;
use crate::types::{normalize_weights, TrafficSeries, UsageMatrix};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub const OPTIMIZED_LABEL: &str = "GA";
pub const FORECAST_LABEL: &str = "NARNET";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub optimized: StrategyMetrics,
    pub forecast: StrategyMetrics,
    pub best_allocation: Vec<f64>,
    pub best_fitness: f64,
    pub optimizer_seconds: f64,
    pub generations: Vec<GenerationSnapshot>,
    pub training_losses: Vec<f64>,
    pub forecast_demand: Vec<f64>,
}

/// Unoptimised per-step shares.
///
/// Each cell draws a uniform weight in `[0, 1)` and every step's column is
/// normalised to sum to one, the same capacity budget as the evolved
/// allocation.
pub fn random_baseline<R: Rng>(cells: usize, steps: usize, rng: &mut R) -> Array2<f64> {
    let mut shares = Array2::from_shape_fn((cells, steps), |_| rng.gen::<f64>());
    for mut column in shares.axis_iter_mut(Axis(1)) {
        let weights = normalize_weights(&column.to_vec());
        column.assign(&Array1::from(weights));
    }
    shares
}

/// Runs both allocation strategies over the same history.
pub struct ComparisonRunner {
    config: AppConfig,
}

impl ComparisonRunner {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn run<C: ProgressCallback>(
        &self,
        traffic: &TrafficSeries,
        usage: &UsageMatrix,
        callback: C,
    ) -> Result<ComparisonReport> {
        // Path A: one static allocation evolved against the full history.
        let mut engine = EvolutionEngine::new(self.config.optimizer.clone())?;
        let outcome = engine.run(usage, callback)?;

        let optimized_series = MetricsEngine::compute(
            usage,
            traffic.values(),
            &AllocationSource::Fixed(outcome.best_allocation.clone()),
        )?;

        // Path B: forecast demand, random shares, usage replayed to the horizon.
        let forecaster_config = &self.config.forecaster;
        let mut forecaster = NarForecaster::new(forecaster_config.clone())?;
        let training = forecaster.train(traffic.values(), forecaster_config.num_epochs)?;

        let seed_window = traffic.tail(forecaster.input_size());
        let forecast_demand: Vec<f64> = forecaster
            .predict(seed_window, forecaster_config.future_steps)?
            .collect();

        let mut rng = match self.config.comparison.baseline_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let baseline = random_baseline(usage.cells(), forecast_demand.len(), &mut rng);
        let replayed = usage.cycled(forecast_demand.len())?;

        let forecast_series = MetricsEngine::compute(
            &replayed,
            &forecast_demand,
            &AllocationSource::PerStep(baseline),
        )?;

        let report = ComparisonReport {
            optimized: StrategyMetrics::new(OPTIMIZED_LABEL, optimized_series),
            forecast: StrategyMetrics::new(FORECAST_LABEL, forecast_series),
            best_allocation: outcome.best_allocation.into_inner(),
            best_fitness: outcome.best_fitness,
            optimizer_seconds: outcome.elapsed.as_secs_f64(),
            generations: outcome.history,
            training_losses: training.losses,
            forecast_demand,
        };

        for strategy in [&report.optimized, &report.forecast] {
            let s = &strategy.summary;
            log::info!(
                "{}: utilization {:.3}, unsatisfied {:.2}, throughput {:.2}, \
                 latency {:.3}, loss {:.3}",
                strategy.name,
                s.utilization.mean,
                s.unsatisfied_cells.mean,
                s.throughput.mean,
                s.latency.mean,
                s.packet_loss.mean
            );
        }

        Ok(report)
    }
}
