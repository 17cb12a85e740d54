use crate::config::ml::{ForecasterConfig, UpdateRule};
use crate::config::traits::ConfigSection;
use crate::error::{BwallocError, Result};
use crate::ml::models::narnet::{NarNetwork, Updater};
use crate::ml::scaling::MinMaxScaler;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Loss trace of one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub epochs: usize,
    pub samples: usize,
    /// Full-batch MSE measured before each epoch's update.
    pub losses: Vec<f64>,
}

impl TrainingReport {
    pub fn final_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }
}

struct FittedModel {
    network: NarNetwork,
    scaler: MinMaxScaler,
}

/// Autoregressive demand forecaster.
///
/// `train` fits the scaler and the network on a univariate series;
/// `predict` chains one-window forecasts from a seed window without
/// touching the trained state.
pub struct NarForecaster {
    config: ForecasterConfig,
    rng: StdRng,
    fitted: Option<FittedModel>,
}

impl NarForecaster {
    pub fn new(config: ForecasterConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            rng,
            fitted: None,
        })
    }

    pub fn config(&self) -> &ForecasterConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn input_size(&self) -> usize {
        self.config.input_size
    }

    pub fn scaler(&self) -> Option<&MinMaxScaler> {
        self.fitted.as_ref().map(|f| &f.scaler)
    }

    /// Fit a fresh network to `series` with full-batch gradient descent.
    pub fn train(&mut self, series: &[f64], epochs: usize) -> Result<TrainingReport> {
        if epochs == 0 {
            return Err(BwallocError::Configuration(
                "[forecaster] epochs must be at least 1".to_string(),
            ));
        }

        let input_size = self.config.input_size;
        let output_size = self.config.output_size;
        let needed = input_size + output_size;
        if series.len() < needed {
            return Err(BwallocError::shape("training series length", needed, series.len()));
        }

        let scaler = MinMaxScaler::fit(series)?;
        let normalized = scaler.transform_all(series);
        let (inputs, targets) = sliding_samples(&normalized, input_size, output_size);
        let samples = inputs.nrows();

        let hidden_size = self.config.hidden_size;
        let mut network = NarNetwork::new(input_size, hidden_size, output_size, &mut self.rng);
        let mut updater = match self.config.update_rule {
            UpdateRule::Sgd => Updater::sgd(self.config.learning_rate),
            UpdateRule::Adam => Updater::adam(self.config.learning_rate, &network),
        };

        log::info!(
            "Training forecaster: {} samples, window {}, hidden {}, {} epochs",
            samples,
            input_size,
            self.config.hidden_size,
            epochs
        );

        let mut losses = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            let (loss, grads) = network.loss_and_gradients(inputs.view(), targets.view());
            updater.apply(&mut network, &grads);
            losses.push(loss);

            if self.config.log_every > 0 && (epoch + 1) % self.config.log_every == 0 {
                log::info!("Epoch [{}/{}], Loss: {:.4}", epoch + 1, epochs, loss);
            }
        }

        self.fitted = Some(FittedModel { network, scaler });

        Ok(TrainingReport {
            epochs,
            samples,
            losses,
        })
    }

    /// Lazily forecast `steps` values following `seed_window`.
    pub fn predict(&self, seed_window: &[f64], steps: usize) -> Result<Forecast<'_>> {
        let fitted = self.fitted.as_ref().ok_or_else(|| {
            BwallocError::NotFitted("predict called before train".to_string())
        })?;

        let expected = fitted.network.input_size();
        if seed_window.len() != expected {
            return Err(BwallocError::shape("seed window length", expected, seed_window.len()));
        }

        Ok(Forecast {
            network: &fitted.network,
            scaler: &fitted.scaler,
            window: seed_window.iter().map(|&v| fitted.scaler.transform(v)).collect(),
            pending: VecDeque::new(),
            remaining: steps,
        })
    }
}

fn sliding_samples(
    series: &[f64],
    input_size: usize,
    output_size: usize,
) -> (Array2<f64>, Array2<f64>) {
    let samples = series.len() + 1 - input_size - output_size;
    let inputs = Array2::from_shape_fn((samples, input_size), |(i, j)| series[i + j]);
    let targets =
        Array2::from_shape_fn((samples, output_size), |(i, j)| series[i + input_size + j]);
    (inputs, targets)
}

/// Forecast values in original units, produced on demand.
///
/// Each forward pass yields `output_size` values that are pushed onto the
/// window while the oldest entries fall off. The iterator ends after the
/// requested number of steps and cannot be rewound.
pub struct Forecast<'a> {
    network: &'a NarNetwork,
    scaler: &'a MinMaxScaler,
    window: VecDeque<f64>,
    pending: VecDeque<f64>,
    remaining: usize,
}

impl Iterator for Forecast<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }

        if self.pending.is_empty() {
            let input = Array1::from_iter(self.window.iter().copied());
            let output = self.network.forward(input.view());
            for &value in output.iter() {
                self.window.pop_front();
                self.window.push_back(value);
                self.pending.push_back(value);
            }
        }

        self.remaining -= 1;
        self.pending
            .pop_front()
            .map(|scaled| self.scaler.inverse_transform(scaled))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Forecast<'_> {}

impl FusedIterator for Forecast<'_> {}
