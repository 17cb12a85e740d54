use super::traits::{invalid, ConfigSection};
use crate::error::BwallocError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecasterConfig {
    /// Width of the autoregressive input window.
    pub input_size: usize,
    pub hidden_size: usize,
    /// Values emitted per forward pass.
    pub output_size: usize,
    pub num_epochs: usize,
    pub learning_rate: f64,
    pub future_steps: usize,
    pub update_rule: UpdateRule,
    pub log_every: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateRule {
    Sgd,
    Adam,
}

impl Default for ForecasterConfig {
    fn default() -> Self {
        Self {
            input_size: 10,
            hidden_size: 128,
            output_size: 1,
            num_epochs: 100,
            learning_rate: 0.01,
            future_steps: 100,
            update_rule: UpdateRule::Sgd,
            log_every: 10,
            seed: None,
        }
    }
}

impl ConfigSection for ForecasterConfig {
    fn section_name() -> &'static str {
        "forecaster"
    }

    fn validate(&self) -> Result<(), BwallocError> {
        if self.input_size == 0 || self.hidden_size == 0 || self.output_size == 0 {
            return Err(invalid::<Self>(format!(
                "layer sizes must be positive, got input={} hidden={} output={}",
                self.input_size, self.hidden_size, self.output_size
            )));
        }
        if self.num_epochs == 0 {
            return Err(invalid::<Self>("num_epochs must be at least 1"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(invalid::<Self>(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_epochs() {
        let config = ForecasterConfig {
            num_epochs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_learning_rate() {
        let config = ForecasterConfig {
            learning_rate: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
