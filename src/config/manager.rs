use super::{
    comparison::ComparisonConfig, evolution::OptimizerConfig, ml::ForecasterConfig,
    traits::ConfigSection,
};
use crate::error::BwallocError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `BWALLOC__OPTIMIZER__POP_SIZE=80`.
pub const ENV_PREFIX: &str = "BWALLOC";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub optimizer: OptimizerConfig,
    pub forecaster: ForecasterConfig,
    pub comparison: ComparisonConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), BwallocError> {
        self.optimizer.validate()?;
        self.forecaster.validate()?;
        self.comparison.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), BwallocError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BwallocError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| BwallocError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    /// Merge an optional file with `BWALLOC__SECTION__FIELD` environment
    /// overrides on top of the defaults.
    pub fn load_layered<P: AsRef<Path>>(&self, path: Option<P>) -> Result<(), BwallocError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_ref()));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), BwallocError> {
        let toml_str = self.to_toml()?;

        std::fs::write(path, toml_str)
            .map_err(|e| BwallocError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, BwallocError> {
        let config = self.get();
        toml::to_string_pretty(&config)
            .map_err(|e| BwallocError::Configuration(format!("Failed to serialize: {}", e)))
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Apply `f` to a copy and keep it only if the result validates.
    pub fn update<F>(&self, f: F) -> Result<(), BwallocError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), BwallocError> {
        config.validate()?;
        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() {
        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.optimizer.pop_size = 80;
                c.optimizer.seed = Some(7);
                c.forecaster.input_size = 12;
            })
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bwalloc.toml");
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        let config = reloaded.get();
        assert_eq!(config.optimizer.pop_size, 80);
        assert_eq!(config.optimizer.seed, Some(7));
        assert_eq!(config.forecaster.input_size, 12);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[optimizer]\nnum_generations = 7\n").unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(&path).unwrap();
        let config = manager.get();
        assert_eq!(config.optimizer.num_generations, 7);
        assert_eq!(config.optimizer.pop_size, OptimizerConfig::default().pop_size);
        assert_eq!(config.forecaster.hidden_size, 128);
    }

    #[test]
    fn test_invalid_update_is_rejected() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| {
            c.optimizer.pop_size = 10;
            c.optimizer.num_parents_mating = 20;
        });
        assert!(matches!(result, Err(BwallocError::Configuration(_))));
        assert_eq!(manager.get().optimizer.pop_size, 50);
    }

    #[test]
    fn test_layered_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layered.toml");
        std::fs::write(&path, "[forecaster]\nfuture_steps = 24\n").unwrap();

        let manager = ConfigManager::new();
        manager.load_layered(Some(&path)).unwrap();
        assert_eq!(manager.get().forecaster.future_steps, 24);
    }

    #[test]
    fn test_layered_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.toml");
        std::fs::write(&path, "[optimizer]\ntournament_size = 4\n").unwrap();

        // Only this test touches these variables.
        std::env::set_var("BWALLOC__OPTIMIZER__TOURNAMENT_SIZE", "9");
        std::env::set_var("BWALLOC__FORECASTER__UPDATE_RULE", "Adam");
        let manager = ConfigManager::new();
        let result = manager.load_layered(Some(&path));
        std::env::remove_var("BWALLOC__OPTIMIZER__TOURNAMENT_SIZE");
        std::env::remove_var("BWALLOC__FORECASTER__UPDATE_RULE");

        result.unwrap();
        let config = manager.get();
        assert_eq!(config.optimizer.tournament_size, 9);
        assert_eq!(config.forecaster.update_rule, crate::config::UpdateRule::Adam);
    }
}
