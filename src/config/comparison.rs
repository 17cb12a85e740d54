use super::traits::ConfigSection;
use crate::error::BwallocError;
use serde::{Deserialize, Serialize};

/// Settings for the forecast-driven comparison path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Seed for the random baseline allocation; entropy when unset.
    pub baseline_seed: Option<u64>,
}

impl ConfigSection for ComparisonConfig {
    fn section_name() -> &'static str {
        "comparison"
    }

    fn validate(&self) -> Result<(), BwallocError> {
        Ok(())
    }
}
