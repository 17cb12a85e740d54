pub mod traits;
pub mod evolution;
pub mod ml;
pub mod comparison;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use evolution::{CrossoverMethod, OptimizerConfig, SelectionMethod};
pub use ml::{ForecasterConfig, UpdateRule};
pub use comparison::ComparisonConfig;
pub use traits::ConfigSection;
