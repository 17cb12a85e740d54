pub mod forecast;
pub mod models;
pub mod scaling;

pub use forecast::{Forecast, NarForecaster, TrainingReport};
pub use models::narnet::NarNetwork;
pub use scaling::MinMaxScaler;
