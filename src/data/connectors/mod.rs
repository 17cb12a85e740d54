mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::{DatasetMetadata, TrafficColumn};
pub use validator::DataValidator;
