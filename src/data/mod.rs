pub mod connectors;

pub use connectors::{CsvConnector, DatasetMetadata};
