pub mod comparison;
pub mod generation;
pub mod metrics;

pub use comparison::{ComparisonReport, ComparisonRunner};
