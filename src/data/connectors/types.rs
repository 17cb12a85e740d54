use serde::{Deserialize, Serialize};

/// Column holding the aggregate traffic series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrafficColumn;

impl TrafficColumn {
    /// Common alternative column names
    pub fn aliases() -> &'static [&'static str] {
        &["traffic", "Traffic", "TRAFFIC", "demand", "Demand", "DEMAND"]
    }
}

/// Metadata about a loaded traffic/usage pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub traffic_path: String,
    pub usage_path: String,
    pub cells: usize,
    pub steps: usize,
    pub cell_names: Vec<String>,
    pub traffic_range: (f64, f64), // (min, max)
    pub usage_range: (f64, f64),   // (min, max)
}
