use thiserror::Error;

#[derive(Error, Debug)]
pub enum BwallocError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Shape error in {context}: expected {expected}, got {actual}")]
    Shape {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Model not fitted: {0}")]
    NotFitted(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),
}

impl BwallocError {
    pub fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::Shape {
            context: context.into(),
            expected,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, BwallocError>;
