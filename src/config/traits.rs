use crate::error::BwallocError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), BwallocError>;
}

/// Build a configuration error tagged with the offending section.
pub(crate) fn invalid<S: ConfigSection>(message: impl AsRef<str>) -> BwallocError {
    BwallocError::Configuration(format!("[{}] {}", S::section_name(), message.as_ref()))
}
