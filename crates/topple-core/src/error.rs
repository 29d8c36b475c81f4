//! Error types for topple

use thiserror::Error;

/// The main error type for topple operations
#[derive(Debug, Error)]
pub enum ToppleError {
    #[error("Level parse error: {0}")]
    LevelParseError(String),

    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Physics error: {0}")]
    PhysicsError(String),

    #[error("Out of ammunition: {0}")]
    OutOfAmmunition(String),
}

/// Result type alias for topple operations
pub type Result<T> = std::result::Result<T, ToppleError>;

impl From<serde_json::Error> for ToppleError {
    fn from(err: serde_json::Error) -> Self {
        ToppleError::LevelParseError(err.to_string())
    }
}

impl From<toml::de::Error> for ToppleError {
    fn from(err: toml::de::Error) -> Self {
        ToppleError::ConfigParseError(err.to_string())
    }
}
