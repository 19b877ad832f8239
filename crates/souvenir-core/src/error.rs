//! Error types for the bubble engine

use thiserror::Error;

/// The main error type for souvenir operations
#[derive(Debug, Error)]
pub enum SouvenirError {
    #[error("Rendering surface is missing; widget was not mounted")]
    MissingSurface,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Catalog parse error: {0}")]
    CatalogParse(String),

    #[error("Icon for '{key}' failed to load: {reason}")]
    IconLoad { key: String, reason: String },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Bubble {0} reached a non-finite state")]
    NonFiniteState(u64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for souvenir operations
pub type Result<T> = std::result::Result<T, SouvenirError>;

impl From<toml::de::Error> for SouvenirError {
    fn from(err: toml::de::Error) -> Self {
        SouvenirError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for SouvenirError {
    fn from(err: toml::ser::Error) -> Self {
        SouvenirError::TomlSerError(err.to_string())
    }
}

impl From<serde_json::Error> for SouvenirError {
    fn from(err: serde_json::Error) -> Self {
        SouvenirError::CatalogParse(err.to_string())
    }
}
