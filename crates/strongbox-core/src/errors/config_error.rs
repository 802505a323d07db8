//! Configuration errors.

use super::codes::{self, StrongboxErrorCode};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Error settings were already installed for this process")]
    AlreadyInstalled,
}

impl StrongboxErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyInstalled => codes::SETTINGS_INSTALLED,
            _ => codes::CONFIG_ERROR,
        }
    }
}
