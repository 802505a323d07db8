//! Runtime settings of the error engine.

use std::sync::OnceLock;

use super::config_error::ConfigError;
use crate::config::ErrorsConfig;
use crate::constants;

/// Limits applied to each thread's error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorSettings {
    /// Maximum number of nested try regions.
    pub try_max: usize,
    /// Message buffer capacity, including the terminator slot.
    pub message_capacity: usize,
    /// Capture a backtrace on every throw that does not supply one.
    pub capture_trace: bool,
}

impl Default for ErrorSettings {
    fn default() -> Self {
        Self {
            try_max: constants::DEFAULT_TRY_MAX,
            message_capacity: constants::DEFAULT_MESSAGE_CAPACITY,
            capture_trace: false,
        }
    }
}

impl From<&ErrorsConfig> for ErrorSettings {
    fn from(config: &ErrorsConfig) -> Self {
        Self {
            try_max: config.effective_try_max(),
            message_capacity: config.effective_message_capacity(),
            capture_trace: config.effective_capture_trace(),
        }
    }
}

static INSTALLED: OnceLock<ErrorSettings> = OnceLock::new();

/// Fix the settings every thread context starts from.
///
/// Contexts created before this call keep the compiled defaults, so install
/// settings at process start.
pub fn install_settings(settings: ErrorSettings) -> Result<(), ConfigError> {
    INSTALLED
        .set(settings)
        .map_err(|_| ConfigError::AlreadyInstalled)
}

/// Settings for a newly created thread context.
pub(crate) fn installed() -> ErrorSettings {
    INSTALLED.get().copied().unwrap_or_default()
}
