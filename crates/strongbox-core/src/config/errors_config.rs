//! Error engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for the error engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ErrorsConfig {
    /// Maximum nested try regions per thread. Default: 32.
    pub try_max: Option<usize>,
    /// Error message buffer capacity. Default: 8192.
    pub message_capacity: Option<usize>,
    /// Capture a backtrace on every throw. Default: false.
    pub capture_trace: Option<bool>,
}

impl ErrorsConfig {
    pub fn effective_try_max(&self) -> usize {
        self.try_max.unwrap_or(constants::DEFAULT_TRY_MAX)
    }

    pub fn effective_message_capacity(&self) -> usize {
        self.message_capacity
            .unwrap_or(constants::DEFAULT_MESSAGE_CAPACITY)
    }

    pub fn effective_capture_trace(&self) -> bool {
        self.capture_trace.unwrap_or(false)
    }
}
