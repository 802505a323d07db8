//! Child process execution configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for child process execution.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExecConfig {
    /// Default I/O and exit timeout in milliseconds. Default: 60000.
    pub timeout_ms: Option<u64>,
    /// Shell used to run one-shot commands. Default: "sh -c".
    pub shell: Option<String>,
}

impl ExecConfig {
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(constants::DEFAULT_EXEC_TIMEOUT_MS))
    }

    pub fn effective_shell(&self) -> &str {
        self.shell.as_deref().unwrap_or(constants::DEFAULT_SHELL)
    }
}
