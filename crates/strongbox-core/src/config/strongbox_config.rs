//! Top-level Strongbox configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ErrorsConfig, ExecConfig};
use crate::constants;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`STRONGBOX_*`)
/// 3. Project config (`strongbox.toml` in the root directory)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StrongboxConfig {
    pub errors: ErrorsConfig,
    pub exec: ExecConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub try_max: Option<usize>,
    pub message_capacity: Option<usize>,
    pub exec_timeout_ms: Option<u64>,
}

impl StrongboxConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(constants::CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        tracing::debug!(
            try_max = config.errors.effective_try_max(),
            message_capacity = config.errors.effective_message_capacity(),
            "configuration loaded"
        );

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &StrongboxConfig) -> Result<(), ConfigError> {
        if config.errors.try_max == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "errors.try_max".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(capacity) = config.errors.message_capacity {
            if capacity < 2 {
                return Err(ConfigError::ValidationFailed {
                    field: "errors.message_capacity".to_string(),
                    message: "must be at least 2".to_string(),
                });
            }
        }
        if config.exec.timeout_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "exec.timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref shell) = config.exec.shell {
            if shell.split_whitespace().next().is_none() {
                return Err(ConfigError::ValidationFailed {
                    field: "exec.shell".to_string(),
                    message: "must name a program".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut StrongboxConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: StrongboxConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut StrongboxConfig, other: &StrongboxConfig) {
        if other.errors.try_max.is_some() {
            base.errors.try_max = other.errors.try_max;
        }
        if other.errors.message_capacity.is_some() {
            base.errors.message_capacity = other.errors.message_capacity;
        }
        if other.errors.capture_trace.is_some() {
            base.errors.capture_trace = other.errors.capture_trace;
        }

        if other.exec.timeout_ms.is_some() {
            base.exec.timeout_ms = other.exec.timeout_ms;
        }
        if other.exec.shell.is_some() {
            base.exec.shell = other.exec.shell.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `STRONGBOX_ERRORS_TRY_MAX`, `STRONGBOX_EXEC_TIMEOUT_MS`, etc.
    fn apply_env_overrides(config: &mut StrongboxConfig) {
        if let Ok(val) = std::env::var("STRONGBOX_ERRORS_TRY_MAX") {
            if let Ok(v) = val.parse::<usize>() {
                config.errors.try_max = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STRONGBOX_ERRORS_MESSAGE_CAPACITY") {
            if let Ok(v) = val.parse::<usize>() {
                config.errors.message_capacity = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STRONGBOX_ERRORS_CAPTURE_TRACE") {
            if let Ok(v) = val.parse::<bool>() {
                config.errors.capture_trace = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STRONGBOX_EXEC_TIMEOUT_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.exec.timeout_ms = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STRONGBOX_EXEC_SHELL") {
            config.exec.shell = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut StrongboxConfig, cli: &CliOverrides) {
        if let Some(v) = cli.try_max {
            config.errors.try_max = Some(v);
        }
        if let Some(v) = cli.message_capacity {
            config.errors.message_capacity = Some(v);
        }
        if let Some(v) = cli.exec_timeout_ms {
            config.exec.timeout_ms = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
