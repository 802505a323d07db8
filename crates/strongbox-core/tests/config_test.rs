//! Tests for the Strongbox configuration system.

use std::sync::Mutex;
use std::time::Duration;

use strongbox_core::config::{CliOverrides, ErrorsConfig, StrongboxConfig};
use strongbox_core::errors::{ConfigError, ErrorSettings, StrongboxErrorCode};

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all STRONGBOX_ env vars to prevent cross-test contamination.
fn clear_strongbox_env_vars() {
    for key in [
        "STRONGBOX_ERRORS_TRY_MAX",
        "STRONGBOX_ERRORS_MESSAGE_CAPACITY",
        "STRONGBOX_ERRORS_CAPTURE_TRACE",
        "STRONGBOX_EXEC_TIMEOUT_MS",
        "STRONGBOX_EXEC_SHELL",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn layered_resolution_prefers_cli_then_env_then_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_strongbox_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("strongbox.toml"),
        r#"
[errors]
try_max = 16
message_capacity = 1024

[exec]
timeout_ms = 5000
shell = "bash -c"
"#,
    )
    .unwrap();

    std::env::set_var("STRONGBOX_ERRORS_TRY_MAX", "24");
    std::env::set_var("STRONGBOX_EXEC_TIMEOUT_MS", "7000");

    let cli = CliOverrides {
        exec_timeout_ms: Some(9000),
        ..Default::default()
    };

    let config = StrongboxConfig::load(dir.path(), Some(&cli)).unwrap();

    // Env overrides the project file.
    assert_eq!(config.errors.try_max, Some(24));
    // CLI overrides env.
    assert_eq!(config.exec.timeout_ms, Some(9000));
    // Untouched file values survive.
    assert_eq!(config.errors.message_capacity, Some(1024));
    assert_eq!(config.exec.effective_shell(), "bash -c");

    clear_strongbox_env_vars();
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_strongbox_env_vars();

    let dir = tempdir();
    let config = StrongboxConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.errors.effective_try_max(), 32);
    assert_eq!(config.errors.effective_message_capacity(), 8192);
    assert!(!config.errors.effective_capture_trace());
    assert_eq!(config.exec.effective_timeout(), Duration::from_secs(60));
    assert_eq!(config.exec.effective_shell(), "sh -c");
}

#[test]
fn env_overrides_apply_without_a_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_strongbox_env_vars();

    let dir = tempdir();
    std::env::set_var("STRONGBOX_ERRORS_CAPTURE_TRACE", "true");
    std::env::set_var("STRONGBOX_EXEC_SHELL", "dash -c");

    let config = StrongboxConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.errors.capture_trace, Some(true));
    assert_eq!(config.exec.shell.as_deref(), Some("dash -c"));

    clear_strongbox_env_vars();
}

#[test]
fn unparseable_env_values_are_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_strongbox_env_vars();

    let dir = tempdir();
    std::env::set_var("STRONGBOX_ERRORS_TRY_MAX", "lots");

    let config = StrongboxConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.errors.try_max, None);

    clear_strongbox_env_vars();
}

#[test]
fn invalid_toml_syntax_is_a_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_strongbox_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("strongbox.toml"), "this is not valid toml {{{{").unwrap();

    match StrongboxConfig::load(dir.path(), None).unwrap_err() {
        ConfigError::ParseError { path, .. } => assert!(path.ends_with("strongbox.toml")),
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn invalid_values_fail_validation() {
    for (toml, field) in [
        ("[errors]\ntry_max = 0\n", "errors.try_max"),
        ("[errors]\nmessage_capacity = 1\n", "errors.message_capacity"),
        ("[exec]\ntimeout_ms = 0\n", "exec.timeout_ms"),
        ("[exec]\nshell = \"   \"\n", "exec.shell"),
    ] {
        match StrongboxConfig::from_toml(toml).unwrap_err() {
            ConfigError::ValidationFailed { field: failed, .. } => assert_eq!(failed, field),
            other => panic!("Expected ValidationFailed for {field}, got: {:?}", other),
        }
    }
}

#[test]
fn cli_values_are_validated_too() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_strongbox_env_vars();

    let dir = tempdir();
    let cli = CliOverrides {
        try_max: Some(0),
        ..Default::default()
    };

    let error = StrongboxConfig::load(dir.path(), Some(&cli)).unwrap_err();
    assert_eq!(error.error_code(), "CONFIG_ERROR");
    assert!(error.to_string().contains("errors.try_max"));
}

#[test]
fn unknown_keys_are_ignored() {
    let config = StrongboxConfig::from_toml(
        r#"
[errors]
try_max = 8
future_option = "yes"

[archive]
compress = true
"#,
    )
    .unwrap();

    assert_eq!(config.errors.try_max, Some(8));
}

#[test]
fn serialized_config_loads_back() {
    let config = StrongboxConfig::from_toml("[errors]\ntry_max = 12\n[exec]\ntimeout_ms = 250\n").unwrap();
    let reloaded = StrongboxConfig::from_toml(&config.to_toml().unwrap()).unwrap();

    assert_eq!(reloaded.errors.try_max, Some(12));
    assert_eq!(reloaded.exec.effective_timeout(), Duration::from_millis(250));
}

#[test]
fn error_settings_follow_the_errors_section() {
    let config =
        StrongboxConfig::from_toml("[errors]\ntry_max = 4\ncapture_trace = true\n").unwrap();
    let settings = ErrorSettings::from(&config.errors);

    assert_eq!(
        settings,
        ErrorSettings {
            try_max: 4,
            message_capacity: 8192,
            capture_trace: true,
        }
    );
    assert_eq!(ErrorSettings::from(&ErrorsConfig::default()), ErrorSettings::default());
}
