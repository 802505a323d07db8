//! One-shot shell commands.

use std::process::{Command, Stdio};

use strongbox_core::config::ExecConfig;
use strongbox_core::constants;
use strongbox_core::errors::{throw_io_error, EXECUTE_ERROR, OPTION_INVALID_VALUE_ERROR};
use strongbox_core::{here, throw};

use crate::status::raise_for_status;

/// Options for [`exec_one`].
#[derive(Debug, Clone, Default)]
pub struct ExecOneParam {
    /// Shell and its arguments, split on whitespace. Default: `sh -c`.
    pub shell: Option<String>,
    /// Exit status treated as success.
    pub result_expect: i32,
}

impl ExecOneParam {
    /// Parameters using the configured shell.
    pub fn from_config(config: &ExecConfig) -> Self {
        Self {
            shell: Some(config.effective_shell().to_owned()),
            result_expect: 0,
        }
    }
}

/// Run `command` through a shell and return its combined stdout and stderr.
///
/// Any exit status other than `result_expect` raises the error type with that
/// code, carrying the trimmed output. Death by signal raises `ExecuteError`.
pub fn exec_one(command: &str, param: &ExecOneParam) -> String {
    let shell = param.shell.as_deref().unwrap_or(constants::DEFAULT_SHELL);
    let mut shell_parts = shell.split_whitespace();

    let Some(program) = shell_parts.next() else {
        throw!(OPTION_INVALID_VALUE_ERROR, "shell '{shell}' does not name a program");
    };

    tracing::debug!(command, shell, "running command");

    let output = Command::new(program)
        .args(shell_parts)
        .arg(format!("{command} 2>&1"))
        .stdin(Stdio::null())
        .output();

    let output = match output {
        Ok(output) => output,
        Err(error) => throw_io_error(
            &EXECUTE_ERROR,
            &error,
            here!(),
            &format!("unable to execute '{program}'"),
        ),
    };

    let text = String::from_utf8_lossy(&output.stdout).into_owned();

    match output.status.code() {
        Some(code) if code == param.result_expect => text,
        _ => raise_for_status(command, output.status, text.trim()),
    }
}
