//! Waiting on children and turning their exit into a raised error.

use std::io::{self, Read};
use std::process::{Child, ChildStderr, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

use strongbox_core::errors::EXECUTE_ERROR;
use strongbox_core::{throw, throw_code};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Wait up to `timeout` for `child` to exit. `None` means it is still running.
pub(crate) fn wait_exit(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }

        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Everything left on a child's stderr, trimmed. Only call once the child exited.
pub(crate) fn drain_stderr(stderr: Option<ChildStderr>) -> String {
    let mut text = String::new();

    if let Some(mut stderr) = stderr {
        if let Err(error) = stderr.read_to_string(&mut text) {
            tracing::debug!(%error, "unable to drain child stderr");
        }
    }

    text.trim().to_owned()
}

/// Raise the error describing how a child ended.
///
/// An exit code is raised as the error type with that code, so children
/// report typed failures through their exit status. Codes with no registered
/// type become `UnknownError`.
pub(crate) fn raise_for_status(name: &str, status: ExitStatus, detail: &str) -> ! {
    if let Some(code) = status.code() {
        if detail.is_empty() {
            throw_code!(code, "{name} terminated unexpectedly [{code}]");
        }

        throw_code!(code, "{name} terminated unexpectedly [{code}]: {detail}");
    }

    match signal(status) {
        Some(signal) => throw!(EXECUTE_ERROR, "{name} terminated unexpectedly on signal {signal}"),
        None => throw!(EXECUTE_ERROR, "{name} terminated unexpectedly"),
    }
}

#[cfg(unix)]
fn signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;

    status.signal()
}

#[cfg(not(unix))]
fn signal(_status: ExitStatus) -> Option<i32> {
    None
}
