//! A child process driven line by line over its stdin and stdout.

use std::io::{self, BufWriter, Write};
use std::mem;
use std::process::{Child, ChildStderr, ChildStdin, Command, ExitStatus, Stdio};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use strongbox_core::config::ExecConfig;
use strongbox_core::errors::{
    throw_io_error, ASSERT_ERROR, EXECUTE_ERROR, FILE_READ_ERROR, FILE_WRITE_ERROR,
};
use strongbox_core::{here, throw, throw_sys_error_code};

use crate::reader::{spawn_line_reader, ReadEvent};
use crate::status::{drain_stderr, raise_for_status, wait_exit};

/// OS error code reported for I/O on an exec that is not open.
const EBADF: i32 = 9;

#[derive(Debug, Clone, Copy)]
enum Direction {
    Read,
    Write,
}

enum ExecState {
    Idle,
    Open(Running),
    /// Closed; holds a child that had not exited by the close timeout.
    Closed(Option<Child>),
}

struct Running {
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    stderr: Option<ChildStderr>,
    lines: Receiver<ReadEvent>,
}

/// A child process with piped stdin, stdout and stderr.
///
/// Every operation either succeeds or raises through the error core:
///
/// - the child cannot be started: `ExecuteError`,
/// - the child exits while it is being read or written: the error type whose
///   code matches the exit status (`UnknownError` if none does),
/// - the child is killed by a signal: `ExecuteError`,
/// - no line arrives within the timeout: `FileReadError`,
/// - I/O on an exec that is not open: `FileReadError` / `FileWriteError`.
///
/// Dropping an `Exec` kills and reaps a child that is still running.
pub struct Exec {
    command: String,
    args: Vec<String>,
    name: String,
    timeout: Duration,
    state: ExecState,
}

impl Exec {
    /// Describe a child. Nothing runs until [`Exec::open`].
    pub fn new(
        command: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        name: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            name: name.into(),
            timeout,
            state: ExecState::Idle,
        }
    }

    /// Like [`Exec::new`], with the timeout taken from configuration.
    pub fn from_config(
        command: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        name: impl Into<String>,
        config: &ExecConfig,
    ) -> Self {
        Self::new(command, args, name, config.effective_timeout())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Pid of the child, once started.
    pub fn process_id(&self) -> Option<u32> {
        match &self.state {
            ExecState::Open(running) => Some(running.child.id()),
            ExecState::Closed(Some(child)) => Some(child.id()),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ExecState::Open(_))
    }

    /// Start the child.
    pub fn open(&mut self) {
        if !matches!(self.state, ExecState::Idle) {
            throw!(ASSERT_ERROR, "exec '{}' was already opened", self.name);
        }

        let spawned = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(error) => throw_io_error(
                &EXECUTE_ERROR,
                &error,
                here!(),
                &format!("unable to execute '{}'", self.command),
            ),
        };

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            reap(&mut child, &self.name);
            throw!(EXECUTE_ERROR, "unable to pipe to '{}'", self.command);
        };

        let lines = match spawn_line_reader(&self.name, stdout) {
            Ok(lines) => lines,
            Err(error) => {
                reap(&mut child, &self.name);
                throw_io_error(
                    &EXECUTE_ERROR,
                    &error,
                    here!(),
                    &format!("unable to start reader for {}", self.name),
                )
            }
        };

        tracing::debug!(name = %self.name, pid = child.id(), "child process started");

        self.state = ExecState::Open(Running {
            stderr: child.stderr.take(),
            stdin: Some(BufWriter::new(stdin)),
            lines,
            child,
        });
    }

    /// Read one line from the child's stdout, without its terminator.
    pub fn read_line(&mut self) -> String {
        let timeout = self.timeout;
        let (running, name) = self.running(Direction::Read);

        match running.lines.recv_timeout(timeout) {
            Ok(ReadEvent::Line(line)) => line,
            Ok(ReadEvent::Failed(error)) => throw_io_error(
                &FILE_READ_ERROR,
                &error,
                here!(),
                &format!("unable to read from {name} read"),
            ),
            Ok(ReadEvent::Eof) | Err(RecvTimeoutError::Disconnected) => {
                match running.exited(name, timeout) {
                    Some(status) => running.raise_exit(name, status),
                    None => throw!(FILE_READ_ERROR, "unexpected eof reading from '{name}'"),
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(name, timeout_ms = timeout.as_millis() as u64, "read timed out");
                throw!(
                    FILE_READ_ERROR,
                    "timeout after {}ms waiting for read from '{name}'",
                    timeout.as_millis()
                )
            }
        }
    }

    /// Queue `line` and a newline for the child's stdin. See [`Exec::flush`].
    pub fn write_line(&mut self, line: &str) {
        let timeout = self.timeout;
        let (running, name) = self.running(Direction::Write);
        let Some(stdin) = running.stdin.as_mut() else {
            bad_descriptor(Direction::Write, name)
        };

        let written = stdin
            .write_all(line.as_bytes())
            .and_then(|()| stdin.write_all(b"\n"));

        if let Err(error) = written {
            running.raise_write_failure(name, timeout, &error);
        }
    }

    /// Push queued writes to the child.
    pub fn flush(&mut self) {
        let timeout = self.timeout;
        let (running, name) = self.running(Direction::Write);
        let Some(stdin) = running.stdin.as_mut() else {
            bad_descriptor(Direction::Write, name)
        };

        if let Err(error) = stdin.flush() {
            running.raise_write_failure(name, timeout, &error);
        }
    }

    /// Flush and close the child's stdin, signalling end of input.
    pub fn close_write(&mut self) {
        let timeout = self.timeout;
        let (running, name) = self.running(Direction::Write);

        if let Some(mut stdin) = running.stdin.take() {
            if let Err(error) = stdin.flush() {
                running.raise_write_failure(name, timeout, &error);
            }
        }
    }

    /// Close stdin and wait for the child to exit.
    ///
    /// How the child exits is not checked. A child still running after the
    /// timeout raises `ExecuteError` and is reaped when the `Exec` drops.
    /// Closing an exec that is not open does nothing.
    pub fn close(&mut self) {
        let mut running = match mem::replace(&mut self.state, ExecState::Closed(None)) {
            ExecState::Open(running) => running,
            other => {
                self.state = other;
                return;
            }
        };

        drop(running.stdin.take());

        match wait_exit(&mut running.child, self.timeout) {
            Ok(Some(status)) => {
                tracing::debug!(name = %self.name, %status, "child process exited");
            }
            Ok(None) => {
                tracing::warn!(name = %self.name, pid = running.child.id(), "child did not exit");
                self.state = ExecState::Closed(Some(running.child));
                throw!(EXECUTE_ERROR, "{} did not exit when expected", self.name);
            }
            Err(error) => {
                self.state = ExecState::Closed(Some(running.child));
                throw_io_error(
                    &EXECUTE_ERROR,
                    &error,
                    here!(),
                    &format!("unable to wait on {}", self.name),
                );
            }
        }
    }

    fn running(&mut self, direction: Direction) -> (&mut Running, &str) {
        match &mut self.state {
            ExecState::Open(running) => (running, &self.name),
            _ => bad_descriptor(direction, &self.name),
        }
    }
}

impl Running {
    /// Exit status if the child ends within `timeout`.
    fn exited(&mut self, name: &str, timeout: Duration) -> Option<ExitStatus> {
        match wait_exit(&mut self.child, timeout) {
            Ok(status) => status,
            Err(error) => throw_io_error(
                &EXECUTE_ERROR,
                &error,
                here!(),
                &format!("unable to wait on {name}"),
            ),
        }
    }

    fn raise_exit(&mut self, name: &str, status: ExitStatus) -> ! {
        let stderr = drain_stderr(self.stderr.take());
        raise_for_status(name, status, &stderr)
    }

    /// A write failed: report the child's exit if it ended, else the I/O error.
    fn raise_write_failure(&mut self, name: &str, timeout: Duration, error: &io::Error) -> ! {
        if let Some(status) = self.exited(name, timeout) {
            self.raise_exit(name, status);
        }

        throw_io_error(
            &FILE_WRITE_ERROR,
            error,
            here!(),
            &format!("unable to write to {name} write"),
        )
    }
}

fn bad_descriptor(direction: Direction, name: &str) -> ! {
    match direction {
        Direction::Read => {
            throw_sys_error_code!(EBADF, FILE_READ_ERROR, "unable to read from {name} read")
        }
        Direction::Write => {
            throw_sys_error_code!(EBADF, FILE_WRITE_ERROR, "unable to write to {name} write")
        }
    }
}

/// Kill `child` if it is still running, then collect its exit status.
fn reap(child: &mut Child, name: &str) {
    if let Ok(None) = child.try_wait() {
        tracing::warn!(name, pid = child.id(), "killing child process");
        if let Err(error) = child.kill() {
            tracing::debug!(name, %error, "unable to kill child process");
        }
    }

    if let Err(error) = child.wait() {
        tracing::debug!(name, %error, "unable to reap child process");
    }
}

impl Drop for Exec {
    fn drop(&mut self) {
        match &mut self.state {
            ExecState::Open(running) => {
                drop(running.stdin.take());
                reap(&mut running.child, &self.name);
            }
            ExecState::Closed(Some(child)) => reap(child, &self.name),
            _ => {}
        }
    }
}
