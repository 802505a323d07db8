//! The active error: the single most recent, not yet resolved error of a thread.

use std::panic::Location;

use super::codes::StrongboxErrorCode;
use super::types::ErrorType;

/// Where an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorLocation {
    pub file: &'static str,
    /// Enclosing function name. Empty when captured through `#[track_caller]`.
    pub function: &'static str,
    pub line: u32,
}

impl ErrorLocation {
    pub const fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }

    /// Location of the caller of the current `#[track_caller]` function.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&'static Location<'static>> for ErrorLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), "", location.line())
    }
}

/// Snapshot of a thrown error.
///
/// Catch bodies receive a reference; `active_error()` hands out clones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {}", .error_type.name(), .message)]
pub struct ActiveError {
    error_type: &'static ErrorType,
    fatal: bool,
    message: String,
    location: ErrorLocation,
    trace: Option<String>,
}

impl ActiveError {
    pub(crate) fn new(
        error_type: &'static ErrorType,
        fatal: bool,
        message: String,
        location: ErrorLocation,
        trace: Option<String>,
    ) -> Self {
        Self {
            error_type,
            fatal,
            message,
            location,
            trace,
        }
    }

    pub fn error_type(&self) -> &'static ErrorType {
        self.error_type
    }

    pub fn code(&self) -> i32 {
        self.error_type.code()
    }

    pub fn name(&self) -> &'static str {
        self.error_type.name()
    }

    /// Fatal when the type is fatal or the engine classified the error as fatal.
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> ErrorLocation {
        self.location
    }

    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    /// True when the error's type is `ancestor` or one of its descendants.
    pub fn is_a(&self, ancestor: &ErrorType) -> bool {
        self.error_type.is_a(ancestor)
    }
}

impl StrongboxErrorCode for ActiveError {
    fn error_code(&self) -> &'static str {
        self.error_type.name()
    }
}

/// Fit `text` into a buffer of `capacity` slots, one of which is the terminator.
///
/// Text that does not fit keeps its first `capacity - 1` characters.
pub fn truncate_message(text: &str, capacity: usize) -> String {
    match text.char_indices().nth(capacity.saturating_sub(1)) {
        Some((end, _)) => text[..end].to_owned(),
        None => text.to_owned(),
    }
}
