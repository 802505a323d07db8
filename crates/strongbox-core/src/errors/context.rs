//! Per-thread error context: try-stack plus active error slot.
//!
//! Every thread owns its own context, so nothing here is shared or locked.
//! Borrows of the context never span user code; callers take what they need
//! and release it before running bodies, catches, finallys, or handlers.

use std::cell::RefCell;

use super::active::{ActiveError, ErrorLocation};
use super::registry::ASSERT_ERROR;
use super::settings::{self, ErrorSettings};
use super::throw;
use super::try_stack::{TryPhase, TryStack};
use super::types::ErrorType;

pub(crate) struct ErrorContext {
    pub(crate) settings: ErrorSettings,
    pub(crate) stack: TryStack,
    pub(crate) error: Option<ActiveError>,
}

impl ErrorContext {
    fn new(settings: ErrorSettings) -> Self {
        Self {
            settings,
            stack: TryStack::new(settings.try_max),
            error: None,
        }
    }

    pub(crate) fn is_fatal(&self) -> bool {
        self.error.as_ref().is_some_and(ActiveError::is_fatal)
    }
}

thread_local! {
    static CONTEXT: RefCell<ErrorContext> = RefCell::new(ErrorContext::new(settings::installed()));
}

pub(crate) fn with_context<R>(f: impl FnOnce(&mut ErrorContext) -> R) -> R {
    CONTEXT.with(|context| f(&mut context.borrow_mut()))
}

/// Number of try regions open on this thread.
pub fn try_depth() -> usize {
    with_context(|ctx| ctx.stack.depth())
}

/// Phase of the frame at `depth` (1 is the outermost).
pub fn frame_phase(depth: usize) -> Option<TryPhase> {
    with_context(|ctx| ctx.stack.frame(depth).map(|frame| frame.phase))
}

/// Settings of this thread's context.
pub fn thread_settings() -> ErrorSettings {
    with_context(|ctx| ctx.settings)
}

/// Replace this thread's settings.
///
/// Raises `AssertError` when a try region is open.
#[track_caller]
pub fn reconfigure_thread(settings: ErrorSettings) {
    let location = ErrorLocation::caller();
    let applied = with_context(|ctx| {
        if !ctx.stack.is_empty() {
            return false;
        }

        ctx.settings = settings;
        ctx.stack.resize(settings.try_max);
        true
    });

    if !applied {
        throw::throw(
            &ASSERT_ERROR,
            location,
            "error settings cannot change while a try region is open",
        );
    }
}

/// Clone of the active error, if one exists.
pub fn active_error() -> Option<ActiveError> {
    with_context(|ctx| ctx.error.clone())
}

pub fn error_type() -> Option<&'static ErrorType> {
    with_context(|ctx| ctx.error.as_ref().map(ActiveError::error_type))
}

pub fn error_code() -> Option<i32> {
    with_context(|ctx| ctx.error.as_ref().map(ActiveError::code))
}

pub fn error_name() -> Option<&'static str> {
    with_context(|ctx| ctx.error.as_ref().map(ActiveError::name))
}

pub fn error_message() -> Option<String> {
    with_context(|ctx| ctx.error.as_ref().map(|error| error.message().to_owned()))
}

pub fn error_location() -> Option<ErrorLocation> {
    with_context(|ctx| ctx.error.as_ref().map(ActiveError::location))
}

pub fn error_trace() -> Option<String> {
    with_context(|ctx| {
        ctx.error
            .as_ref()
            .and_then(|error| error.trace().map(str::to_owned))
    })
}
