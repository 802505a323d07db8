//! Throw operations.
//!
//! A throw overwrites the thread's active error and unwinds to the innermost
//! open region with a private marker payload. `resume_unwind` is used rather
//! than `panic!` so the panic hook never fires for engine errors. With no
//! region open the uncaught path ends the process instead.

use std::any::Any;
use std::backtrace::Backtrace;
use std::io;
use std::panic;

use super::active::{truncate_message, ActiveError, ErrorLocation};
use super::context::with_context;
use super::exit;
use super::handler;
use super::registry::{error_type_from_code, ASSERT_ERROR, UNKNOWN_ERROR};
use super::try_stack::TryPhase;
use super::types::ErrorType;
use crate::constants;

/// Unwind payload marking an engine throw.
pub(crate) struct Unwind;

pub(crate) fn is_unwind(payload: &(dyn Any + Send)) -> bool {
    payload.is::<Unwind>()
}

/// Throw `error_type` with `message`.
pub fn throw(error_type: &'static ErrorType, location: ErrorLocation, message: &str) -> ! {
    raise(error_type, error_type.is_fatal(), location, message, None)
}

/// Throw with a caller-supplied trace instead of a captured one.
pub fn throw_with_trace(
    error_type: &'static ErrorType,
    location: ErrorLocation,
    message: &str,
    trace: Option<&str>,
) -> ! {
    raise(
        error_type,
        error_type.is_fatal(),
        location,
        message,
        trace.map(str::to_owned),
    )
}

/// Throw the registered type with `code`, or `UnknownError` when no type has it.
pub fn throw_code(code: i32, location: ErrorLocation, message: &str) -> ! {
    let error_type = error_type_from_code(code).unwrap_or(&UNKNOWN_ERROR);
    throw(error_type, location, message)
}

/// Throw with the OS error of the last failed call appended to `message`.
pub fn throw_sys_error(error_type: &'static ErrorType, location: ErrorLocation, message: &str) -> ! {
    let errno = io::Error::last_os_error().raw_os_error().unwrap_or(0);
    throw_sys_error_code(error_type, errno, location, message)
}

/// Throw with `": [<errno>] <description>"` appended. An errno of 0 appends nothing.
pub fn throw_sys_error_code(
    error_type: &'static ErrorType,
    errno: i32,
    location: ErrorLocation,
    message: &str,
) -> ! {
    if errno == 0 {
        throw(error_type, location, message)
    } else {
        let message = format!("{message}: [{errno}] {}", os_error_description(errno));
        throw(error_type, location, &message)
    }
}

/// Throw for a failed I/O operation, using its OS code when it has one.
pub fn throw_io_error(
    error_type: &'static ErrorType,
    error: &io::Error,
    location: ErrorLocation,
    message: &str,
) -> ! {
    match error.raw_os_error() {
        Some(errno) => throw_sys_error_code(error_type, errno, location, message),
        None => throw(error_type, location, &format!("{message}: {error}")),
    }
}

/// Platform description of `errno`, without the `(os error N)` suffix std adds.
pub fn os_error_description(errno: i32) -> String {
    let text = io::Error::from_raw_os_error(errno).to_string();
    let suffix = format!(" (os error {errno})");

    match text.strip_suffix(&suffix) {
        Some(description) => description.to_owned(),
        None => text,
    }
}

/// Forward the active error to the next enclosing region unchanged.
///
/// Only valid directly inside a catch body; anywhere else raises `AssertError`.
#[track_caller]
pub fn rethrow() -> ! {
    let (in_catch, depth, fatal) = with_context(|ctx| {
        let in_catch = ctx
            .stack
            .innermost()
            .is_some_and(|frame| frame.phase == TryPhase::Catch);

        (in_catch && ctx.error.is_some(), ctx.stack.depth(), ctx.is_fatal())
    });

    if !in_catch {
        raise(
            &ASSERT_ERROR,
            true,
            ErrorLocation::caller(),
            constants::RETHROW_OUTSIDE_CATCH_MESSAGE,
            None,
        );
    }

    tracing::trace!(depth, "error rethrown");
    propagate(depth, fatal)
}

/// Record the error and start unwinding from the current depth.
pub(crate) fn raise(
    error_type: &'static ErrorType,
    fatal: bool,
    location: ErrorLocation,
    message: &str,
    trace: Option<String>,
) -> ! {
    let depth = with_context(|ctx| {
        let trace = trace.or_else(|| {
            ctx.settings
                .capture_trace
                .then(|| Backtrace::force_capture().to_string())
        });
        let message = truncate_message(message, ctx.settings.message_capacity);

        ctx.error = Some(ActiveError::new(error_type, fatal, message, location, trace));
        ctx.stack.depth()
    });

    tracing::debug!(
        error = error_type.name(),
        code = error_type.code(),
        fatal,
        depth,
        file = location.file,
        line = location.line,
        "error thrown"
    );

    propagate(depth, fatal)
}

/// Transfer control to the innermost of `depth` open regions, or exit.
///
/// Handlers see every transfer with the depth it lands at, before any
/// catch or finally of that region runs.
pub(crate) fn propagate(depth: usize, fatal: bool) -> ! {
    if depth == 0 {
        exit::exit_uncaught();
    }

    handler::notify(depth, fatal);
    panic::resume_unwind(Box::new(Unwind))
}

#[doc(hidden)]
pub fn function_name_of(probe_path: &'static str) -> &'static str {
    let mut path = probe_path.strip_suffix("::probe").unwrap_or(probe_path);

    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }

    path.rsplit("::").next().unwrap_or(path)
}

/// Location of the macro call site, including the enclosing function name.
#[macro_export]
macro_rules! here {
    () => {
        $crate::errors::ErrorLocation::new(
            ::std::file!(),
            $crate::function_name!(),
            ::std::line!(),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! function_name {
    () => {{
        fn probe() {}
        $crate::errors::throw::function_name_of(::std::any::type_name_of_val(&probe))
    }};
}

/// Throw an error type with a formatted message.
///
/// ```no_run
/// use strongbox_core::errors::FORMAT_ERROR;
/// use strongbox_core::throw;
///
/// fn parse(value: &str) -> u32 {
///     value.parse().unwrap_or_else(|_| throw!(FORMAT_ERROR, "'{value}' is not a number"))
/// }
/// ```
#[macro_export]
macro_rules! throw {
    ($error_type:expr, $($arg:tt)+) => {
        $crate::errors::throw(&$error_type, $crate::here!(), &::std::format!($($arg)+))
    };
}

/// Throw the registered type with a numeric code, or `UnknownError`.
#[macro_export]
macro_rules! throw_code {
    ($code:expr, $($arg:tt)+) => {
        $crate::errors::throw_code($code, $crate::here!(), &::std::format!($($arg)+))
    };
}

/// Throw with the last OS error appended to the message.
#[macro_export]
macro_rules! throw_sys_error {
    ($error_type:expr, $($arg:tt)+) => {{
        let errno = ::std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        $crate::errors::throw_sys_error_code(
            &$error_type,
            errno,
            $crate::here!(),
            &::std::format!($($arg)+),
        )
    }};
}

/// Throw with an explicit OS error code appended to the message.
#[macro_export]
macro_rules! throw_sys_error_code {
    ($errno:expr, $error_type:expr, $($arg:tt)+) => {
        $crate::errors::throw_sys_error_code(
            &$error_type,
            $errno,
            $crate::here!(),
            &::std::format!($($arg)+),
        )
    };
}

/// `throw_sys_error!` when `condition` holds; otherwise nothing happens.
#[macro_export]
macro_rules! throw_on_sys_error {
    ($condition:expr, $error_type:expr, $($arg:tt)+) => {
        if $condition {
            $crate::throw_sys_error!($error_type, $($arg)+);
        }
    };
}
