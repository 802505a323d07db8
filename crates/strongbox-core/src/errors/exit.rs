//! Uncaught-error reporting and process exit.

use std::process;

use super::active::ActiveError;
use super::context::with_context;
use super::registry::UNHANDLED_ERROR;

/// Text written to stderr for an error nothing caught.
pub fn uncaught_report(error: &ActiveError) -> String {
    let location = error.location();
    let mut report = format!("Uncaught {}: {}", error.name(), error.message());

    if location.function.is_empty() {
        report.push_str(&format!("\n    at {}:{}", location.file, location.line));
    } else {
        report.push_str(&format!(
            "\n    at {}:{} ({})",
            location.file, location.line, location.function
        ));
    }

    if let Some(trace) = error.trace() {
        report.push('\n');
        report.push_str(trace);
    }

    report
}

/// Print the active error and exit with its type's code.
pub(crate) fn exit_uncaught() -> ! {
    let error = with_context(|ctx| ctx.error.clone());

    match error {
        Some(error) => {
            tracing::error!(
                error = error.name(),
                code = error.code(),
                message = error.message(),
                "uncaught error, exiting"
            );
            eprintln!("{}", uncaught_report(&error));
            process::exit(error.code())
        }
        None => {
            tracing::error!("uncaught unwind without an active error, exiting");
            eprintln!("Uncaught {}: no active error", UNHANDLED_ERROR.name());
            process::exit(UNHANDLED_ERROR.code())
        }
    }
}
