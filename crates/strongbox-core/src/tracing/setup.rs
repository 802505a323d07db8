//! Subscriber setup for processes embedding the error core.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants;

static INIT: Once = Once::new();

/// Install the global subscriber once per process.
///
/// Directives come from `STRONGBOX_LOG`, e.g. `strongbox_exec=trace`. Events
/// are written to stderr: stdout may be a protocol stream owned by the caller.
pub fn init_tracing() {
    INIT.call_once(|| {
        let directives = std::env::var(constants::LOG_ENV).ok();

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(env_filter(directives.as_deref()))
            .init();
    });
}

/// Parse `directives`, or use the default filter when absent or malformed.
pub(crate) fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(constants::DEFAULT_LOG_FILTER))
}
