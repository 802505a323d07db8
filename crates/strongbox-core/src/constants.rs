//! Shared constants for the Strongbox error core.

/// Default maximum number of nested try regions per thread.
pub const DEFAULT_TRY_MAX: usize = 32;

/// Default capacity of the error message buffer, including the terminator slot.
pub const DEFAULT_MESSAGE_CAPACITY: usize = 8192;

/// Message raised when a thread opens more try regions than allowed.
pub const TRY_OVERFLOW_MESSAGE: &str = "too many nested try blocks";

/// Message raised when `rethrow()` is called outside of a catch body.
pub const RETHROW_OUTSIDE_CATCH_MESSAGE: &str = "rethrow called outside of a catch block";

/// Default exec timeout in milliseconds.
pub const DEFAULT_EXEC_TIMEOUT_MS: u64 = 60_000;

/// Default shell used by `exec_one`.
pub const DEFAULT_SHELL: &str = "sh -c";

/// Project configuration file name.
pub const CONFIG_FILE_NAME: &str = "strongbox.toml";

/// Environment variable holding per-target log directives.
pub const LOG_ENV: &str = "STRONGBOX_LOG";

/// Log filter used when `STRONGBOX_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "strongbox=info";
