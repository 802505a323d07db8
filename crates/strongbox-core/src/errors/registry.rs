//! The compiled-in error type registry.
//!
//! `RuntimeError` is the hierarchy root. Codes are stable: they double as
//! process exit statuses and as the exit codes child processes use to report
//! a typed failure back to their parent.

use super::types::ErrorType;

/// Root of the hierarchy.
pub static RUNTIME_ERROR: ErrorType = ErrorType::root(122, "RuntimeError");

macro_rules! error_types {
    ($($(#[$meta:meta])* $ident:ident = ($code:literal, $name:literal, $fatal:literal);)*) => {
        $(
            $(#[$meta])*
            pub static $ident: ErrorType = ErrorType::new($code, $name, $fatal, &RUNTIME_ERROR);
        )*

        /// Every registered type, root first.
        pub static ERROR_TYPES: &[&ErrorType] = &[&RUNTIME_ERROR, $(&$ident),*];
    };
}

error_types! {
    /// Broken internal invariant. Also raised by the engine for try-stack overflow.
    ASSERT_ERROR = (25, "AssertError", true);
    CHECKSUM_ERROR = (26, "ChecksumError", false);
    CONFIG_ERROR = (27, "ConfigError", false);
    FILE_INVALID_ERROR = (28, "FileInvalidError", false);
    FORMAT_ERROR = (29, "FormatError", false);
    OPTION_INVALID_ERROR = (31, "OptionInvalidError", false);
    OPTION_INVALID_VALUE_ERROR = (32, "OptionInvalidValueError", false);
    OPTION_REQUIRED_ERROR = (37, "OptionRequiredError", false);
    PG_RUNNING_ERROR = (38, "PgRunningError", false);
    PROTOCOL_ERROR = (39, "ProtocolError", false);
    PATH_NOT_EMPTY_ERROR = (40, "PathNotEmptyError", false);
    FILE_OPEN_ERROR = (41, "FileOpenError", false);
    FILE_READ_ERROR = (42, "FileReadError", false);
    PARAM_REQUIRED_ERROR = (43, "ParamRequiredError", false);
    ARCHIVE_MISMATCH_ERROR = (44, "ArchiveMismatchError", false);
    PATH_CREATE_ERROR = (47, "PathCreateError", false);
    HOST_CONNECT_ERROR = (49, "HostConnectError", false);
    LOCK_ACQUIRE_ERROR = (50, "LockAcquireError", false);
    BACKUP_MISMATCH_ERROR = (51, "BackupMismatchError", false);
    FILE_SYNC_ERROR = (52, "FileSyncError", false);
    PATH_OPEN_ERROR = (53, "PathOpenError", false);
    FILE_MISSING_ERROR = (55, "FileMissingError", false);
    DB_CONNECT_ERROR = (56, "DbConnectError", false);
    DB_QUERY_ERROR = (57, "DbQueryError", false);
    ARCHIVE_TIMEOUT_ERROR = (59, "ArchiveTimeoutError", false);
    PROTOCOL_TIMEOUT_ERROR = (62, "ProtocolTimeoutError", false);
    FILE_REMOVE_ERROR = (64, "FileRemoveError", false);
    FILE_WRITE_ERROR = (65, "FileWriteError", false);
    /// A child process could not be started or ended abnormally.
    EXECUTE_ERROR = (102, "ExecuteError", false);
    INVALID_ERROR = (123, "InvalidError", false);
    UNHANDLED_ERROR = (124, "UnhandledError", false);
    /// Substituted when a code does not resolve to a registered type.
    UNKNOWN_ERROR = (125, "UnknownError", false);
}

/// Look up a registered type by code.
pub fn error_type_from_code(code: i32) -> Option<&'static ErrorType> {
    ERROR_TYPES.iter().copied().find(|ty| ty.code() == code)
}
