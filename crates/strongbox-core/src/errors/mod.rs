//! Error handling for Strongbox.
//!
//! Two layers live here. The error runtime (typed hierarchy, try regions,
//! throw/rethrow, handlers, uncaught exit) is what the rest of the engine
//! uses to signal failure. Result-based infrastructure such as config
//! loading uses one `thiserror` enum per subsystem.

pub mod active;
pub mod codes;
pub mod config_error;
pub mod context;
pub mod exit;
pub mod handler;
pub mod region;
pub mod registry;
pub mod settings;
pub mod throw;
pub mod try_stack;
pub mod types;

pub use active::{ActiveError, ErrorLocation};
pub use codes::StrongboxErrorCode;
pub use config_error::ConfigError;
pub use context::{
    active_error, error_code, error_location, error_message, error_name, error_trace,
    error_type, frame_phase, reconfigure_thread, thread_settings, try_depth,
};
pub use handler::{handler_count, set_handlers, ErrorHandler};
pub use region::{attempt, region, CatchClause, Region};
pub use registry::*;
pub use settings::{install_settings, ErrorSettings};
pub use throw::{
    os_error_description, rethrow, throw, throw_code, throw_io_error, throw_sys_error,
    throw_sys_error_code, throw_with_trace,
};
pub use try_stack::TryPhase;
pub use types::{extends, ErrorType};
