//! # strongbox-core
//!
//! Foundation crate for the Strongbox backup engine.
//! Defines the error runtime (typed error hierarchy, try regions, handlers,
//! uncaught exit), plus config, tracing, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;

// Re-export the most commonly used types at the crate root.
pub use config::StrongboxConfig;
pub use errors::{
    attempt, extends, region, rethrow, try_depth, ActiveError, CatchClause, ErrorLocation,
    ErrorType, Region,
};
