//! # strongbox-exec
//!
//! Child process execution for Strongbox.
//!
//! Long-running children are driven line by line through [`Exec`]; one-shot
//! shell commands run through [`exec_one`]. Every failure (a child that cannot
//! start, dies, exits with an error, or stops responding) is raised through
//! the error core, so callers handle it with regions like any other error.

pub mod exec;
pub mod exec_one;
mod reader;
mod status;

pub use exec::Exec;
pub use exec_one::{exec_one, ExecOneParam};
