//! Configuration system for Strongbox.
//! TOML-based, layered resolution: CLI > env > project file > defaults.

pub mod errors_config;
pub mod exec_config;
pub mod strongbox_config;

pub use errors_config::ErrorsConfig;
pub use exec_config::ExecConfig;
pub use strongbox_config::{CliOverrides, StrongboxConfig};
