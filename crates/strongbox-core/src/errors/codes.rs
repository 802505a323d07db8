//! StrongboxErrorCode trait and subsystem code tags.

/// Trait for tagging errors with a stable code string.
/// Every `thiserror` enum in the workspace implements this so failures can be
/// reported in a uniform `[CODE] message` form.
pub trait StrongboxErrorCode {
    /// Returns the code tag (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the tagged string: `[CODE] message`.
    fn tagged_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SETTINGS_INSTALLED: &str = "SETTINGS_INSTALLED";
