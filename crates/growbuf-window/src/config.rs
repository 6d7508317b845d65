//! Window counter configuration.

use crate::error::ConfigError;

/// Configuration for the sliding-window counter.
///
/// Validated by [`run`](crate::run) before any input is read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    /// Number of consecutive values in each window.
    ///
    /// Default: 4. Must be at least 2, since a window's last value is
    /// compared with its first.
    pub width: usize,
}

impl WindowConfig {
    /// Default window width.
    pub const DEFAULT_WIDTH: usize = 4;

    /// Smallest width for which first and last element differ.
    pub const MIN_WIDTH: usize = 2;

    /// Create a config with the given window width.
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < Self::MIN_WIDTH {
            return Err(ConfigError::WidthTooSmall {
                configured: self.width,
            });
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH)
    }
}
