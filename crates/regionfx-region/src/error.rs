//! Error types for regionfx-region

use thiserror::Error;

/// Errors that can occur while preparing region operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] regionfx_core::Error),

    /// Unsupported channel count for a line reference buffer
    #[error("unsupported channel count: expected 1-4, got {0}")]
    UnsupportedChannels(u8),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
