//! Error types for regionfx-core
//!
//! Provides a unified error type for constructing the raster model.
//! The pixel transforms themselves never fail once a [`Layer`] exists;
//! these errors only describe buffers that cannot form a valid layer.
//!
//! [`Layer`]: crate::Layer

use thiserror::Error;

/// regionfx-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid grid dimensions
    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Raw buffer length does not match the grid
    #[error("buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    /// Pixel grid and mask grid differ
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for regionfx-core operations
pub type Result<T> = std::result::Result<T, Error>;
