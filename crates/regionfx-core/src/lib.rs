//! regionfx Core - Raster model for selection-constrained adjustments
//!
//! This crate provides the shared primitives used by every transform:
//!
//! - [`Bounds`] / [`Rect`] - Full grid geometry and the padded work rectangle
//! - [`RgbaBuffer`] - 8-bit RGBA layer pixels
//! - [`CoverageMask`] - Per-pixel selection coverage (0-255, feathered)
//! - [`Layer`] - Validated view over pixels, mask and the background flag
//! - [`luma_buffer`] - Premultiplied luma used for gradients and diffs
//! - [`VisitedSet`] - Packed visited bits for flood fill and BFS
//! - [`Histogram`] / [`select_median`] - Order statistics
//!
//! # Example
//!
//! ```
//! use regionfx_core::{CoverageMask, Layer, RgbaBuffer};
//!
//! let pixels = RgbaBuffer::new(64, 48).unwrap();
//! let mask = CoverageMask::filled(64, 48, 255).unwrap();
//! let layer = Layer::new(&pixels, &mask, false).unwrap();
//! assert_eq!(layer.bounds().area(), 64 * 48);
//! ```

pub mod error;
pub mod histogram;
pub mod raster;
pub mod rect;
pub mod visited;

pub use error::{Error, Result};
pub use histogram::{Histogram, select_median};
pub use raster::{CoverageMask, Layer, RgbaBuffer, channel, luma, luma_buffer, premultiply};
pub use rect::{Bounds, Rect};
pub use visited::VisitedSet;

/// 4-connected neighbor offsets (left, right, up, down)
pub const NEIGHBORS_4: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Hermite smoothstep between `edge0` and `edge1`
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Round and clamp a float channel value to `u8`
#[inline]
pub fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Linear blend of two channel values with factor `t` in [0, 1]
#[inline]
pub fn mix(from: u8, to: f32, t: f32) -> u8 {
    to_u8(from as f32 + (to - from as f32) * t)
}
