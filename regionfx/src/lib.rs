//! regionfx - Selection-constrained raster adjustments
//!
//! Pure pixel-buffer transforms for image editors. Each takes an RGBA layer,
//! a per-pixel selection coverage mask (0-255, feathering allowed) and a
//! layer-type flag, and returns a new buffer of the same shape.
//!
//! # Overview
//!
//! - Region equalization (flatten connected regions toward their mean color)
//! - Boundary-protected separable blur and pixel transition
//! - Smart edge smoothing with centerline stroke resynthesis
//! - Color-hole patching bounded by line-art barriers
//!
//! # Example
//!
//! ```
//! use regionfx::{Adjustment, CoverageMask, Layer, RgbaBuffer, apply};
//! use regionfx::region::EqualizeOptions;
//!
//! let mut pixels = RgbaBuffer::new(2, 2).unwrap();
//! pixels.put(0, 0, [255, 0, 0, 255]);
//! pixels.put(1, 0, [255, 0, 0, 255]);
//! pixels.put(0, 1, [0, 0, 255, 255]);
//! pixels.put(1, 1, [0, 0, 255, 255]);
//! let mask = CoverageMask::filled(2, 2, 255).unwrap();
//! let layer = Layer::new(&pixels, &mask, false).unwrap();
//!
//! let out = apply(&layer, &Adjustment::Equalize(EqualizeOptions::default()));
//! assert_eq!(out.get(1, 1), Some([128, 0, 128, 255]));
//! ```

mod adjust;

// Re-export core types (primary data structures used everywhere)
pub use regionfx_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use regionfx_filter as filter;
pub use regionfx_region as region;

pub use adjust::{Adjustment, apply};
