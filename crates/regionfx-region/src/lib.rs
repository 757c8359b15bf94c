//! regionfx-region - Region processing for regionfx
//!
//! This crate provides the graph-traversal transforms:
//!
//! - **Connected components** - Iterative 4-connected flood fill over a work rectangle
//! - **Region equalization** - Flatten each selected region toward its average color
//! - **Color-hole patching** - Multi-source BFS color propagation bounded by line barriers
//!
//! # Examples
//!
//! ## Equalizing a selected region
//!
//! ```
//! use regionfx_core::{CoverageMask, Layer, RgbaBuffer};
//! use regionfx_region::{EqualizeOptions, equalize_regions};
//!
//! let mut pixels = RgbaBuffer::new(2, 1).unwrap();
//! pixels.put(0, 0, [200, 0, 0, 255]);
//! pixels.put(1, 0, [100, 0, 0, 255]);
//! let mask = CoverageMask::filled(2, 1, 255).unwrap();
//! let layer = Layer::new(&pixels, &mask, false).unwrap();
//!
//! let out = equalize_regions(&layer, &EqualizeOptions::default());
//! assert_eq!(out.get(0, 0), Some([150, 0, 0, 255]));
//! assert_eq!(out.get(1, 0), Some([150, 0, 0, 255]));
//! ```
//!
//! ## Patching holes
//!
//! ```
//! use regionfx_core::{CoverageMask, Layer, RgbaBuffer};
//! use regionfx_region::{HolePatchOptions, LineReference, patch_color_holes};
//!
//! let mut pixels = RgbaBuffer::new(3, 1).unwrap();
//! pixels.put(0, 0, [0, 0, 255, 255]);
//! let mask = CoverageMask::filled(3, 1, 255).unwrap();
//! let layer = Layer::new(&pixels, &mask, false).unwrap();
//! let lines = LineReference::from_channels(&[255, 255, 255], 3, 1, 1).unwrap();
//!
//! let out = patch_color_holes(&layer, layer.bounds().full_rect(), &lines, &HolePatchOptions::default());
//! assert_eq!(out.get(2, 0), Some([0, 0, 255, 255]));
//! ```

pub mod conncomp;
pub mod equalize;
pub mod error;
pub mod holefill;
pub mod lineref;

// Re-export core types
pub use regionfx_core;

// Re-export error types
pub use error::{RegionError, RegionResult};

pub use conncomp::{flood_component, for_each_component};
pub use equalize::{COLOR_TOLERANCE, EqualizeOptions, MAX_CLUSTERS, equalize_regions};
pub use holefill::{HolePatchOptions, patch_color_holes};
pub use lineref::LineReference;
