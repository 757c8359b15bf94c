//! regionfx-filter - Selection-constrained filtering
//!
//! This crate provides neighborhood filters that stay inside a selection:
//!
//! - Boundary-protected separable Gaussian blur
//! - Pixel transition (blur with silhouette protection)
//! - Smart edge smoothing with stroke resynthesis

pub mod blur;
mod error;
pub mod kernel;
pub mod smooth;
pub mod transition;

pub use error::{FilterError, FilterResult};
pub use kernel::GaussianKernel;

// Re-export commonly used items
pub use blur::{BlurOptions, separable_blur};
pub use smooth::{SmartSmoothOptions, SmoothMode, smart_smooth};
pub use transition::{TransitionOptions, pixel_transition};
