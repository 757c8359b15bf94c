//! regionfx-test - Regression test framework for regionfx
//!
//! Provides the [`RegParams`] check recorder used by every crate's
//! `tests/*_reg.rs` files, plus builders for synthetic rasters so tests
//! never depend on image files.
//!
//! # Usage
//!
//! ```ignore
//! use regionfx_test::{RegParams, rgba_from_fn, full_mask};
//!
//! let mut rp = RegParams::new("equalize");
//! rp.compare_values(128.0, out.pixel(0)[0] as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"; display mode
//!   writes PNG snapshots to `tests/regout` at the workspace root.

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use regionfx_core::{CoverageMask, RgbaBuffer};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // regionfx-test is at crates/regionfx-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Build an RGBA buffer by evaluating `f` at every pixel
pub fn rgba_from_fn(
    width: u32,
    height: u32,
    f: impl Fn(u32, u32) -> [u8; 4],
) -> TestResult<RgbaBuffer> {
    let mut buf = RgbaBuffer::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            buf.put(x, y, f(x, y));
        }
    }
    Ok(buf)
}

/// Build an RGBA buffer of one solid color
pub fn solid_rgba(width: u32, height: u32, rgba: [u8; 4]) -> TestResult<RgbaBuffer> {
    rgba_from_fn(width, height, |_, _| rgba)
}

/// Build a coverage mask by evaluating `f` at every pixel
pub fn mask_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> TestResult<CoverageMask> {
    let mut mask = CoverageMask::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            mask.put(x, y, f(x, y));
        }
    }
    Ok(mask)
}

/// Build a fully selected mask
pub fn full_mask(width: u32, height: u32) -> TestResult<CoverageMask> {
    Ok(CoverageMask::filled(width, height, 255)?)
}

/// Number of pixels that differ between two same-sized buffers
pub fn count_changed(a: &RgbaBuffer, b: &RgbaBuffer) -> usize {
    a.data()
        .chunks_exact(4)
        .zip(b.data().chunks_exact(4))
        .filter(|(p, q)| p != q)
        .count()
}
