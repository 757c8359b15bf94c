//! Raster model - pixel buffers, coverage masks and layer views
//!
//! # Pixel layout
//!
//! - [`RgbaBuffer`] stores 8-bit RGBA samples, 4 bytes per pixel, rows
//!   packed without padding. Pixel `(x, y)` starts at `(y*width + x)*4`.
//! - [`CoverageMask`] stores one byte per pixel: 0 = excluded,
//!   255 = fully selected, intermediate values are feathered coverage.
//!
//! # Ownership model
//!
//! The host hands both buffers to a [`Layer`] by reference. A transform
//! reads the layer and returns a fresh [`RgbaBuffer`]; nothing is retained
//! after the call.

mod luma;

pub use luma::{luma, luma_buffer, premultiply};

use crate::error::{Error, Result};
use crate::rect::{Bounds, Rect};

/// Channel offsets inside one RGBA pixel
pub mod channel {
    /// Red channel
    pub const RED: usize = 0;
    /// Green channel
    pub const GREEN: usize = 1;
    /// Blue channel
    pub const BLUE: usize = 2;
    /// Alpha channel
    pub const ALPHA: usize = 3;
}

/// An 8-bit RGBA pixel buffer covering the full grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    bounds: Bounds,
    data: Vec<u8>,
}

impl RgbaBuffer {
    /// Create a fully transparent buffer
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let bounds = Bounds::new(width, height)?;
        Ok(Self {
            bounds,
            data: vec![0; bounds.area() * 4],
        })
    }

    /// Wrap raw RGBA bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or `data.len()` is not
    /// `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let bounds = Bounds::new(width, height)?;
        let expected = bounds.area() * 4;
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { bounds, data })
    }

    /// Grid width
    #[inline]
    pub fn width(&self) -> u32 {
        self.bounds.width
    }

    /// Grid height
    #[inline]
    pub fn height(&self) -> u32 {
        self.bounds.height
    }

    /// Grid geometry
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Raw RGBA bytes
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA bytes
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer, returning the raw bytes
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// RGBA value of the pixel at flat index `i`
    #[inline]
    pub fn pixel(&self, i: usize) -> [u8; 4] {
        let o = i * 4;
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }

    /// Overwrite the pixel at flat index `i`
    #[inline]
    pub fn set_pixel(&mut self, i: usize, rgba: [u8; 4]) {
        let o = i * 4;
        self.data[o..o + 4].copy_from_slice(&rgba);
    }

    /// RGBA value at `(x, y)`, or `None` if outside the grid
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.bounds.width || y >= self.bounds.height {
            return None;
        }
        Some(self.pixel(self.bounds.index(x, y)))
    }

    /// Set the RGBA value at `(x, y)`; out-of-grid writes are ignored
    pub fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x < self.bounds.width && y < self.bounds.height {
            let i = self.bounds.index(x, y);
            self.set_pixel(i, rgba);
        }
    }
}

/// Per-pixel selection coverage (0-255) covering the full grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMask {
    bounds: Bounds,
    data: Vec<u8>,
}

impl CoverageMask {
    /// Create an empty (all zero) mask
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let bounds = Bounds::new(width, height)?;
        Ok(Self {
            bounds,
            data: vec![0; bounds.area()],
        })
    }

    /// Create a mask with every pixel at `value`
    pub fn filled(width: u32, height: u32, value: u8) -> Result<Self> {
        let bounds = Bounds::new(width, height)?;
        Ok(Self {
            bounds,
            data: vec![value; bounds.area()],
        })
    }

    /// Wrap raw coverage bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or `data.len()` is not
    /// `width * height`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let bounds = Bounds::new(width, height)?;
        let expected = bounds.area();
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { bounds, data })
    }

    /// Grid geometry
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Raw coverage bytes
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw coverage bytes
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Coverage at flat index `i`
    #[inline]
    pub fn at(&self, i: usize) -> u8 {
        self.data[i]
    }

    /// Set coverage at `(x, y)`; out-of-grid writes are ignored
    pub fn put(&mut self, x: u32, y: u32, value: u8) {
        if x < self.bounds.width && y < self.bounds.height {
            let i = self.bounds.index(x, y);
            self.data[i] = value;
        }
    }

    /// Check if no pixel is selected
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&m| m == 0)
    }
}

/// The active layer as seen by a transform
///
/// Couples the layer pixels with the selection coverage on the same grid.
/// For a background layer the alpha channel is not transparency: every
/// pixel is treated as opaque and coverage comes from the mask alone.
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    pixels: &'a RgbaBuffer,
    mask: &'a CoverageMask,
    background: bool,
}

impl<'a> Layer<'a> {
    /// Create a layer view
    ///
    /// # Errors
    ///
    /// Returns an error if the mask grid differs from the pixel grid.
    pub fn new(pixels: &'a RgbaBuffer, mask: &'a CoverageMask, background: bool) -> Result<Self> {
        if pixels.bounds() != mask.bounds() {
            return Err(Error::DimensionMismatch {
                expected: (pixels.width(), pixels.height()),
                actual: (mask.bounds().width, mask.bounds().height),
            });
        }
        Ok(Self {
            pixels,
            mask,
            background,
        })
    }

    /// Layer pixels
    #[inline]
    pub fn pixels(&self) -> &'a RgbaBuffer {
        self.pixels
    }

    /// Selection coverage
    #[inline]
    pub fn mask(&self) -> &'a CoverageMask {
        self.mask
    }

    /// Check if this is a background (always opaque) layer
    #[inline]
    pub fn is_background(&self) -> bool {
        self.background
    }

    /// Grid geometry
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.pixels.bounds()
    }

    /// Coverage at flat index `i`
    #[inline]
    pub fn coverage(&self, i: usize) -> u8 {
        self.mask.at(i)
    }

    /// Effective alpha at flat index `i` (255 for background layers)
    #[inline]
    pub fn alpha_at(&self, i: usize) -> u8 {
        if self.background {
            255
        } else {
            self.pixels.data[i * 4 + channel::ALPHA]
        }
    }

    /// Check if the pixel is selected and, for regular layers, not transparent
    #[inline]
    pub fn is_foreground(&self, i: usize) -> bool {
        self.mask.at(i) > 0 && (self.background || self.pixels.data[i * 4 + channel::ALPHA] > 0)
    }

    /// Padded bounding rectangle of the selection (empty if nothing is selected)
    pub fn work_rect(&self, pad: u32) -> Rect {
        Rect::selection_bounds(self.mask.data(), self.bounds(), pad)
    }

    /// Premultiplied luma of every pixel (see [`luma_buffer`])
    pub fn luma(&self) -> Vec<u8> {
        luma_buffer(self.pixels.data(), self.background)
    }
}
