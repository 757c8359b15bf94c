//! Line reference buffers
//!
//! The color-hole patcher detects line barriers from a second layer (the
//! line art). Hosts hand that layer over in whatever channel layout it has;
//! it is normalized to RGBA once here.

use crate::error::{RegionError, RegionResult};
use regionfx_core::{Bounds, RgbaBuffer};

/// Line art layer normalized to RGBA
#[derive(Debug, Clone)]
pub struct LineReference {
    pixels: RgbaBuffer,
}

impl LineReference {
    /// Normalize a raw buffer with `channels` interleaved samples per pixel
    ///
    /// - 1: gray, expanded to `(v, v, v, 255)`
    /// - 2: gray + alpha
    /// - 3: RGB, alpha set to 255
    /// - 4: RGBA, copied as is
    ///
    /// # Errors
    ///
    /// Returns an error for any other channel count, or if `data.len()` is
    /// not `width * height * channels`.
    pub fn from_channels(data: &[u8], width: u32, height: u32, channels: u8) -> RegionResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(RegionError::UnsupportedChannels(channels));
        }
        let bounds = Bounds::new(width, height)?;
        let expected = bounds.area() * channels as usize;
        if data.len() != expected {
            return Err(regionfx_core::Error::BufferLength {
                expected,
                actual: data.len(),
            }
            .into());
        }

        let mut rgba = Vec::with_capacity(bounds.area() * 4);
        for px in data.chunks_exact(channels as usize) {
            let quad = match *px {
                [v] => [v, v, v, 255],
                [v, a] => [v, v, v, a],
                [r, g, b] => [r, g, b, 255],
                [r, g, b, a] => [r, g, b, a],
                _ => unreachable!("chunks_exact yields 1-4 samples"),
            };
            rgba.extend_from_slice(&quad);
        }

        Ok(Self {
            pixels: RgbaBuffer::from_raw(width, height, rgba)?,
        })
    }

    /// Use an RGBA buffer directly
    pub fn from_rgba(pixels: RgbaBuffer) -> Self {
        Self { pixels }
    }

    /// Grid geometry
    pub fn bounds(&self) -> Bounds {
        self.pixels.bounds()
    }

    /// Normalized RGBA pixels
    pub fn pixels(&self) -> &RgbaBuffer {
        &self.pixels
    }
}
