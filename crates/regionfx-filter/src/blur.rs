//! Boundary-protected separable blur
//!
//! A Gaussian blur that never pulls color in from outside the selection or
//! from transparent pixels:
//!
//! - Only eligible pixels are blurred and only eligible neighbors
//!   contribute (eligible = selected, and non-transparent on regular
//!   layers). Each tap is weighted by the neighbor's coverage.
//! - Color is accumulated alpha-premultiplied and un-premultiplied after
//!   each 1D pass.
//! - Where the eligible taps hold less than ~97% of the kernel weight the
//!   result is faded back toward the input with a smoothstep, so edges do
//!   not grow halos.
//!
//! The final pass result is blended into the layer by each pixel's own
//! coverage.

use crate::kernel::{GaussianKernel, MAX_RADIUS};
use crate::FilterResult;
use regionfx_core::{Layer, Rect, RgbaBuffer, smoothstep, to_u8};

/// Kernel reach below which blur strength starts to fade
pub const FADE_FULL_REACH: f32 = 0.97;

/// Kernel reach at which blur strength reaches zero
pub const FADE_ZERO_REACH: f32 = 0.35;

/// Options for the separable blur
#[derive(Debug, Clone, PartialEq)]
pub struct BlurOptions {
    kernel: GaussianKernel,
}

impl Default for BlurOptions {
    fn default() -> Self {
        Self {
            kernel: GaussianKernel::build(2, 1.0),
        }
    }
}

impl BlurOptions {
    /// Blur with an explicit radius and sigma
    ///
    /// # Errors
    ///
    /// Returns an error if `sigma` is not a positive finite number.
    pub fn new(radius: u32, sigma: f32) -> FilterResult<Self> {
        Ok(Self {
            kernel: GaussianKernel::new(radius, sigma)?,
        })
    }

    /// Derive radius and sigma from one strength value
    ///
    /// `sigma = max(strength, 0.3)` and `radius = ceil(3 * sigma)`, clamped
    /// to [1, 64]. Non-finite strengths use the minimum.
    pub fn from_strength(strength: f32) -> Self {
        let sigma = if strength.is_finite() {
            strength.clamp(0.3, MAX_RADIUS as f32 / 3.0)
        } else {
            0.3
        };
        let radius = ((sigma * 3.0).ceil() as u32).clamp(1, MAX_RADIUS);
        Self {
            kernel: GaussianKernel::build(radius, sigma),
        }
    }

    /// Kernel radius
    pub fn radius(&self) -> u32 {
        self.kernel.radius()
    }

    /// Kernel sigma
    pub fn sigma(&self) -> f32 {
        self.kernel.sigma()
    }

    /// The kernel itself
    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }
}

/// Straight-alpha float RGBA plane over a work rectangle
pub(crate) struct Plane {
    pub(crate) rect: Rect,
    pub(crate) data: Vec<[f32; 4]>,
}

impl Plane {
    pub(crate) fn from_layer(layer: &Layer, rect: Rect) -> Self {
        let bounds = layer.bounds();
        let data = rect
            .indices(bounds)
            .map(|i| {
                let p = layer.pixels().pixel(i);
                [p[0] as f32, p[1] as f32, p[2] as f32, layer.alpha_at(i) as f32]
            })
            .collect();
        Self { rect, data }
    }

    #[inline]
    pub(crate) fn local(&self, x: u32, y: u32) -> usize {
        (y - self.rect.top) as usize * self.rect.width() as usize + (x - self.rect.left) as usize
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One coverage-weighted, alpha-premultiplied 1D pass
fn blur_pass(layer: &Layer, kernel: &GaussianKernel, src: &Plane, axis: Axis) -> Plane {
    let bounds = layer.bounds();
    let rect = src.rect;
    let r = kernel.radius() as i32;
    let weights = kernel.weights();
    let full = kernel.total();
    let mut dst = Plane {
        rect,
        data: src.data.clone(),
    };

    for y in rect.top..rect.bottom {
        for x in rect.left..rect.right {
            let i = bounds.index(x, y);
            if !layer.is_foreground(i) {
                continue;
            }

            let mut wsum = 0.0f32;
            let mut reach = 0.0f32;
            let mut asum = 0.0f32;
            let mut csum = [0.0f32; 3];

            for k in -r..=r {
                let (nx, ny) = match axis {
                    Axis::Horizontal => (x as i32 + k, y as i32),
                    Axis::Vertical => (x as i32, y as i32 + k),
                };
                if nx < 0 || ny < 0 || !rect.contains(nx as u32, ny as u32) {
                    continue;
                }
                let n = bounds.index(nx as u32, ny as u32);
                if !layer.is_foreground(n) {
                    continue;
                }
                let tap = weights[(k + r) as usize];
                let w = tap * layer.coverage(n) as f32 / 255.0;
                let p = src.data[src.local(nx as u32, ny as u32)];
                reach += tap;
                wsum += w;
                asum += w * p[3];
                for c in 0..3 {
                    csum[c] += w * p[3] * p[c];
                }
            }

            if wsum <= 0.0 {
                continue;
            }

            let li = src.local(x, y);
            let orig = src.data[li];
            let mut blurred = orig;
            blurred[3] = asum / wsum;
            if asum > 0.0 {
                for c in 0..3 {
                    blurred[c] = csum[c] / asum;
                }
            }

            let fade = smoothstep(FADE_ZERO_REACH, FADE_FULL_REACH, reach / full);
            dst.data[li] = std::array::from_fn(|c| orig[c] + (blurred[c] - orig[c]) * fade);
        }
    }

    dst
}

/// Blend a blurred plane back into the layer by coverage
pub(crate) fn composite(layer: &Layer, plane: &Plane) -> RgbaBuffer {
    let bounds = layer.bounds();
    let mut out = layer.pixels().clone();
    let channels = if layer.is_background() { 3 } else { 4 };
    let data = out.data_mut();

    for y in plane.rect.top..plane.rect.bottom {
        for x in plane.rect.left..plane.rect.right {
            let i = bounds.index(x, y);
            if !layer.is_foreground(i) {
                continue;
            }
            let t = layer.coverage(i) as f32 / 255.0;
            let p = plane.data[plane.local(x, y)];
            let o = i * 4;
            for c in 0..channels {
                let orig = data[o + c] as f32;
                data[o + c] = to_u8(orig + (p[c] - orig) * t);
            }
        }
    }

    out
}

/// Blur plane for a layer: horizontal then vertical pass
pub(crate) fn blur_plane(layer: &Layer, options: &BlurOptions) -> Option<Plane> {
    let rect = layer.work_rect(0);
    if rect.is_empty() {
        return None;
    }
    let src = Plane::from_layer(layer, rect);
    let horizontal = blur_pass(layer, &options.kernel, &src, Axis::Horizontal);
    Some(blur_pass(layer, &options.kernel, &horizontal, Axis::Vertical))
}

/// Gaussian blur confined to the selection and to non-transparent pixels
///
/// Returns the input unchanged when nothing is selected.
pub fn separable_blur(layer: &Layer, options: &BlurOptions) -> RgbaBuffer {
    match blur_plane(layer, options) {
        Some(plane) => {
            log::debug!(
                "blur: radius {} sigma {} over {}x{}",
                options.radius(),
                options.sigma(),
                plane.rect.width(),
                plane.rect.height()
            );
            composite(layer, &plane)
        }
        None => {
            log::debug!("blur: empty selection, nothing to do");
            layer.pixels().clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regionfx_core::CoverageMask;

    #[test]
    fn test_from_strength() {
        let o = BlurOptions::from_strength(2.0);
        assert_eq!(o.radius(), 6);
        assert_eq!(o.sigma(), 2.0);

        let tiny = BlurOptions::from_strength(0.0);
        assert_eq!(tiny.sigma(), 0.3);
        assert_eq!(tiny.radius(), 1);

        assert_eq!(BlurOptions::from_strength(1000.0).radius(), MAX_RADIUS);
        assert_eq!(BlurOptions::from_strength(f32::INFINITY).sigma(), 0.3);
    }

    #[test]
    fn test_new_validates_sigma() {
        assert!(BlurOptions::new(3, 1.0).is_ok());
        assert!(BlurOptions::new(3, 0.0).is_err());
    }

    #[test]
    fn test_flat_color_is_stable() {
        let mut pixels = RgbaBuffer::new(9, 9).unwrap();
        for y in 0..9 {
            for x in 0..9 {
                pixels.put(x, y, [40, 80, 120, 255]);
            }
        }
        let mask = CoverageMask::filled(9, 9, 255).unwrap();
        let layer = Layer::new(&pixels, &mask, false).unwrap();
        let out = separable_blur(&layer, &BlurOptions::default());
        assert_eq!(out, pixels);
    }

    #[test]
    fn test_transparent_pixel_untouched() {
        let mut pixels = RgbaBuffer::new(5, 1).unwrap();
        pixels.put(0, 0, [255, 0, 0, 255]);
        pixels.put(2, 0, [9, 9, 9, 0]);
        pixels.put(4, 0, [0, 0, 255, 255]);
        let mask = CoverageMask::filled(5, 1, 255).unwrap();
        let layer = Layer::new(&pixels, &mask, false).unwrap();
        let out = separable_blur(&layer, &BlurOptions::default());
        assert_eq!(out.get(2, 0), Some([9, 9, 9, 0]));
    }
}
