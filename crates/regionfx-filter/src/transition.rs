//! Pixel transition
//!
//! Softens color transitions inside a layer with the boundary-protected
//! blur, then protects the outer silhouette. Around each selected pixel the
//! 3x3 alpha neighborhood is classified into transparent, opaque and
//! semi-transparent samples; where transparent samples meet painted ones
//! the blurred result is pulled back toward the original by a protection
//! factor in [0.3, 0.95] that grows with the local alpha gradient and with
//! the share of transparency around the pixel. This keeps the blur from
//! fattening or eroding the layer's outline.

use crate::blur::{BlurOptions, blur_plane, composite};
use regionfx_core::{Layer, RgbaBuffer, mix};

/// Weakest edge protection
pub const MIN_PROTECTION: f32 = 0.3;

/// Strongest edge protection
pub const MAX_PROTECTION: f32 = 0.95;

/// Options for the pixel transition effect
#[derive(Debug, Clone)]
pub struct TransitionOptions {
    /// Underlying blur
    pub blur: BlurOptions,
    /// Disable to get the plain boundary-protected blur
    pub protect_edges: bool,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self::new(BlurOptions::default())
    }
}

impl TransitionOptions {
    /// Transition with edge protection enabled
    pub fn new(blur: BlurOptions) -> Self {
        Self {
            blur,
            protect_edges: true,
        }
    }

    /// Enable or disable silhouette protection
    pub fn with_protect_edges(mut self, protect: bool) -> Self {
        self.protect_edges = protect;
        self
    }
}

/// Alpha census of a 3x3 window
#[derive(Debug, Default, PartialEq)]
struct AlphaCensus {
    transparent: u32,
    opaque: u32,
    semi: u32,
    min: u8,
    max: u8,
    sum: u32,
}

impl AlphaCensus {
    fn of(layer: &Layer, x: u32, y: u32) -> Self {
        let bounds = layer.bounds();
        let mut census = AlphaCensus {
            min: u8::MAX,
            ..Default::default()
        };
        for dy in -1..=1i32 {
            for dx in -1..=1i32 {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                // The canvas edge is not a silhouette
                if !bounds.contains(nx, ny) {
                    continue;
                }
                let a = layer.alpha_at(bounds.index(nx as u32, ny as u32));
                match a {
                    0 => census.transparent += 1,
                    255 => census.opaque += 1,
                    _ => census.semi += 1,
                }
                census.min = census.min.min(a);
                census.max = census.max.max(a);
                census.sum += a as u32;
            }
        }
        census
    }

    fn samples(&self) -> u32 {
        self.transparent + self.opaque + self.semi
    }

    fn is_silhouette(&self) -> bool {
        self.transparent > 0 && self.opaque + self.semi > 0
    }

    /// Protection factor for a silhouette pixel
    fn protection(&self) -> f32 {
        let ratio = self.sum as f32 / (self.samples() as f32 * 255.0);
        let gradient = (self.max - self.min) as f32 / 255.0;
        let mut p = MIN_PROTECTION
            + (MAX_PROTECTION - MIN_PROTECTION) * (0.6 * (1.0 - ratio) + 0.4 * gradient);
        // Already-soft antialiased edges need less holding back
        if self.semi > self.opaque {
            p -= 0.15;
        }
        p.clamp(MIN_PROTECTION, MAX_PROTECTION)
    }
}

/// Blur color transitions while protecting the layer silhouette
///
/// Background layers have no silhouette, so protection is skipped for them.
/// Returns the input unchanged when nothing is selected.
pub fn pixel_transition(layer: &Layer, options: &TransitionOptions) -> RgbaBuffer {
    let Some(plane) = blur_plane(layer, &options.blur) else {
        log::debug!("transition: empty selection, nothing to do");
        return layer.pixels().clone();
    };
    let mut out = composite(layer, &plane);
    if !options.protect_edges || layer.is_background() {
        return out;
    }

    let bounds = layer.bounds();
    let original = layer.pixels();
    let mut protected = 0usize;
    for y in plane.rect.top..plane.rect.bottom {
        for x in plane.rect.left..plane.rect.right {
            let i = bounds.index(x, y);
            if !layer.is_foreground(i) {
                continue;
            }
            let census = AlphaCensus::of(layer, x, y);
            if !census.is_silhouette() {
                continue;
            }
            let p = census.protection();
            let orig = original.pixel(i);
            let blurred = out.pixel(i);
            let held = std::array::from_fn(|c| mix(blurred[c], orig[c] as f32, p));
            out.set_pixel(i, held);
            protected += 1;
        }
    }

    log::debug!("transition: {} silhouette pixels protected", protected);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use regionfx_core::CoverageMask;

    fn layer_from_alpha(alpha: &[u8], w: u32, h: u32) -> (RgbaBuffer, CoverageMask) {
        let mut pixels = RgbaBuffer::new(w, h).unwrap();
        for (i, &a) in alpha.iter().enumerate() {
            pixels.set_pixel(i, [100, 100, 100, a]);
        }
        (pixels, CoverageMask::filled(w, h, 255).unwrap())
    }

    #[test]
    fn test_census_classification() {
        let (pixels, mask) = layer_from_alpha(&[0, 128, 255, 0, 255, 255, 0, 255, 255], 3, 3);
        let layer = Layer::new(&pixels, &mask, false).unwrap();
        let c = AlphaCensus::of(&layer, 1, 1);
        assert_eq!(c.transparent, 3);
        assert_eq!(c.semi, 1);
        assert_eq!(c.opaque, 5);
        assert!(c.is_silhouette());
        let p = c.protection();
        assert!((MIN_PROTECTION..=MAX_PROTECTION).contains(&p));
    }

    #[test]
    fn test_interior_is_not_silhouette() {
        let (pixels, mask) = layer_from_alpha(&[255; 9], 3, 3);
        let layer = Layer::new(&pixels, &mask, false).unwrap();
        assert!(!AlphaCensus::of(&layer, 1, 1).is_silhouette());
        assert!(!AlphaCensus::of(&layer, 0, 0).is_silhouette());
        assert_eq!(AlphaCensus::of(&layer, 0, 0).samples(), 4);
    }

    #[test]
    fn test_protection_grows_with_transparency() {
        let (sparse, mask) = layer_from_alpha(&[0, 0, 0, 0, 255, 0, 0, 0, 0], 3, 3);
        let layer = Layer::new(&sparse, &mask, false).unwrap();
        let high = AlphaCensus::of(&layer, 1, 1).protection();

        let (dense, mask) = layer_from_alpha(&[0, 255, 255, 255, 255, 255, 255, 255, 255], 3, 3);
        let layer = Layer::new(&dense, &mask, false).unwrap();
        let low = AlphaCensus::of(&layer, 1, 1).protection();

        assert!(high > low);
    }
}
