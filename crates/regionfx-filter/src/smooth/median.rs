//! Residual edge cleanup by windowed median

use super::gradient::EdgeBand;
use regionfx_core::{Layer, Rect, RgbaBuffer, mix, select_median};

/// Band pixels at or below this edge strength are left alone
pub const MIN_EDGE_STRENGTH: f32 = 0.05;

/// Window geometry and blend strength of the cleanup
#[derive(Debug, Clone, Copy)]
pub struct MedianWindow {
    /// Window radius in pixels
    pub radius: u32,
    /// Sampling stride, at least 1
    pub step: u32,
    /// Blend strength in [0, 1]
    pub strength: f32,
}

/// Blend a spatial median into every sufficiently strong band pixel
///
/// Medians are taken from `src` over selected pixels only. Pixels marked in
/// `skip` keep their `src` value.
pub fn median_cleanup(
    layer: &Layer,
    src: &RgbaBuffer,
    band: &EdgeBand,
    rect: Rect,
    window: MedianWindow,
    skip: Option<&[bool]>,
) -> RgbaBuffer {
    let mut out = src.clone();
    if window.radius == 0 || window.strength <= 0.0 {
        return out;
    }

    let bounds = layer.bounds();
    let channels = if layer.is_background() { 3 } else { 4 };
    let r = window.radius as i32;
    let step = window.step.max(1) as usize;
    let mut samples: [Vec<u8>; 4] = Default::default();
    let mut touched = 0usize;

    for y in rect.top..rect.bottom {
        for x in rect.left..rect.right {
            let i = bounds.index(x, y);
            let e = band.strength[i];
            if !band.member[i] || e <= MIN_EDGE_STRENGTH {
                continue;
            }
            if skip.is_some_and(|s| s[i]) {
                continue;
            }

            samples.iter_mut().for_each(Vec::clear);
            for dy in (-r..=r).step_by(step) {
                for dx in (-r..=r).step_by(step) {
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if !bounds.contains(nx, ny) {
                        continue;
                    }
                    let n = bounds.index(nx as u32, ny as u32);
                    if layer.coverage(n) == 0 {
                        continue;
                    }
                    let p = src.pixel(n);
                    for c in 0..channels {
                        samples[c].push(p[c]);
                    }
                }
            }

            let w = window.strength * (0.35 + 0.55 * e) * layer.coverage(i) as f32 / 255.0;
            let w = w.clamp(0.0, 1.0);
            let mut p = src.pixel(i);
            for c in 0..channels {
                if let Some(m) = select_median(&mut samples[c]) {
                    p[c] = mix(p[c], m as f32, w);
                }
            }
            out.set_pixel(i, p);
            touched += 1;
        }
    }

    log::debug!("smooth: median cleanup on {} band pixels", touched);
    out
}
