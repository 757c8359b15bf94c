//! Sobel gradients, adaptive thresholds and the edge band

use regionfx_core::{Bounds, Histogram, Layer, NEIGHBORS_4, Rect};

/// Gradient magnitudes are clamped to this value
pub const MAX_GRADIENT: u16 = 2047;

/// Sobel magnitude (`|gx| + |gy|`) of the luma plane at an interior pixel
#[inline]
fn sobel(luma: &[u8], bounds: Bounds, x: u32, y: u32) -> u16 {
    let w = bounds.width as usize;
    let i = bounds.index(x, y);
    let p = |o: usize| luma[o] as i32;
    let (n, s) = (i - w, i + w);

    let gx = (p(n + 1) + 2 * p(i + 1) + p(s + 1)) - (p(n - 1) + 2 * p(i - 1) + p(s - 1));
    let gy = (p(s - 1) + 2 * p(s) + p(s + 1)) - (p(n - 1) + 2 * p(n) + p(n + 1));
    ((gx.abs() + gy.abs()) as u32).min(MAX_GRADIENT as u32) as u16
}

/// Gradient field over the work rectangle with content-adaptive thresholds
#[derive(Debug)]
pub struct EdgeField {
    /// Gradient magnitude per pixel (0 outside the rect and on the grid border)
    pub grad: Vec<u16>,
    /// 70th percentile of selected gradients, clamped to [24, 700]
    pub edge_threshold: u16,
    /// max(92nd percentile, edge + 60), clamped to [edge + 1, 1100]
    pub strong_threshold: u16,
}

impl EdgeField {
    /// Compute gradients of the selected interior pixels and derive thresholds
    pub fn compute(layer: &Layer, luma: &[u8], rect: Rect) -> Self {
        let bounds = layer.bounds();
        let mut grad = vec![0u16; bounds.area()];
        let mut hist = Histogram::new(MAX_GRADIENT as usize + 1);

        let y0 = rect.top.max(1);
        let y1 = rect.bottom.min(bounds.height.saturating_sub(1));
        let x0 = rect.left.max(1);
        let x1 = rect.right.min(bounds.width.saturating_sub(1));
        for y in y0..y1 {
            for x in x0..x1 {
                let i = bounds.index(x, y);
                if layer.coverage(i) == 0 {
                    continue;
                }
                let g = sobel(luma, bounds, x, y);
                grad[i] = g;
                hist.add(g as usize);
            }
        }

        let edge_threshold = (hist.percentile(0.70) as u16).clamp(24, 700);
        let strong = (hist.percentile(0.92) as u16).max(edge_threshold + 60);
        let strong_threshold = strong.clamp(edge_threshold + 1, 1100);

        log::debug!(
            "smooth: {} gradient samples, edge threshold {}, strong threshold {}",
            hist.total(),
            edge_threshold,
            strong_threshold
        );

        Self {
            grad,
            edge_threshold,
            strong_threshold,
        }
    }

    /// Normalized edge strength in [0, 1]
    #[inline]
    pub fn strength(&self, i: usize) -> f32 {
        (self.grad[i] as f32 / self.strong_threshold as f32).clamp(0.0, 1.0)
    }
}

/// Edge band membership and strength per pixel
#[derive(Debug)]
pub struct EdgeBand {
    /// Pixel is on an edge or on the selection boundary
    pub member: Vec<bool>,
    /// Normalized edge strength of members
    pub strength: Vec<f32>,
}

/// Selection-boundary pixels always count as at least this strong
pub const BOUNDARY_STRENGTH: f32 = 0.5;

impl EdgeBand {
    /// Mark selected pixels with `grad >= edge_threshold` or an unselected 4-neighbor
    pub fn compute(layer: &Layer, field: &EdgeField, rect: Rect) -> Self {
        let bounds = layer.bounds();
        let mut member = vec![false; bounds.area()];
        let mut strength = vec![0.0f32; bounds.area()];

        for y in rect.top..rect.bottom {
            for x in rect.left..rect.right {
                let i = bounds.index(x, y);
                if layer.coverage(i) == 0 {
                    continue;
                }
                let on_boundary = NEIGHBORS_4.iter().any(|&(dx, dy)| {
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    bounds.contains(nx, ny)
                        && layer.coverage(bounds.index(nx as u32, ny as u32)) == 0
                });
                let on_edge = field.grad[i] >= field.edge_threshold;
                if !on_edge && !on_boundary {
                    continue;
                }
                member[i] = true;
                strength[i] = if on_boundary {
                    field.strength(i).max(BOUNDARY_STRENGTH)
                } else {
                    field.strength(i)
                };
            }
        }

        Self { member, strength }
    }

    /// Number of band pixels
    pub fn len(&self) -> usize {
        self.member.iter().filter(|&&m| m).count()
    }
}
