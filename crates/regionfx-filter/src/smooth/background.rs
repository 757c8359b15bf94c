//! Local background estimate by masked box blur
//!
//! Sliding-window row sums followed by column sums over the work
//! rectangle, so the cost per pixel does not depend on the radius. Only
//! pixels accepted by the caller's mask contribute; the estimate at a pixel
//! is the mean over the contributing pixels in its window.

use regionfx_core::{Bounds, Rect};

/// Box sum of `value` over the `(2r+1)^2` window of every rect pixel
///
/// Windows are clipped to `rect`. Values of pixels outside `rect` are
/// never read. Radii past the rect size act like the rect size.
pub fn box_sum(bounds: Bounds, rect: Rect, r: u32, value: impl Fn(usize) -> u32) -> Vec<u32> {
    let mut rows = vec![0u32; bounds.area()];
    let mut out = vec![0u32; bounds.area()];
    if rect.is_empty() {
        return out;
    }
    let r = r.min(rect.width().max(rect.height()));

    for y in rect.top..rect.bottom {
        let at = |x: u32| value(bounds.index(x, y));
        let mut acc: u32 = (rect.left..=(rect.left + r).min(rect.right - 1)).map(at).sum();
        for x in rect.left..rect.right {
            rows[bounds.index(x, y)] = acc;
            let add = x + r + 1;
            if add < rect.right {
                acc += at(add);
            }
            if x >= rect.left + r {
                acc -= at(x - r);
            }
        }
    }

    for x in rect.left..rect.right {
        let at = |y: u32| rows[bounds.index(x, y)];
        let mut acc: u32 = (rect.top..=(rect.top + r).min(rect.bottom - 1)).map(at).sum();
        for y in rect.top..rect.bottom {
            out[bounds.index(x, y)] = acc;
            let add = y + r + 1;
            if add < rect.bottom {
                acc += at(add);
            }
            if y >= rect.top + r {
                acc -= at(y - r);
            }
        }
    }

    out
}

/// Masked local mean of luma and alpha
#[derive(Debug)]
pub struct Background {
    /// Estimated background luma
    pub luma: Vec<u8>,
    /// Estimated background alpha
    pub alpha: Vec<u8>,
    /// Number of contributing pixels per window
    pub count: Vec<u32>,
}

impl Background {
    /// Estimate the background from pixels where `include` holds
    ///
    /// Pixels whose window holds no contributor keep their own luma and alpha.
    pub fn estimate(
        bounds: Bounds,
        rect: Rect,
        radius: u32,
        luma: &[u8],
        alpha: impl Fn(usize) -> u8,
        include: impl Fn(usize) -> bool,
    ) -> Self {
        let count = box_sum(bounds, rect, radius, |i| include(i) as u32);
        let luma_sum = box_sum(bounds, rect, radius, |i| {
            if include(i) { luma[i] as u32 } else { 0 }
        });
        let alpha_sum = box_sum(bounds, rect, radius, |i| {
            if include(i) { alpha(i) as u32 } else { 0 }
        });

        let mut bg_luma = luma.to_vec();
        let mut bg_alpha: Vec<u8> = (0..bounds.area()).map(&alpha).collect();
        for i in rect.indices(bounds) {
            let n = count[i];
            if n > 0 {
                bg_luma[i] = ((luma_sum[i] + n / 2) / n) as u8;
                bg_alpha[i] = ((alpha_sum[i] + n / 2) / n) as u8;
            }
        }

        Self {
            luma: bg_luma,
            alpha: bg_alpha,
            count,
        }
    }
}
