//! Main stroke extraction
//!
//! Pixels that differ strongly from the local background and sit on an
//! edge form stroke candidates. The candidate components are scored by
//! `size * (mean_diff + 5)` and the best one large enough marks the stroke.
//!
//! A candidate component straddles the edge, so it holds pixels from both
//! the stroke and the paper around it. The sign of its mean signed
//! difference tells which side is the stroke; the stroke body is then grown
//! from the component pixels on that side through every connected pixel
//! that stays on that side of the background by at least the threshold.

use super::gradient::EdgeField;
use regionfx_core::{Histogram, Layer, Rect, VisitedSet};
use regionfx_region::{flood_component, for_each_component};

/// Smallest component accepted as a stroke
pub const MIN_STROKE_PIXELS: usize = 180;

/// Candidates need at least this fraction of the edge threshold
pub const CANDIDATE_GRADIENT_RATIO: f32 = 0.65;

/// The accepted stroke
#[derive(Debug, Clone)]
pub struct Stroke {
    /// Flat indices of the stroke body pixels
    pub pixels: Vec<u32>,
    /// Mean luma difference of the edge component from the background
    pub mean_diff: f32,
    /// Mean gradient magnitude of the edge component
    pub mean_grad: f32,
    /// Whether the stroke is darker than its background
    pub dark: bool,
}

impl Stroke {
    /// Number of stroke body pixels
    pub fn len(&self) -> usize {
        self.pixels.len()
    }
}

#[inline]
fn diff_at(luma: &[u8], background: &[u8], i: usize) -> u8 {
    luma[i].abs_diff(background[i])
}

#[inline]
fn on_side(luma: &[u8], background: &[u8], i: usize, dark: bool) -> bool {
    if dark {
        luma[i] < background[i]
    } else {
        luma[i] > background[i]
    }
}

/// 86th percentile of the selected luma differences, clamped to [10, 80]
pub fn diff_threshold(layer: &Layer, luma: &[u8], background: &[u8], rect: Rect) -> u8 {
    let mut hist = Histogram::new(256);
    for i in rect.indices(layer.bounds()) {
        if layer.coverage(i) > 0 {
            hist.add(diff_at(luma, background, i) as usize);
        }
    }
    (hist.percentile(0.86) as u8).clamp(10, 80)
}

/// Grow the stroke body from the component pixels on the stroke side
fn stroke_body(
    layer: &Layer,
    luma: &[u8],
    background: &[u8],
    rect: Rect,
    diff_thr: u8,
    component: &[u32],
    dark: bool,
) -> Vec<u32> {
    let bounds = layer.bounds();
    let is_member = |i: usize| {
        layer.coverage(i) > 0
            && on_side(luma, background, i, dark)
            && diff_at(luma, background, i) >= diff_thr
    };

    let mut visited = VisitedSet::new(bounds.area());
    let mut body = Vec::new();
    let mut grown = Vec::new();
    for &seed in component {
        flood_component(bounds, rect, seed as usize, &mut visited, &is_member, &mut grown);
        body.extend_from_slice(&grown);
    }
    body
}

/// Find the highest-scoring stroke, if any candidate component is large enough
pub fn find_main_stroke(
    layer: &Layer,
    luma: &[u8],
    background: &[u8],
    field: &EdgeField,
    rect: Rect,
) -> Option<Stroke> {
    let bounds = layer.bounds();
    let diff_thr = diff_threshold(layer, luma, background, rect);
    let grad_thr = CANDIDATE_GRADIENT_RATIO * field.edge_threshold as f32;

    let is_candidate = |i: usize| {
        layer.coverage(i) > 0
            && diff_at(luma, background, i) >= diff_thr
            && field.grad[i] as f32 >= grad_thr
    };

    let mut best: Option<(f64, Vec<u32>)> = None;
    let components = for_each_component(bounds, rect, is_candidate, |component| {
        if component.len() < MIN_STROKE_PIXELS {
            return;
        }
        let diff_sum: u64 = component
            .iter()
            .map(|&i| diff_at(luma, background, i as usize) as u64)
            .sum();
        let n = component.len() as f64;
        let score = n * (diff_sum as f64 / n + 5.0);
        if best.as_ref().is_none_or(|(s, _)| score > *s) {
            best = Some((score, component.to_vec()));
        }
    });
    log::debug!(
        "smooth: diff threshold {}, {} candidate components",
        diff_thr,
        components
    );

    let (score, component) = best?;
    let n = component.len() as f64;
    let (mut diff_sum, mut grad_sum, mut signed_sum) = (0u64, 0u64, 0i64);
    for &i in &component {
        let i = i as usize;
        diff_sum += diff_at(luma, background, i) as u64;
        grad_sum += field.grad[i] as u64;
        signed_sum += luma[i] as i64 - background[i] as i64;
    }
    let dark = signed_sum <= 0;

    let pixels = stroke_body(layer, luma, background, rect, diff_thr, &component, dark);
    if pixels.is_empty() {
        return None;
    }
    let stroke = Stroke {
        pixels,
        mean_diff: (diff_sum as f64 / n) as f32,
        mean_grad: (grad_sum as f64 / n) as f32,
        dark,
    };
    log::debug!(
        "smooth: {} stroke of {} pixels accepted from a {} pixel edge (mean diff {:.1}, score {:.0})",
        if dark { "dark" } else { "light" },
        stroke.len(),
        component.len(),
        stroke.mean_diff,
        score
    );
    Some(stroke)
}
