//! Color-hole patching
//!
//! Fills empty (near-transparent) pixels of a flat color layer with the
//! color of the nearest painted pixel, without leaking across line art.
//!
//! The pipeline:
//!
//! 1. Threshold the line reference by luminance and alpha into a barrier
//!    mask, then dilate it by `line_grow` pixels with a multi-source BFS.
//! 2. Seed a second BFS from every selected, non-barrier pixel that is
//!    solidly painted. Each seed carries its RGB as a color token.
//! 3. Expand 4-connected, one ring per step, up to `max_distance`. Every
//!    reached cell inherits the token of its nearest seed.
//! 4. Write the token into each reached, selected, non-barrier pixel whose
//!    alpha is at most `empty_alpha_threshold`.
//!
//! Neither BFS crosses the barrier mask or leaves the selection.

use crate::lineref::LineReference;
use regionfx_core::{Bounds, Layer, NEIGHBORS_4, Rect, RgbaBuffer, luma};

/// Marker for cells the BFS has not reached
const UNREACHED: u16 = u16::MAX;

/// Options for color-hole patching
#[derive(Debug, Clone)]
pub struct HolePatchOptions {
    /// Maximum BFS distance from a seed; 0 disables patching
    pub max_distance: u32,
    /// Line luminance sensitivity; threshold is `30 + 20 * sensitivity`, clamped to [30, 230]
    pub line_sensitivity: f32,
    /// Barrier dilation in pixels
    pub line_grow: u32,
    /// Pixels with alpha at or below this are holes
    pub empty_alpha_threshold: u8,
    /// Pixels with alpha above this seed the propagation
    pub seed_alpha_threshold: u8,
    /// Line reference pixels need alpha above this to count as lines
    pub line_alpha_threshold: u8,
}

impl Default for HolePatchOptions {
    fn default() -> Self {
        Self {
            max_distance: 64,
            line_sensitivity: 3.0,
            line_grow: 1,
            empty_alpha_threshold: 8,
            seed_alpha_threshold: 200,
            line_alpha_threshold: 32,
        }
    }
}

impl HolePatchOptions {
    /// Set the maximum propagation distance
    pub fn with_max_distance(mut self, max_distance: u32) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Set the line luminance sensitivity
    pub fn with_line_sensitivity(mut self, sensitivity: f32) -> Self {
        self.line_sensitivity = sensitivity;
        self
    }

    /// Set the barrier dilation
    pub fn with_line_grow(mut self, grow: u32) -> Self {
        self.line_grow = grow;
        self
    }

    /// Set the hole alpha threshold
    pub fn with_empty_alpha_threshold(mut self, threshold: u8) -> Self {
        self.empty_alpha_threshold = threshold;
        self
    }

    /// Set the seed alpha threshold
    pub fn with_seed_alpha_threshold(mut self, threshold: u8) -> Self {
        self.seed_alpha_threshold = threshold;
        self
    }

    /// Set the line alpha threshold
    pub fn with_line_alpha_threshold(mut self, threshold: u8) -> Self {
        self.line_alpha_threshold = threshold;
        self
    }

    /// Luminance below which a line reference pixel is a barrier
    pub fn luma_threshold(&self) -> u8 {
        let sensitivity = if self.line_sensitivity.is_finite() {
            self.line_sensitivity
        } else {
            0.0
        };
        (30.0 + sensitivity * 20.0).clamp(30.0, 230.0) as u8
    }
}

/// Outcome of one BFS expansion
struct Propagation {
    dist: Vec<u16>,
    token: Vec<[u8; 3]>,
}

/// In-rect 4-neighbors of flat index `i`
fn neighbors(bounds: Bounds, rect: Rect, i: usize) -> impl Iterator<Item = usize> {
    let (x, y) = bounds.coords(i);
    NEIGHBORS_4.into_iter().filter_map(move |(dx, dy)| {
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        (nx >= 0 && ny >= 0 && rect.contains(nx as u32, ny as u32))
            .then(|| bounds.index(nx as u32, ny as u32))
    })
}

/// Barrier mask from the line reference, dilated by `grow` pixels
fn build_barrier(reference: &LineReference, rect: Rect, options: &HolePatchOptions) -> Vec<bool> {
    let bounds = reference.bounds();
    let threshold = options.luma_threshold();
    let mut barrier = vec![false; bounds.area()];
    let mut dist = vec![UNREACHED; bounds.area()];
    let mut queue = Vec::new();

    for i in rect.indices(bounds) {
        let [r, g, b, a] = reference.pixels().pixel(i);
        if a > options.line_alpha_threshold && luma(r, g, b, 255) < threshold {
            barrier[i] = true;
            dist[i] = 0;
            queue.push(i as u32);
        }
    }
    let lines = queue.len();

    let grow = options.line_grow.min(UNREACHED as u32 - 1) as u16;
    let mut head = 0;
    while head < queue.len() {
        let i = queue[head] as usize;
        head += 1;
        if dist[i] >= grow {
            continue;
        }
        for n in neighbors(bounds, rect, i) {
            if dist[n] == UNREACHED {
                dist[n] = dist[i] + 1;
                barrier[n] = true;
                queue.push(n as u32);
            }
        }
    }

    log::debug!(
        "holefill: {} line pixels, {} barrier pixels after grow {}",
        lines,
        queue.len(),
        grow
    );
    barrier
}

/// Collect seeds: solid pixels first, then selection-boundary pixels
fn collect_seeds(
    layer: &Layer,
    rect: Rect,
    barrier: &[bool],
    options: &HolePatchOptions,
) -> Vec<(usize, [u8; 3])> {
    let bounds = layer.bounds();
    let pixels = layer.pixels();

    let solid: Vec<(usize, [u8; 3])> = rect
        .indices(bounds)
        .filter(|&i| {
            layer.coverage(i) > 0 && !barrier[i] && layer.alpha_at(i) > options.seed_alpha_threshold
        })
        .map(|i| {
            let [r, g, b, _] = pixels.pixel(i);
            (i, [r, g, b])
        })
        .collect();
    if !solid.is_empty() {
        return solid;
    }

    // Fallback: selected pixels touching the unselected outside. The token is
    // the pixel's own color when it is painted, else its unselected neighbor's.
    let full = bounds.full_rect();
    let painted = |i: usize| layer.alpha_at(i) > options.empty_alpha_threshold;
    rect.indices(bounds)
        .filter(|&i| layer.coverage(i) > 0 && !barrier[i])
        .filter_map(|i| {
            let mut outside = neighbors(bounds, full, i).filter(|&n| layer.coverage(n) == 0);
            let first_outside = outside.next()?;
            let source = if painted(i) {
                i
            } else {
                std::iter::once(first_outside)
                    .chain(outside)
                    .find(|&n| painted(n))?
            };
            let [r, g, b, _] = pixels.pixel(source);
            Some((i, [r, g, b]))
        })
        .collect()
}

/// Multi-source unweighted BFS carrying seed colors
fn propagate(
    layer: &Layer,
    rect: Rect,
    barrier: &[bool],
    seeds: &[(usize, [u8; 3])],
    max_distance: u16,
) -> Propagation {
    let bounds = layer.bounds();
    let mut dist = vec![UNREACHED; bounds.area()];
    let mut token = vec![[0u8; 3]; bounds.area()];
    let mut queue = Vec::with_capacity(rect.area());

    for &(i, rgb) in seeds {
        dist[i] = 0;
        token[i] = rgb;
        queue.push(i as u32);
    }

    let mut head = 0;
    while head < queue.len() {
        let i = queue[head] as usize;
        head += 1;
        let d = dist[i];
        if d >= max_distance {
            continue;
        }
        for n in neighbors(bounds, rect, i) {
            if dist[n] == UNREACHED && !barrier[n] && layer.coverage(n) > 0 {
                dist[n] = d + 1;
                token[n] = token[i];
                queue.push(n as u32);
            }
        }
    }

    Propagation { dist, token }
}

/// Fill empty pixels of a color layer from the nearest painted pixel
///
/// Work is confined to `roi` intersected with the grid. Returns the input
/// unchanged when `max_distance` is 0, when the line reference grid does
/// not match the layer grid, or when no seed exists. The mask and pixel
/// grids always agree here: [`Layer::new`] rejects a mismatched mask.
pub fn patch_color_holes(
    layer: &Layer,
    roi: Rect,
    reference: &LineReference,
    options: &HolePatchOptions,
) -> RgbaBuffer {
    let mut out = layer.pixels().clone();
    let bounds = layer.bounds();

    if options.max_distance == 0 {
        log::debug!("holefill: max_distance is 0, nothing to do");
        return out;
    }
    if reference.bounds() != bounds {
        log::warn!(
            "holefill: line reference is {}x{} but layer is {}x{}, skipping",
            reference.bounds().width,
            reference.bounds().height,
            bounds.width,
            bounds.height
        );
        return out;
    }
    let rect = roi.intersect(&bounds.full_rect());
    if rect.is_empty() {
        log::debug!("holefill: empty region of interest");
        return out;
    }

    let barrier = build_barrier(reference, rect, options);
    let seeds = collect_seeds(layer, rect, &barrier, options);
    if seeds.is_empty() {
        log::debug!("holefill: no seeds, nothing to do");
        return out;
    }

    let max_distance = options.max_distance.min(UNREACHED as u32 - 1) as u16;
    let result = propagate(layer, rect, &barrier, &seeds, max_distance);

    let mut patched = 0usize;
    for i in rect.indices(bounds) {
        let coverage = layer.coverage(i);
        if coverage == 0
            || barrier[i]
            || result.dist[i] > max_distance
            || layer.alpha_at(i) > options.empty_alpha_threshold
        {
            continue;
        }
        let [r, g, b] = result.token[i];
        let alpha = layer.pixels().pixel(i)[3].max(coverage);
        out.set_pixel(i, [r, g, b, alpha]);
        patched += 1;
    }

    log::debug!(
        "holefill: {} seeds, {} pixels patched within distance {}",
        seeds.len(),
        patched,
        max_distance
    );
    out
}
