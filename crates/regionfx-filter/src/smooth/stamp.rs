//! Stroke resynthesis
//!
//! The old stroke is erased by pulling its neighborhood toward a background
//! estimate that excludes the stroke itself, then the fitted centerline is
//! redrawn as a chain of anti-aliased disk stamps with source-over
//! compositing.

use super::background::{Background, box_sum};
use super::centerline::Polyline;
use super::gradient::EdgeField;
use super::stroke::Stroke;
use regionfx_core::{
    Bounds, Layer, NEIGHBORS_4, Rect, RgbaBuffer, VisitedSet, select_median, to_u8,
};

/// Most stroke pixels sampled for the color estimate
pub const COLOR_SAMPLE_CAP: usize = 4096;

/// Rings of dilation around the stroke that get erased
pub const ERASE_RINGS: u32 = 2;

/// Below this luma the ratio correction cannot recover the background and
/// the background color is used directly
pub const ERASE_MIN_LUMA: u8 = 8;

/// Per-channel median color of a strided sample of stroke body pixels
pub fn stroke_color(layer: &Layer, pixels: &[u32]) -> [u8; 4] {
    let step = pixels.len().div_ceil(COLOR_SAMPLE_CAP).max(1);
    let mut channels: [Vec<u8>; 4] = Default::default();
    for &i in pixels.iter().step_by(step) {
        let p = layer.pixels().pixel(i as usize);
        for (c, samples) in channels.iter_mut().enumerate() {
            samples.push(p[c]);
        }
    }
    let mut color = [0u8; 4];
    for (c, samples) in channels.iter_mut().enumerate() {
        color[c] = select_median(samples).unwrap_or(0);
    }
    if layer.is_background() {
        color[3] = 255;
    }
    color
}

/// Radius and edge hardness of the resynthesized stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeGeometry {
    pub radius: f32,
    pub hardness: f32,
}

impl StrokeGeometry {
    /// Estimate geometry from the stroke area, centerline length and gradients
    pub fn estimate(
        stroke: &Stroke,
        lines: &[Polyline],
        field: &EdgeField,
        width_scale: f32,
        line_hardness: f32,
    ) -> Self {
        let length: f32 = lines.iter().map(Polyline::length).sum();
        let thickness = stroke.len() as f32 / length.max(1.0);
        let radius = (thickness / 2.0 * width_scale).max(0.5);

        let edge = field.edge_threshold as f32;
        let strong = field.strong_threshold as f32;
        let h = ((stroke.mean_grad - edge) / (strong - edge)).clamp(0.0, 1.0);
        let hardness = ((0.35 + 0.6 * h) * line_hardness).clamp(0.0, 1.0);

        log::debug!(
            "smooth: stroke thickness {:.2}, radius {:.2}, hardness {:.2}",
            thickness,
            radius,
            hardness
        );
        Self { radius, hardness }
    }

    /// Stamp coverage at distance `d` from the disk center
    #[inline]
    fn footprint(&self, d: f32) -> f32 {
        let inner = self.radius * self.hardness;
        let outer = self.radius + 0.5;
        if d <= inner {
            1.0
        } else {
            ((outer - d) / (outer - inner)).clamp(0.0, 1.0)
        }
    }
}

/// Selected pixels within [`ERASE_RINGS`] 4-steps of the stroke
pub fn stroke_neighborhood(layer: &Layer, stroke: &Stroke) -> Vec<bool> {
    let bounds = layer.bounds();
    let mut visited = VisitedSet::new(bounds.area());
    let mut member = vec![false; bounds.area()];
    let mut frontier: Vec<usize> = Vec::with_capacity(stroke.len());
    for &i in &stroke.pixels {
        visited.insert(i as usize);
        member[i as usize] = true;
        frontier.push(i as usize);
    }

    for _ in 0..ERASE_RINGS {
        let mut next = Vec::new();
        for &i in &frontier {
            let (x, y) = bounds.coords(i);
            for (dx, dy) in NEIGHBORS_4 {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if !bounds.contains(nx, ny) {
                    continue;
                }
                let n = bounds.index(nx as u32, ny as u32);
                if layer.coverage(n) > 0 && visited.insert(n) {
                    member[n] = true;
                    next.push(n);
                }
            }
        }
        frontier = next;
    }
    member
}

/// Mean RGB of included pixels per window (own color where none contribute)
fn mean_rgb(
    layer: &Layer,
    rect: Rect,
    radius: u32,
    count: &[u32],
    include: &impl Fn(usize) -> bool,
) -> Vec<[u8; 3]> {
    let bounds = layer.bounds();
    let pixels = layer.pixels();
    let sums: [Vec<u32>; 3] = std::array::from_fn(|c| {
        box_sum(bounds, rect, radius, |i| {
            if include(i) { pixels.pixel(i)[c] as u32 } else { 0 }
        })
    });
    (0..bounds.area())
        .map(|i| {
            let p = pixels.pixel(i);
            let n = count[i];
            if n == 0 {
                [p[0], p[1], p[2]]
            } else {
                std::array::from_fn(|c| ((sums[c][i] + n / 2) / n) as u8)
            }
        })
        .collect()
}

/// Replace the stroke neighborhood with the ratio-corrected background
pub fn erase_stroke(
    layer: &Layer,
    work: &mut RgbaBuffer,
    luma: &[u8],
    rect: Rect,
    radius: u32,
    in_stroke: &[bool],
    neighborhood: &[bool],
) {
    let bounds = layer.bounds();
    let include = |i: usize| layer.coverage(i) > 0 && !in_stroke[i];
    let alpha = |i: usize| layer.alpha_at(i);
    let clean = Background::estimate(bounds, rect, radius, luma, alpha, &include);
    let fill = mean_rgb(layer, rect, radius, &clean.count, &include);

    let mut erased = 0usize;
    for i in rect.indices(bounds) {
        if !neighborhood[i] || clean.count[i] == 0 {
            continue;
        }
        let p = work.pixel(i);
        let l = luma[i];
        let mut out = if l < ERASE_MIN_LUMA {
            let [r, g, b] = fill[i];
            [r, g, b, p[3]]
        } else {
            let ratio = clean.luma[i] as f32 / (l as f32 + 1.0);
            [
                to_u8(p[0] as f32 * ratio),
                to_u8(p[1] as f32 * ratio),
                to_u8(p[2] as f32 * ratio),
                p[3],
            ]
        };
        if !layer.is_background() {
            out[3] = clean.alpha[i];
        }
        work.set_pixel(i, out);
        erased += 1;
    }
    log::trace!("smooth: erased {} stroke neighborhood pixels", erased);
}

fn stamp_disk(
    bounds: Bounds,
    rect: Rect,
    coverage: &mut [f32],
    center: (f32, f32),
    geometry: StrokeGeometry,
) {
    let reach = geometry.radius + 1.0;
    let x0 = ((center.0 - reach).floor().max(rect.left as f32)) as u32;
    let y0 = ((center.1 - reach).floor().max(rect.top as f32)) as u32;
    let x1 = ((center.0 + reach).ceil() + 1.0).min(rect.right as f32).max(0.0) as u32;
    let y1 = ((center.1 + reach).ceil() + 1.0).min(rect.bottom as f32).max(0.0) as u32;

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 - center.0;
            let dy = y as f32 - center.1;
            let f = geometry.footprint((dx * dx + dy * dy).sqrt());
            if f > 0.0 {
                let i = bounds.index(x, y);
                coverage[i] = coverage[i].max(f);
            }
        }
    }
}

/// Rasterize the centerline runs into a max-coverage buffer
///
/// Stamps are placed along every segment at intervals of at most 1px.
pub fn stamp_lines(
    bounds: Bounds,
    rect: Rect,
    lines: &[Polyline],
    geometry: StrokeGeometry,
) -> Vec<f32> {
    let mut coverage = vec![0.0f32; bounds.area()];
    for line in lines {
        if let [(x, y)] = line.points.as_slice() {
            stamp_disk(bounds, rect, &mut coverage, (*x as f32, *y as f32), geometry);
        }
        for seg in line.points.windows(2) {
            let (ax, ay) = (seg[0].0 as f32, seg[0].1 as f32);
            let (bx, by) = (seg[1].0 as f32, seg[1].1 as f32);
            let len = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
            let steps = len.ceil().max(1.0) as u32;
            for s in 0..=steps {
                let t = s as f32 / steps as f32;
                let c = (ax + (bx - ax) * t, ay + (by - ay) * t);
                stamp_disk(bounds, rect, &mut coverage, c, geometry);
            }
        }
    }
    coverage
}

/// Source-over composite of the stroke color through the stamp coverage
pub fn composite_stroke(layer: &Layer, work: &mut RgbaBuffer, coverage: &[f32], color: [u8; 4]) {
    let color_a = color[3] as f32 / 255.0;
    for (i, &cov) in coverage.iter().enumerate() {
        if cov <= 0.0 || layer.coverage(i) == 0 {
            continue;
        }
        let dst = work.pixel(i);
        let sa = cov * color_a;
        let da = if layer.is_background() {
            1.0
        } else {
            dst[3] as f32 / 255.0
        };
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            continue;
        }
        let mut out = dst;
        for c in 0..3 {
            let premul = color[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa);
            out[c] = to_u8(premul / out_a);
        }
        if !layer.is_background() {
            out[3] = to_u8(out_a * 255.0);
        }
        work.set_pixel(i, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regionfx_core::CoverageMask;

    #[test]
    fn test_stroke_color_median() {
        let mut pixels = RgbaBuffer::new(5, 1).unwrap();
        let colors = [
            [10, 0, 0, 255],
            [20, 5, 0, 255],
            [30, 5, 9, 200],
            [200, 5, 9, 255],
            [40, 9, 9, 255],
        ];
        for (i, c) in colors.iter().enumerate() {
            pixels.set_pixel(i, *c);
        }
        let mask = CoverageMask::filled(5, 1, 255).unwrap();
        let layer = Layer::new(&pixels, &mask, false).unwrap();
        assert_eq!(stroke_color(&layer, &[0, 1, 2, 3, 4]), [30, 5, 9, 255]);

        let bg = Layer::new(&pixels, &mask, true).unwrap();
        assert_eq!(stroke_color(&bg, &[2])[3], 255);
    }

    #[test]
    fn test_footprint_profile() {
        let hard = StrokeGeometry { radius: 2.0, hardness: 1.0 };
        assert_eq!(hard.footprint(0.0), 1.0);
        assert_eq!(hard.footprint(2.0), 1.0);
        assert_eq!(hard.footprint(2.25), 0.5);
        assert_eq!(hard.footprint(3.0), 0.0);

        let soft = StrokeGeometry { radius: 2.0, hardness: 0.5 };
        assert_eq!(soft.footprint(1.0), 1.0);
        assert!(soft.footprint(1.5) < 1.0 && soft.footprint(1.5) > 0.5);
    }

    #[test]
    fn test_stamp_lines_covers_segment() {
        let bounds = Bounds::new(20, 9).unwrap();
        let line = Polyline { points: vec![(2, 4), (17, 4)] };
        let geometry = StrokeGeometry { radius: 1.0, hardness: 1.0 };
        let cov = stamp_lines(bounds, bounds.full_rect(), &[line], geometry);
        for x in 2..=17 {
            assert_eq!(cov[bounds.index(x, 4)], 1.0);
            assert!(cov[bounds.index(x, 3)] > 0.99);
        }
        assert_eq!(cov[bounds.index(10, 1)], 0.0);
        assert_eq!(cov[bounds.index(10, 7)], 0.0);
    }

    #[test]
    fn test_composite_opaque_over_background() {
        let pixels = RgbaBuffer::from_raw(2, 1, vec![255; 8]).unwrap();
        let mask = CoverageMask::from_raw(2, 1, vec![255, 0]).unwrap();
        let layer = Layer::new(&pixels, &mask, true).unwrap();
        let mut work = pixels.clone();
        composite_stroke(&layer, &mut work, &[0.5, 1.0], [0, 0, 0, 255]);
        assert_eq!(work.pixel(0), [128, 128, 128, 255]);
        // unselected pixel is never painted
        assert_eq!(work.pixel(1), [255, 255, 255, 255]);
    }

    #[test]
    fn test_neighborhood_stays_in_selection() {
        let pixels = RgbaBuffer::new(7, 1).unwrap();
        let mask = CoverageMask::from_raw(7, 1, vec![255, 255, 255, 255, 255, 0, 255]).unwrap();
        let layer = Layer::new(&pixels, &mask, true).unwrap();
        let stroke = Stroke {
            pixels: vec![3],
            mean_diff: 0.0,
            mean_grad: 0.0,
            dark: true,
        };
        let n = stroke_neighborhood(&layer, &stroke);
        assert_eq!(n, vec![false, true, true, true, true, false, false]);
    }
}
