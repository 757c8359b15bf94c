//! Smart edge smoothing
//!
//! Finds a thin stroke drawn over the selected pixels, redraws it along a
//! fitted centerline, and smooths what remains of jagged edges. The
//! pipeline runs once per call:
//!
//! 1. Sobel gradients of the premultiplied luma, with edge thresholds
//!    taken from percentiles of the selected gradients.
//! 2. The edge band: strong-gradient pixels plus the selection boundary.
//! 3. A masked box-blur estimate of the local background.
//! 4. Stroke candidates (far from the background and on an edge), grouped
//!    into 4-connected components; the best-scoring large one marks the
//!    stroke, and its body is grown on the side of the background it sits.
//! 5. A PCA centerline through the stroke pixels.
//! 6. Resynthesis: erase the stroke neighborhood, then stamp disks along
//!    the centerline.
//! 7. A windowed median over the edge band.
//!
//! [`SmoothMode`] picks which parts run.

mod background;
mod centerline;
mod gradient;
mod median;
mod stamp;
mod stroke;

pub use centerline::{Polyline, PrincipalAxis, fit_centerline};
pub use stroke::MIN_STROKE_PIXELS;

use background::Background;
use gradient::{EdgeBand, EdgeField};
use median::{MedianWindow, median_cleanup};
use regionfx_core::{Layer, Rect, RgbaBuffer, to_u8};
use stamp::StrokeGeometry;
use stroke::find_main_stroke;

/// Which parts of the smoothing pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SmoothMode {
    /// Resynthesize the stroke if one is found, then clean up the rest
    #[default]
    Auto,
    /// Median cleanup of the edge band only
    Edge,
    /// Stroke resynthesis only; no stroke means no change
    Line,
}

/// Options for [`smart_smooth`]
#[derive(Debug, Clone, PartialEq)]
pub struct SmartSmoothOptions {
    /// Which parts of the pipeline run
    pub mode: SmoothMode,
    /// Median window radius in pixels
    pub edge_median_radius: u32,
    /// Median blend strength in [0, 1]
    pub edge_median_strength: f32,
    /// Sampling stride inside the median window
    pub edge_median_step: u32,
    /// Radius of the background box blur
    pub background_smooth_radius: u32,
    /// Blend of the resynthesized stroke in [0, 1]
    pub line_strength: f32,
    /// Multiplier on the estimated stroke width
    pub line_width_scale: f32,
    /// Multiplier on the estimated edge hardness
    pub line_hardness: f32,
}

impl Default for SmartSmoothOptions {
    fn default() -> Self {
        Self {
            mode: SmoothMode::Auto,
            edge_median_radius: 2,
            edge_median_strength: 0.65,
            edge_median_step: 1,
            background_smooth_radius: 6,
            line_strength: 1.0,
            line_width_scale: 1.0,
            line_hardness: 1.0,
        }
    }
}

impl SmartSmoothOptions {
    /// Set the pipeline mode
    pub fn with_mode(mut self, mode: SmoothMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the median window radius
    pub fn with_edge_median_radius(mut self, radius: u32) -> Self {
        self.edge_median_radius = radius;
        self
    }

    /// Set the median blend strength
    pub fn with_edge_median_strength(mut self, strength: f32) -> Self {
        self.edge_median_strength = strength;
        self
    }

    /// Set the sampling stride of the median window
    pub fn with_edge_median_step(mut self, step: u32) -> Self {
        self.edge_median_step = step;
        self
    }

    /// Set the background box blur radius
    pub fn with_background_smooth_radius(mut self, radius: u32) -> Self {
        self.background_smooth_radius = radius;
        self
    }

    /// Set the blend of the redrawn stroke
    pub fn with_line_strength(mut self, strength: f32) -> Self {
        self.line_strength = strength;
        self
    }

    /// Set the stroke width multiplier
    pub fn with_line_width_scale(mut self, scale: f32) -> Self {
        self.line_width_scale = scale;
        self
    }

    /// Set the stroke edge hardness multiplier
    pub fn with_line_hardness(mut self, hardness: f32) -> Self {
        self.line_hardness = hardness;
        self
    }

    fn median_window(&self) -> MedianWindow {
        MedianWindow {
            radius: self.edge_median_radius,
            step: self.edge_median_step.max(1),
            strength: unit(self.edge_median_strength),
        }
    }
}

/// Clamp to [0, 1], mapping NaN to 0
fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

fn non_negative(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.max(0.0) }
}

/// Output of the stroke resynthesis stage
struct Resynthesis {
    pixels: RgbaBuffer,
    /// Pixels erased or painted
    touched: Vec<bool>,
}

/// Steps 3 to 6: detect the main stroke and redraw it
fn resynthesize(
    layer: &Layer,
    luma: &[u8],
    field: &EdgeField,
    rect: Rect,
    options: &SmartSmoothOptions,
) -> Option<Resynthesis> {
    let bounds = layer.bounds();
    let radius = options.background_smooth_radius;
    let background = Background::estimate(
        bounds,
        rect,
        radius,
        luma,
        |i| layer.alpha_at(i),
        |i| layer.coverage(i) > 0,
    );

    let stroke = find_main_stroke(layer, luma, &background.luma, field, rect)?;
    let lines = fit_centerline(bounds, &stroke.pixels);
    if lines.is_empty() {
        return None;
    }

    let color = stamp::stroke_color(layer, &stroke.pixels);
    let geometry = StrokeGeometry::estimate(
        &stroke,
        &lines,
        field,
        non_negative(options.line_width_scale),
        non_negative(options.line_hardness),
    );

    let mut in_stroke = vec![false; bounds.area()];
    for &i in &stroke.pixels {
        in_stroke[i as usize] = true;
    }
    let neighborhood = stamp::stroke_neighborhood(layer, &stroke);

    let mut work = layer.pixels().clone();
    stamp::erase_stroke(layer, &mut work, luma, rect, radius, &in_stroke, &neighborhood);
    let coverage = stamp::stamp_lines(bounds, rect, &lines, geometry);
    stamp::composite_stroke(layer, &mut work, &coverage, color);

    let original = layer.pixels();
    let mut out = original.clone();
    let strength = unit(options.line_strength);
    let channels = if layer.is_background() { 3 } else { 4 };
    let mut touched = neighborhood;
    for i in rect.indices(bounds) {
        touched[i] |= coverage[i] > 0.0;
        if !touched[i] || layer.coverage(i) == 0 {
            continue;
        }
        let t = strength * layer.coverage(i) as f32 / 255.0;
        let (o, w) = (original.pixel(i), work.pixel(i));
        let mut p = o;
        for c in 0..channels {
            p[c] = to_u8(o[c] as f32 + (w[c] as f32 - o[c] as f32) * t);
        }
        out.set_pixel(i, p);
    }

    Some(Resynthesis {
        pixels: out,
        touched,
    })
}

/// Smooth jagged edges and resynthesize the main stroke in the selection
///
/// Returns the input unchanged when nothing is selected, and in
/// [`SmoothMode::Line`] when no stroke is found. Output is deterministic.
///
/// # Examples
///
/// ```
/// use regionfx_core::{CoverageMask, Layer, RgbaBuffer};
/// use regionfx_filter::{SmartSmoothOptions, SmoothMode, smart_smooth};
///
/// let pixels = RgbaBuffer::new(16, 16).unwrap();
/// let mask = CoverageMask::filled(16, 16, 255).unwrap();
/// let layer = Layer::new(&pixels, &mask, true).unwrap();
/// let options = SmartSmoothOptions::default().with_mode(SmoothMode::Line);
/// assert_eq!(smart_smooth(&layer, &options), pixels);
/// ```
pub fn smart_smooth(layer: &Layer, options: &SmartSmoothOptions) -> RgbaBuffer {
    let rect = layer.work_rect(1);
    if rect.is_empty() {
        log::debug!("smooth: empty selection, nothing to do");
        return layer.pixels().clone();
    }

    let luma = layer.luma();
    let field = EdgeField::compute(layer, &luma, rect);
    let band = EdgeBand::compute(layer, &field, rect);
    log::debug!("smooth: {} edge band pixels", band.len());
    let window = options.median_window();

    if options.mode == SmoothMode::Edge {
        return median_cleanup(layer, layer.pixels(), &band, rect, window, None);
    }

    match (resynthesize(layer, &luma, &field, rect, options), options.mode) {
        (Some(resynth), SmoothMode::Line) => resynth.pixels,
        (Some(resynth), _) => median_cleanup(
            layer,
            &resynth.pixels,
            &band,
            rect,
            window,
            Some(&resynth.touched),
        ),
        (None, SmoothMode::Line) => {
            log::debug!("smooth: no stroke found, line mode leaves input unchanged");
            layer.pixels().clone()
        }
        (None, _) => {
            log::debug!("smooth: no stroke found, falling back to edge cleanup");
            median_cleanup(layer, layer.pixels(), &band, rect, window, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regionfx_core::CoverageMask;

    #[test]
    fn test_default_options() {
        let o = SmartSmoothOptions::default();
        assert_eq!(o.mode, SmoothMode::Auto);
        assert_eq!(o.edge_median_radius, 2);
        assert_eq!(o.edge_median_strength, 0.65);
        assert_eq!(o.edge_median_step, 1);
        assert_eq!(o.background_smooth_radius, 6);
        assert_eq!(o.line_strength, 1.0);
    }

    #[test]
    fn test_option_sanitizing() {
        let o = SmartSmoothOptions::default()
            .with_edge_median_strength(f32::NAN)
            .with_edge_median_step(0);
        let w = o.median_window();
        assert_eq!(w.strength, 0.0);
        assert_eq!(w.step, 1);
        assert_eq!(unit(3.0), 1.0);
        assert_eq!(non_negative(-2.0), 0.0);
    }

    #[test]
    fn test_empty_selection_unchanged() {
        let mut pixels = RgbaBuffer::new(8, 8).unwrap();
        pixels.put(3, 3, [0, 0, 0, 255]);
        let mask = CoverageMask::new(8, 8).unwrap();
        let layer = Layer::new(&pixels, &mask, false).unwrap();
        for mode in [SmoothMode::Auto, SmoothMode::Edge, SmoothMode::Line] {
            let options = SmartSmoothOptions::default().with_mode(mode);
            assert_eq!(smart_smooth(&layer, &options), pixels);
        }
    }
}
