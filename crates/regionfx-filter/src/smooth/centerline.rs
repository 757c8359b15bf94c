//! Principal axis and centerline fitting for stroke pixels
//!
//! Stroke pixels are projected onto their principal axis (`u`) and its
//! normal (`v`). Averaging `v` per `u` bin gives the medial path, which is
//! gap-filled, smoothed with a triangular moving average and mapped back to
//! integer pixel coordinates. Gaps wider than [`MAX_GAP_BINS`] split the
//! path into separate runs.

use regionfx_core::Bounds;

/// Upper bound on the number of `u` bins
pub const MAX_BINS: usize = 20000;

/// Widest run of empty bins that is bridged by interpolation
pub const MAX_GAP_BINS: usize = 6;

/// Width-7 triangular smoothing window
const SMOOTH_WEIGHTS: [f32; 7] = [1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0];

/// An ordered list of integer points
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    /// Pixel positions in order along the stroke
    pub points: Vec<(i32, i32)>,
}

impl Polyline {
    /// Euclidean length along the points
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|w| {
                let dx = (w[1].0 - w[0].0) as f32;
                let dy = (w[1].1 - w[0].1) as f32;
                (dx * dx + dy * dy).sqrt()
            })
            .sum()
    }

    fn push_dedup(&mut self, p: (i32, i32)) {
        if self.points.last() != Some(&p) {
            self.points.push(p);
        }
    }
}

/// Centroid and unit direction of a point cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalAxis {
    /// Mean pixel position
    pub center: (f32, f32),
    /// Unit vector along the dominant axis
    pub direction: (f32, f32),
}

impl PrincipalAxis {
    /// Fit the dominant eigenvector of the coordinate covariance
    ///
    /// Returns `None` for an empty pixel list.
    pub fn fit(bounds: Bounds, pixels: &[u32]) -> Option<Self> {
        if pixels.is_empty() {
            return None;
        }
        let n = pixels.len() as f64;
        let (mut sx, mut sy) = (0.0f64, 0.0f64);
        for &i in pixels {
            let (x, y) = bounds.coords(i as usize);
            sx += x as f64;
            sy += y as f64;
        }
        let (mx, my) = (sx / n, sy / n);

        let (mut sxx, mut syy, mut sxy) = (0.0f64, 0.0f64, 0.0f64);
        for &i in pixels {
            let (x, y) = bounds.coords(i as usize);
            let dx = x as f64 - mx;
            let dy = y as f64 - my;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        let (sxx, syy, sxy) = (sxx / n, syy / n, sxy / n);

        let half_trace = 0.5 * (sxx + syy);
        let det = sxx * syy - sxy * sxy;
        let lambda = half_trace + (half_trace * half_trace - det).max(0.0).sqrt();

        let direction = if sxy.abs() > 1e-9 {
            let (vx, vy) = (lambda - syy, sxy);
            let norm = (vx * vx + vy * vy).sqrt();
            ((vx / norm) as f32, (vy / norm) as f32)
        } else if sxx >= syy {
            (1.0, 0.0)
        } else {
            (0.0, 1.0)
        };

        Some(Self {
            center: (mx as f32, my as f32),
            direction,
        })
    }

    /// Along-axis and perpendicular coordinates of a point
    #[inline]
    fn project(&self, x: f32, y: f32) -> (f32, f32) {
        let (dx, dy) = (x - self.center.0, y - self.center.1);
        let (ux, uy) = self.direction;
        (dx * ux + dy * uy, dy * ux - dx * uy)
    }

    #[inline]
    fn unproject(&self, u: f32, v: f32) -> (i32, i32) {
        let (ux, uy) = self.direction;
        let x = self.center.0 + u * ux - v * uy;
        let y = self.center.1 + u * uy + v * ux;
        (x.round() as i32, y.round() as i32)
    }
}

/// A contiguous range of filled bins
struct Run {
    start: usize,
    values: Vec<f32>,
}

/// Group filled bins into runs, interpolating across short gaps
fn collect_runs(bins: &[Option<f32>]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut last: Option<(usize, f32)> = None;

    for (b, v) in bins.iter().enumerate() {
        let Some(v) = *v else { continue };
        match last {
            Some((lb, lv)) if b - lb - 1 <= MAX_GAP_BINS => {
                // Extending the current run
                if let Some(run) = runs.last_mut() {
                    let span = (b - lb) as f32;
                    for g in 1..(b - lb) {
                        let t = g as f32 / span;
                        run.values.push(lv + (v - lv) * t);
                    }
                    run.values.push(v);
                }
            }
            _ => runs.push(Run {
                start: b,
                values: vec![v],
            }),
        }
        last = Some((b, v));
    }
    runs
}

fn smooth_triangular(values: &[f32]) -> Vec<f32> {
    let half = SMOOTH_WEIGHTS.len() as isize / 2;
    (0..values.len() as isize)
        .map(|k| {
            let mut acc = 0.0f32;
            let mut norm = 0.0f32;
            for (j, w) in SMOOTH_WEIGHTS.iter().enumerate() {
                let idx = k + j as isize - half;
                if idx >= 0 && (idx as usize) < values.len() {
                    acc += w * values[idx as usize];
                    norm += w;
                }
            }
            acc / norm
        })
        .collect()
}

/// Fit smoothed centerline runs through the stroke pixels
pub fn fit_centerline(bounds: Bounds, pixels: &[u32]) -> Vec<Polyline> {
    let Some(axis) = PrincipalAxis::fit(bounds, pixels) else {
        return Vec::new();
    };

    let projected: Vec<(f32, f32)> = pixels
        .iter()
        .map(|&i| {
            let (x, y) = bounds.coords(i as usize);
            axis.project(x as f32, y as f32)
        })
        .collect();
    let u_min = projected.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
    let u_max = projected.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
    let span = u_max - u_min;

    let scale = if span > 0.0 {
        ((MAX_BINS - 1) as f32 / span).min(1.0)
    } else {
        1.0
    };
    let n_bins = ((span * scale).floor() as usize + 1).min(MAX_BINS);

    let mut sum = vec![0.0f32; n_bins];
    let mut count = vec![0u32; n_bins];
    for &(u, v) in &projected {
        let b = (((u - u_min) * scale).round() as usize).min(n_bins - 1);
        sum[b] += v;
        count[b] += 1;
    }
    let bins: Vec<Option<f32>> = sum
        .iter()
        .zip(&count)
        .map(|(&s, &c)| (c > 0).then(|| s / c as f32))
        .collect();

    let runs = collect_runs(&bins);
    log::trace!(
        "centerline: {} bins, {} runs, direction ({:.3}, {:.3})",
        n_bins,
        runs.len(),
        axis.direction.0,
        axis.direction.1
    );

    runs.iter()
        .map(|run| {
            let mut line = Polyline::default();
            for (k, v) in smooth_triangular(&run.values).into_iter().enumerate() {
                let u = u_min + (run.start + k) as f32 / scale;
                line.push_dedup(axis.unproject(u, v));
            }
            line
        })
        .collect()
}
