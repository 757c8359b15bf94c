//! Region equalization
//!
//! Flattens every connected selected region toward a single color. Each
//! 4-connected component of foreground pixels (selected, and non-transparent
//! on regular layers) is averaged independently and every member pixel is
//! blended toward that average by its own coverage.
//!
//! Two averaging modes are available:
//!
//! - **Plain**: arithmetic mean of R, G, B, A over the component's opaque
//!   pixels, blended with factor `coverage / 255`.
//! - **Weighted**: pixels are greedily clustered into at most
//!   [`MAX_CLUSTERS`] color buckets; the count-weighted mean of the bucket
//!   colors is blended with factor `coverage / 255 * intensity / 10`.

use crate::conncomp::for_each_component;
use regionfx_core::{Layer, RgbaBuffer, mix};

/// Maximum number of color buckets per component
pub const MAX_CLUSTERS: usize = 16;

/// Squared RGBA distance under which a pixel joins an existing bucket
pub const COLOR_TOLERANCE: f32 = 900.0;

/// Options for region equalization
#[derive(Debug, Clone)]
pub struct EqualizeOptions {
    /// Use cluster-weighted averaging instead of the plain mean
    pub weighted: bool,
    /// Weighted-mode strength, 1-10 (values outside are clamped)
    pub intensity: u8,
}

impl Default for EqualizeOptions {
    fn default() -> Self {
        Self {
            weighted: false,
            intensity: 10,
        }
    }
}

impl EqualizeOptions {
    /// Enable or disable weighted averaging
    pub fn with_weighted(mut self, weighted: bool) -> Self {
        self.weighted = weighted;
        self
    }

    /// Set the weighted-mode intensity
    pub fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = intensity;
        self
    }

    fn intensity_factor(&self) -> f32 {
        self.intensity.clamp(1, 10) as f32 / 10.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Cluster {
    mean: [f32; 4],
    count: u32,
}

/// Fixed-capacity color buckets with running means
#[derive(Debug)]
struct ClusterSet {
    slots: [Cluster; MAX_CLUSTERS],
    len: usize,
}

impl ClusterSet {
    fn new() -> Self {
        Self {
            slots: [Cluster::default(); MAX_CLUSTERS],
            len: 0,
        }
    }

    fn add(&mut self, px: [f32; 4]) {
        let mut best = None;
        let mut best_dist = f32::MAX;
        for (k, c) in self.slots[..self.len].iter().enumerate() {
            let d: f32 = (0..4).map(|ch| (px[ch] - c.mean[ch]).powi(2)).sum();
            if d < best_dist {
                best_dist = d;
                best = Some(k);
            }
        }

        match best {
            // A full table merges into the nearest bucket regardless of distance
            Some(k) if best_dist <= COLOR_TOLERANCE || self.len == MAX_CLUSTERS => {
                let c = &mut self.slots[k];
                c.count += 1;
                let n = c.count as f32;
                for ch in 0..4 {
                    c.mean[ch] += (px[ch] - c.mean[ch]) / n;
                }
            }
            _ => {
                self.slots[self.len] = Cluster {
                    mean: px,
                    count: 1,
                };
                self.len += 1;
            }
        }
    }

    fn weighted_average(&self) -> Option<[f32; 4]> {
        let total: u32 = self.slots[..self.len].iter().map(|c| c.count).sum();
        if total == 0 {
            return None;
        }
        let mut avg = [0.0f32; 4];
        for c in &self.slots[..self.len] {
            for ch in 0..4 {
                avg[ch] += c.mean[ch] * c.count as f32;
            }
        }
        Some(avg.map(|v| v / total as f32))
    }
}

fn plain_average(layer: &Layer, component: &[u32]) -> Option<[f32; 4]> {
    let pixels = layer.pixels();
    let mut sum = [0u64; 4];
    let mut n = 0u64;
    for &i in component {
        let i = i as usize;
        let alpha = layer.alpha_at(i);
        if alpha == 0 {
            continue;
        }
        let p = pixels.pixel(i);
        sum[0] += p[0] as u64;
        sum[1] += p[1] as u64;
        sum[2] += p[2] as u64;
        sum[3] += alpha as u64;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(sum.map(|s| s as f32 / n as f32))
}

fn clustered_average(layer: &Layer, component: &[u32]) -> Option<[f32; 4]> {
    let pixels = layer.pixels();
    let mut clusters = ClusterSet::new();
    for &i in component {
        let i = i as usize;
        let alpha = layer.alpha_at(i);
        if alpha == 0 {
            continue;
        }
        let p = pixels.pixel(i);
        clusters.add([p[0] as f32, p[1] as f32, p[2] as f32, alpha as f32]);
    }
    clusters.weighted_average()
}

/// Flatten each connected selected region toward its average color
///
/// Pixels outside every foreground component are returned unchanged, as
/// is the whole buffer when nothing is selected. On background layers the
/// stored alpha channel is left as is.
pub fn equalize_regions(layer: &Layer, options: &EqualizeOptions) -> RgbaBuffer {
    let mut out = layer.pixels().clone();
    let rect = layer.work_rect(0);
    if rect.is_empty() {
        log::debug!("equalize: empty selection, nothing to do");
        return out;
    }

    let strength = if options.weighted {
        options.intensity_factor()
    } else {
        1.0
    };
    let channels = if layer.is_background() { 3 } else { 4 };
    let mut skipped = 0usize;

    let count = for_each_component(
        layer.bounds(),
        rect,
        |i| layer.is_foreground(i),
        |component| {
            let average = if options.weighted {
                clustered_average(layer, component)
            } else {
                plain_average(layer, component)
            };
            let Some(average) = average else {
                skipped += 1;
                return;
            };

            let data = out.data_mut();
            for &i in component {
                let i = i as usize;
                let t = layer.coverage(i) as f32 / 255.0 * strength;
                let o = i * 4;
                for ch in 0..channels {
                    data[o + ch] = mix(data[o + ch], average[ch], t);
                }
            }
        },
    );

    log::debug!(
        "equalize: {} components ({} skipped), weighted={}",
        count,
        skipped,
        options.weighted
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_merge_within_tolerance() {
        let mut set = ClusterSet::new();
        set.add([100.0, 100.0, 100.0, 255.0]);
        set.add([110.0, 100.0, 100.0, 255.0]);
        assert_eq!(set.len, 1);
        assert_eq!(set.slots[0].count, 2);
        assert!((set.slots[0].mean[0] - 105.0).abs() < 1e-4);

        set.add([200.0, 100.0, 100.0, 255.0]);
        assert_eq!(set.len, 2);
    }

    #[test]
    fn test_cluster_capacity_is_bounded() {
        let mut set = ClusterSet::new();
        for k in 0..40 {
            set.add([k as f32 * 50.0 % 256.0, k as f32 * 37.0 % 256.0, 0.0, 255.0]);
        }
        assert!(set.len <= MAX_CLUSTERS);
        let total: u32 = set.slots[..set.len].iter().map(|c| c.count).sum();
        assert_eq!(total, 40);
    }

    #[test]
    fn test_weighted_average_counts() {
        let mut set = ClusterSet::new();
        for _ in 0..3 {
            set.add([0.0, 0.0, 0.0, 255.0]);
        }
        set.add([200.0, 0.0, 0.0, 255.0]);
        let avg = set.weighted_average().unwrap();
        assert!((avg[0] - 50.0).abs() < 1e-4);
        assert!(ClusterSet::new().weighted_average().is_none());
    }

    #[test]
    fn test_intensity_factor_clamped() {
        assert_eq!(EqualizeOptions::default().with_intensity(0).intensity_factor(), 0.1);
        assert_eq!(EqualizeOptions::default().with_intensity(50).intensity_factor(), 1.0);
    }
}
