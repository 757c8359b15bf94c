//! One-dimensional Gaussian kernels for separable blurs

use crate::{FilterError, FilterResult};

/// Largest supported kernel radius
pub const MAX_RADIUS: u32 = 64;

/// A normalized 1D Gaussian kernel of size `2*radius + 1`
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    radius: u32,
    sigma: f32,
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// Create a Gaussian kernel
    ///
    /// `radius` is clamped to [`MAX_RADIUS`]. A radius of 0 yields the
    /// identity kernel.
    ///
    /// # Errors
    ///
    /// Returns an error if `sigma` is not a positive finite number.
    pub fn new(radius: u32, sigma: f32) -> FilterResult<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(FilterError::InvalidKernel(format!(
                "sigma must be positive and finite, got {}",
                sigma
            )));
        }
        Ok(Self::build(radius, sigma))
    }

    /// Build without validating `sigma`; callers guarantee it is positive
    pub(crate) fn build(radius: u32, sigma: f32) -> Self {
        let radius = radius.min(MAX_RADIUS);
        let s2 = 2.0 * sigma * sigma;
        let mut weights: Vec<f32> = (-(radius as i32)..=radius as i32)
            .map(|k| (-((k * k) as f32) / s2).exp())
            .collect();
        let sum: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= sum;
        }
        Self {
            radius,
            sigma,
            weights,
        }
    }

    /// Kernel radius
    #[inline]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Standard deviation the kernel was built from
    #[inline]
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Kernel weights, index 0 is offset `-radius`
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Sum of all weights (1 up to rounding)
    pub fn total(&self) -> f32 {
        self.weights.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_normalized_and_symmetric() {
        let k = GaussianKernel::new(3, 1.5).unwrap();
        assert_eq!(k.weights().len(), 7);
        assert!((k.total() - 1.0).abs() < 1e-5);
        for i in 0..3 {
            assert!((k.weights()[i] - k.weights()[6 - i]).abs() < 1e-7);
        }
        assert!(k.weights()[3] > k.weights()[2]);
    }

    #[test]
    fn test_gaussian_identity_and_clamp() {
        let k = GaussianKernel::new(0, 1.0).unwrap();
        assert_eq!(k.weights(), &[1.0]);
        assert_eq!(GaussianKernel::new(500, 2.0).unwrap().radius(), MAX_RADIUS);
    }

    #[test]
    fn test_gaussian_rejects_bad_sigma() {
        assert!(GaussianKernel::new(2, 0.0).is_err());
        assert!(GaussianKernel::new(2, -1.0).is_err());
        assert!(GaussianKernel::new(2, f32::NAN).is_err());
    }
}
