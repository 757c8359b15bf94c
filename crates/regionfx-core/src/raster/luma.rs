//! Premultiplied luma
//!
//! Gradient and difference computations compare brightness of
//! alpha-premultiplied color so that transparent pixels read as dark
//! rather than as whatever color happens to sit under zero alpha.

/// Premultiply one channel by alpha, rounded to nearest
///
/// `c * a / 255` never lands exactly on .5 since 255 is odd, so
/// `(c*a + 127) / 255` is an exact rounding.
#[inline]
pub fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((channel as u32 * alpha as u32 + 127) / 255) as u8
}

/// Luma of a premultiplied pixel: `(77R + 150G + 29B) / 256`
#[inline]
pub fn luma(r: u8, g: u8, b: u8, alpha: u8) -> u8 {
    let rp = premultiply(r, alpha) as u32;
    let gp = premultiply(g, alpha) as u32;
    let bp = premultiply(b, alpha) as u32;
    ((77 * rp + 150 * gp + 29 * bp) >> 8) as u8
}

/// Premultiplied luma for a whole RGBA buffer
///
/// For background layers the stored alpha is ignored and treated as 255.
pub fn luma_buffer(rgba: &[u8], background: bool) -> Vec<u8> {
    rgba.chunks_exact(4)
        .map(|p| {
            let a = if background { 255 } else { p[3] };
            luma(p[0], p[1], p[2], a)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premultiply_rounding() {
        assert_eq!(premultiply(255, 255), 255);
        assert_eq!(premultiply(255, 0), 0);
        assert_eq!(premultiply(255, 128), 128);
        assert_eq!(premultiply(100, 128), 50);
        assert_eq!(premultiply(1, 127), 0);
        assert_eq!(premultiply(1, 128), 1);
    }

    #[test]
    fn test_luma_weights() {
        assert_eq!(luma(255, 255, 255, 255), 255);
        assert_eq!(luma(0, 0, 0, 255), 0);
        assert_eq!(luma(255, 0, 0, 255), 76);
        assert_eq!(luma(0, 255, 0, 255), 149);
        assert_eq!(luma(255, 255, 255, 0), 0);
    }

    #[test]
    fn test_luma_buffer_background() {
        let rgba = [255, 255, 255, 0, 0, 0, 0, 255];
        assert_eq!(luma_buffer(&rgba, false), vec![0, 0]);
        assert_eq!(luma_buffer(&rgba, true), vec![255, 0]);
    }
}
