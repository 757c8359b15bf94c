//! Bounds and Rect - pixel grid geometry
//!
//! [`Bounds`] describes the full document grid shared by the pixel buffer
//! and the selection mask. [`Rect`] is a sub-rectangle of that grid used to
//! restrict work to the neighborhood of the active selection.

use crate::error::{Error, Result};

/// Size of the full pixel grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounds {
    /// Grid width in pixels
    pub width: u32,
    /// Grid height in pixels
    pub height: u32,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of pixels in the grid
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Flat pixel index of `(x, y)`
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Inverse of [`Bounds::index`]
    #[inline]
    pub fn coords(&self, index: usize) -> (u32, u32) {
        let w = self.width as usize;
        ((index % w) as u32, (index / w) as u32)
    }

    /// Check if a signed point lies on the grid
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Rectangle covering the whole grid
    pub fn full_rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// A rectangle on the pixel grid
///
/// `right` and `bottom` are exclusive. A rectangle with `right <= left` or
/// `bottom <= top` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate (inclusive)
    pub left: u32,
    /// Top y coordinate (inclusive)
    pub top: u32,
    /// Right x coordinate (exclusive)
    pub right: u32,
    /// Bottom y coordinate (exclusive)
    pub bottom: u32,
}

impl Rect {
    /// Create a new rectangle from its edges
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from origin and size
    pub fn from_xywh(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self::new(x, y, x.saturating_add(w), y.saturating_add(h))
    }

    /// Width of the rectangle (zero if empty)
    #[inline]
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Height of the rectangle (zero if empty)
    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Number of pixels covered
    #[inline]
    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Check if the rectangle covers no pixels
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Check if a point is inside the rectangle
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Intersection of two rectangles (may be empty)
    pub fn intersect(&self, other: &Rect) -> Rect {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right).max(left);
        let bottom = self.bottom.min(other.bottom).max(top);
        Rect::new(left, top, right, bottom)
    }

    /// Grow the rectangle by `pad` on every side, clamped to `bounds`
    pub fn padded(&self, pad: u32, bounds: Bounds) -> Rect {
        if self.is_empty() {
            return *self;
        }
        Rect::new(
            self.left.saturating_sub(pad),
            self.top.saturating_sub(pad),
            self.right.saturating_add(pad).min(bounds.width),
            self.bottom.saturating_add(pad).min(bounds.height),
        )
    }

    /// Padded bounding rectangle of every non-zero mask value
    ///
    /// Returns an empty rectangle when nothing is selected.
    pub fn selection_bounds(mask: &[u8], bounds: Bounds, pad: u32) -> Rect {
        let w = bounds.width;
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0u32;
        let mut max_y = 0u32;

        for (y, row) in mask.chunks_exact(w as usize).enumerate() {
            let y = y as u32;
            let Some(first) = row.iter().position(|&m| m > 0) else {
                continue;
            };
            // position() found a hit, so rposition() will too
            let last = row.iter().rposition(|&m| m > 0).unwrap_or(first);
            min_x = min_x.min(first as u32);
            max_x = max_x.max(last as u32);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        if min_x > max_x || min_y > max_y {
            return Rect::default();
        }
        Rect::new(min_x, min_y, max_x + 1, max_y + 1).padded(pad, bounds)
    }

    /// Iterate over the flat indices of the rectangle, row by row
    pub fn indices(&self, bounds: Bounds) -> impl Iterator<Item = usize> + '_ {
        let w = bounds.width as usize;
        (self.top..self.bottom).flat_map(move |y| {
            let row = y as usize * w;
            (self.left as usize..self.right as usize).map(move |x| row + x)
        })
    }
}
