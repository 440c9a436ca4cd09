//! Pixel dimensions and long/short side bookkeeping.

use crate::orientation::Orientation;

/// Width × height of a decoded bitmap in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either axis is zero.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Height strictly greater than width.
    pub const fn is_portrait(self) -> bool {
        self.width < self.height
    }

    /// The larger of width and height.
    pub fn long_side(self) -> u32 {
        self.width.max(self.height)
    }

    /// The smaller of width and height.
    pub fn short_side(self) -> u32 {
        self.width.min(self.height)
    }

    /// `(long, short)` as floats, the argument order the planner takes.
    pub fn long_short(self) -> (f64, f64) {
        (self.long_side() as f64, self.short_side() as f64)
    }

    /// Put a planned `(long, short)` pair back onto this image's axes.
    ///
    /// Returns `(width, height)`. Portrait images carry the long side on
    /// the height axis, everything else (including squares) on the width.
    pub fn axes_from_long_short(self, long: f64, short: f64) -> (f64, f64) {
        if self.is_portrait() {
            (short, long)
        } else {
            (long, short)
        }
    }

    /// Dimensions as displayed after applying `orientation`.
    pub fn oriented(self, orientation: Orientation) -> Self {
        if orientation.swaps_axes() {
            Self::new(self.height, self.width)
        } else {
            self
        }
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}
