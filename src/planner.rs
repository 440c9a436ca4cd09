//! Size bounds and the long/short side planning rules.
//!
//! A photo is bounded by its *long* side and its *short* side rather than
//! by width and height, so the same bounds apply to portrait and landscape
//! captures alike.
//!
//! Two independent plans come out of a [`Bounds`]:
//!
//! - [`Bounds::plan`]: an integer subsampling denominator used to shrink
//!   the bitmap coarsely right after decode.
//! - [`Bounds::resized_long_short`]: the precise target long/short sides.
//!
//! Both test the long side first and only fall through to the short side
//! when the long side is within bounds.
//!
//! # Example
//!
//! ```
//! use photonorm::Bounds;
//!
//! let bounds = Bounds::default();
//! assert_eq!(bounds.plan(3840.0, 2160.0), 2);
//! assert_eq!(bounds.resized_long_short(3840.0, 2160.0), (1920.0, 1080.0));
//! ```

use num_traits::NumCast;

/// Default maximum long side in pixels.
pub const MAX_LONG_SIDE: u32 = 1920;
/// Default maximum short side in pixels.
pub const MAX_SHORT_SIDE: u32 = 1080;

/// Maximum long-side and short-side extents of a normalized photo.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Upper bound for the larger of width and height.
    pub max_long_side: u32,
    /// Upper bound for the smaller of width and height.
    pub max_short_side: u32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(MAX_LONG_SIDE, MAX_SHORT_SIDE)
    }
}

impl Bounds {
    /// Create bounds. Zero extents are raised to 1.
    pub fn new(max_long_side: u32, max_short_side: u32) -> Self {
        Self {
            max_long_side: max_long_side.max(1),
            max_short_side: max_short_side.max(1),
        }
    }

    /// Set the maximum long side.
    pub fn max_long_side(mut self, px: u32) -> Self {
        self.max_long_side = px.max(1);
        self
    }

    /// Set the maximum short side.
    pub fn max_short_side(mut self, px: u32) -> Self {
        self.max_short_side = px.max(1);
        self
    }

    /// Coarse subsampling denominator for a source of the given sides.
    ///
    /// `round(long / max_long)` when the long side reaches its bound,
    /// else `round(short / max_short)` when the short side reaches its
    /// bound, else 1. Never less than 1.
    pub fn plan(&self, long_side: f64, short_side: f64) -> u32 {
        let max_long = self.max_long_side as f64;
        let max_short = self.max_short_side as f64;

        let ratio = if long_side >= max_long {
            long_side / max_long
        } else if short_side >= max_short {
            short_side / max_short
        } else {
            return 1;
        };

        <u32 as NumCast>::from(ratio.round()).unwrap_or(1).max(1)
    }

    /// Target `(long, short)` sides, preserving aspect ratio.
    ///
    /// Pins the long side to its bound when it reaches it, else pins the
    /// short side to its bound when that reaches it, else returns the
    /// input unchanged. Only one side is pinned, so the other may still
    /// exceed its bound; [`fit_scale`](Self::fit_scale) covers that.
    pub fn resized_long_short(&self, long_side: f64, short_side: f64) -> (f64, f64) {
        let max_long = self.max_long_side as f64;
        let max_short = self.max_short_side as f64;

        if long_side >= max_long {
            (max_long, max_long * (short_side / long_side))
        } else if short_side >= max_short {
            (max_short * (long_side / short_side), max_short)
        } else {
            (long_side, short_side)
        }
    }

    /// Largest factor ≤ 1 that puts both sides of `width × height` within
    /// bounds.
    pub fn fit_scale(&self, width: f64, height: f64) -> f64 {
        let long = width.max(height);
        let short = width.min(height);
        (self.max_long_side as f64 / long)
            .min(self.max_short_side as f64 / short)
            .min(1.0)
    }
}

/// [`Bounds::plan`] with the default 1920 × 1080 bounds.
pub fn plan(long_side: f64, short_side: f64) -> u32 {
    Bounds::default().plan(long_side, short_side)
}

/// [`Bounds::resized_long_short`] with the default 1920 × 1080 bounds.
pub fn resized_long_short(long_side: f64, short_side: f64) -> (f64, f64) {
    Bounds::default().resized_long_short(long_side, short_side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── plan ────────────────────────────────────────────────────────────

    #[test]
    fn plan_uhd() {
        // 3840 / 1920 = 2
        assert_eq!(plan(3840.0, 2160.0), 2);
    }

    #[test]
    fn plan_long_side_rounds() {
        // 4000 / 1920 = 2.08 → 2
        assert_eq!(plan(4000.0, 3000.0), 2);
        // 2880 / 1920 = 1.5 → 2 (half rounds up)
        assert_eq!(plan(2880.0, 100.0), 2);
        // 2500 / 1920 = 1.30 → 1
        assert_eq!(plan(2500.0, 100.0), 1);
        // 6000 / 1920 = 3.125 → 3
        assert_eq!(plan(6000.0, 4000.0), 3);
    }

    #[test]
    fn plan_exactly_at_bound() {
        assert_eq!(plan(1920.0, 1080.0), 1);
    }

    #[test]
    fn plan_short_side_branch() {
        // Long side under bound falls through to the short side: 1200/1080 → 1
        assert_eq!(plan(1500.0, 1200.0), 1);
        // 1800 / 1080 = 1.67 → 2
        assert_eq!(plan(1900.0, 1800.0), 2);
    }

    #[test]
    fn plan_custom_bounds() {
        let b = Bounds::new(640, 480);
        assert_eq!(b.plan(1280.0, 960.0), 2);
        assert_eq!(b.plan(600.0, 590.0), 1);
    }

    // ── resized_long_short ──────────────────────────────────────────────

    #[test]
    fn resize_uhd() {
        assert_eq!(resized_long_short(3840.0, 2160.0), (1920.0, 1080.0));
    }

    #[test]
    fn resize_short_side_branch() {
        // 1080 * (1500 / 1200) = 1350
        assert_eq!(resized_long_short(1500.0, 1200.0), (1350.0, 1080.0));
    }

    #[test]
    fn resize_long_branch_can_leave_short_over_bound() {
        // 1920 * (3000 / 4000) = 1440: only the long side is pinned.
        assert_eq!(resized_long_short(4000.0, 3000.0), (1920.0, 1440.0));
    }

    // ── fit_scale ───────────────────────────────────────────────────────

    #[test]
    fn fit_scale_clamps_both_sides() {
        let b = Bounds::default();
        // short side governs: 1080 / 1500 = 0.72
        assert_eq!(b.fit_scale(2000.0, 1500.0), 0.72);
        assert_eq!(b.fit_scale(1500.0, 2000.0), 0.72);
        // long side governs: 1920 / 3840 = 0.5
        assert_eq!(b.fit_scale(3840.0, 1000.0), 0.5);
    }

    #[test]
    fn fit_scale_never_enlarges() {
        assert_eq!(Bounds::default().fit_scale(100.0, 50.0), 1.0);
    }

    #[test]
    fn builder_rejects_zero() {
        let b = Bounds::default().max_long_side(0).max_short_side(0);
        assert_eq!(b, Bounds::new(1, 1));
    }

    proptest! {
        #[test]
        fn within_bounds_is_untouched(long in 1u32..1920, short_frac in 0.0f64..=1.0) {
            let short = ((long as f64 * short_frac).floor() as u32).clamp(1, 1079).min(long);
            let (l, s) = (long as f64, short as f64);
            prop_assert_eq!(plan(l, s), 1);
            prop_assert_eq!(resized_long_short(l, s), (l, s));
        }

        #[test]
        fn plan_is_at_least_one(long in 1.0f64..50_000.0, short in 1.0f64..50_000.0) {
            prop_assert!(plan(long.max(short), long.min(short)) >= 1);
        }
    }
}
