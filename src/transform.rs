//! 2D affine transforms and the orientation-code resolver.
//!
//! Coordinates are image coordinates: x grows right, y grows down. A
//! positive rotation therefore turns clockwise on screen, and
//! `rotate(90°)` maps `(1, 0)` to `(0, 1)`.
//!
//! The `post_*` builders apply the new operation *after* everything
//! already in the transform.

use crate::orientation::{Orientation, OrientationCode};

/// Tolerance when snapping a transform onto the quarter-turn/flip group.
const SNAP_EPSILON: f64 = 1e-9;

/// A 2×3 affine matrix mapping `(x, y)` to
/// `(a·x + b·y + tx, c·x + d·y + ty)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AffineTransform {
    /// x contribution to x'.
    pub a: f64,
    /// y contribution to x'.
    pub b: f64,
    /// x contribution to y'.
    pub c: f64,
    /// y contribution to y'.
    pub d: f64,
    /// Translation along x.
    pub tx: f64,
    /// Translation along y.
    pub ty: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    /// Maps every point to itself.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Independent scale of each axis about the origin. A negative factor
    /// mirrors that axis.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Rotation by `degrees`, clockwise on screen.
    ///
    /// Multiples of 90° produce exact 0/±1 entries.
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = snapped_sin_cos(degrees);
        Self {
            a: cos,
            b: -sin,
            c: sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// `other ∘ self`: apply `self` first, then `other`.
    pub fn post_concat(self, other: Self) -> Self {
        Self {
            a: other.a * self.a + other.b * self.c,
            b: other.a * self.b + other.b * self.d,
            c: other.c * self.a + other.d * self.c,
            d: other.c * self.b + other.d * self.d,
            tx: other.a * self.tx + other.b * self.ty + other.tx,
            ty: other.c * self.tx + other.d * self.ty + other.ty,
        }
    }

    /// Scale after everything already in `self`.
    pub fn post_scale(self, sx: f64, sy: f64) -> Self {
        self.post_concat(Self::scale(sx, sy))
    }

    /// Rotate after everything already in `self`.
    pub fn post_rotate(self, degrees: f64) -> Self {
        self.post_concat(Self::rotate(degrees))
    }

    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.tx,
            self.c * x + self.d * y + self.ty,
        )
    }

    pub fn is_identity(&self) -> bool {
        self.approx_eq(&Self::IDENTITY)
    }

    /// Entry-wise comparison within [`SNAP_EPSILON`].
    pub fn approx_eq(&self, other: &Self) -> bool {
        [
            (self.a, other.a),
            (self.b, other.b),
            (self.c, other.c),
            (self.d, other.d),
            (self.tx, other.tx),
            (self.ty, other.ty),
        ]
        .iter()
        .all(|(l, r)| (l - r).abs() <= SNAP_EPSILON)
    }

    /// Split the linear part into a group element and a uniform scale.
    ///
    /// Translation is ignored: pixel output is always placed at the
    /// origin. Returns `None` for shears, non-uniform scales, rotations
    /// off the quarter turns, and degenerate (zero-scale) transforms.
    pub fn decompose(&self) -> Option<(Orientation, f64)> {
        let scale = self.a.hypot(self.c);
        if !scale.is_finite() || scale <= SNAP_EPSILON {
            return None;
        }
        let unit = [
            self.a / scale,
            self.b / scale,
            self.c / scale,
            self.d / scale,
        ];
        Orientation::ALL
            .into_iter()
            .find(|o| {
                o.matrix()
                    .iter()
                    .zip(unit)
                    .all(|(want, got)| (want - got).abs() <= SNAP_EPSILON)
            })
            .map(|o| (o, scale))
    }
}

/// `sin` and `cos` of `degrees`, exact at multiples of 90°.
fn snapped_sin_cos(degrees: f64) -> (f64, f64) {
    let turns = degrees / 90.0;
    if turns.fract() == 0.0 {
        return match turns.rem_euclid(4.0) as u8 {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        };
    }
    degrees.to_radians().sin_cos()
}

/// Transform that displays a photo tagged with `code` upright.
///
/// Undefined and unrecognized codes resolve to the identity.
pub fn resolve(code: OrientationCode) -> AffineTransform {
    let m = AffineTransform::IDENTITY;
    match code {
        OrientationCode::FlipHorizontal => m.post_scale(-1.0, 1.0),
        OrientationCode::Rotate180 => m.post_rotate(180.0),
        OrientationCode::FlipVertical => m.post_scale(1.0, -1.0),
        OrientationCode::Rotate90 => m.post_rotate(90.0),
        OrientationCode::Transverse => m.post_rotate(-90.0).post_scale(1.0, -1.0),
        OrientationCode::Transpose => m.post_rotate(90.0).post_scale(1.0, -1.0),
        OrientationCode::Rotate270 => m.post_rotate(-90.0),
        OrientationCode::Normal | OrientationCode::Undefined | OrientationCode::Unrecognized(_) => {
            m
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(p: (f64, f64), q: (f64, f64)) -> bool {
        (p.0 - q.0).abs() < 1e-9 && (p.1 - q.1).abs() < 1e-9
    }

    const UNIT_SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];

    #[test]
    fn undefined_and_normal_are_identity() {
        for code in [OrientationCode::Undefined, OrientationCode::Normal] {
            let m = resolve(code);
            assert!(m.is_identity(), "{code:?}");
            for (x, y) in UNIT_SQUARE {
                assert!(close(m.map_point(x, y), (x, y)), "{code:?} moved ({x},{y})");
            }
        }
        assert_eq!(resolve(OrientationCode::Undefined), resolve(OrientationCode::Normal));
    }

    #[test]
    fn unrecognized_is_identity() {
        assert!(resolve(OrientationCode::Unrecognized(9)).is_identity());
        assert!(resolve(OrientationCode::Unrecognized(0xFFFF)).is_identity());
    }

    #[test]
    fn rotate_90_turns_x_axis_onto_y_axis() {
        let m = resolve(OrientationCode::Rotate90);
        assert!(close(m.map_point(1.0, 0.0), (0.0, 1.0)));
        assert!(close(m.map_point(0.0, 1.0), (-1.0, 0.0)));
    }

    #[test]
    fn rotate_270_is_inverse_of_rotate_90() {
        let round = resolve(OrientationCode::Rotate90).post_concat(resolve(OrientationCode::Rotate270));
        assert!(round.is_identity());
    }

    #[test]
    fn table_point_images() {
        let p = (2.0, 3.0);
        let cases = [
            (OrientationCode::FlipHorizontal, (-2.0, 3.0)),
            (OrientationCode::Rotate180, (-2.0, -3.0)),
            (OrientationCode::FlipVertical, (2.0, -3.0)),
            (OrientationCode::Rotate90, (-3.0, 2.0)),
            // rotate(-90°): (3, -2), then scale(1, -1)
            (OrientationCode::Transverse, (3.0, 2.0)),
            // rotate(90°): (-3, 2), then scale(1, -1)
            (OrientationCode::Transpose, (-3.0, -2.0)),
            (OrientationCode::Rotate270, (3.0, -2.0)),
        ];
        for (code, want) in cases {
            let got = resolve(code).map_point(p.0, p.1);
            assert!(close(got, want), "{code:?}: got {got:?}, want {want:?}");
        }
    }

    #[test]
    fn resolve_decomposes_for_every_code() {
        let cases = [
            (OrientationCode::Normal, Orientation::IDENTITY),
            (OrientationCode::FlipHorizontal, Orientation::FLIP_H),
            (OrientationCode::Rotate180, Orientation::ROTATE_180),
            (OrientationCode::FlipVertical, Orientation::FLIP_V),
            (OrientationCode::Rotate90, Orientation::ROTATE_90),
            (OrientationCode::Rotate270, Orientation::ROTATE_270),
            (OrientationCode::Transverse, Orientation::TRANSPOSE),
            (OrientationCode::Transpose, Orientation::TRANSVERSE),
        ];
        for (code, want) in cases {
            let (o, s) = resolve(code).decompose().unwrap();
            assert_eq!(o, want, "{code:?}");
            assert!((s - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn scale_survives_decomposition() {
        let m = resolve(OrientationCode::Rotate90).post_scale(0.48, 0.48);
        let (o, s) = m.decompose().unwrap();
        assert_eq!(o, Orientation::ROTATE_90);
        assert!((s - 0.48).abs() < 1e-12);
    }

    #[test]
    fn decompose_rejects_non_axis_aligned() {
        assert!(AffineTransform::rotate(45.0).decompose().is_none());
        assert!(AffineTransform::scale(1.0, 2.0).decompose().is_none());
        assert!(AffineTransform::scale(0.0, 0.0).decompose().is_none());
    }

    #[test]
    fn snapped_rotation_is_exact() {
        let m = AffineTransform::rotate(-90.0);
        assert_eq!((m.a, m.b, m.c, m.d), (0.0, 1.0, -1.0, 0.0));
        let m = AffineTransform::rotate(450.0);
        assert_eq!((m.a, m.b, m.c, m.d), (0.0, -1.0, 1.0, 0.0));
    }

    #[test]
    fn post_concat_order() {
        // rotate then mirror x: (1, 0) → (0, 1) → (0, 1)
        let m = AffineTransform::rotate(90.0).post_scale(-1.0, 1.0);
        assert!(close(m.map_point(1.0, 0.0), (0.0, 1.0)));
        // mirror x then rotate: (1, 0) → (-1, 0) → (0, -1)
        let m = AffineTransform::scale(-1.0, 1.0).post_rotate(90.0);
        assert!(close(m.map_point(1.0, 0.0), (0.0, -1.0)));
    }

    proptest! {
        #[test]
        fn resolve_is_total(raw in any::<u32>()) {
            let m = resolve(OrientationCode::from_exif(raw));
            prop_assert!(m.decompose().is_some());
            if raw == 0 || raw > 8 {
                prop_assert!(m.is_identity());
            }
        }
    }
}
