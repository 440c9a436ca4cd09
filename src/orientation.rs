//! EXIF orientation codes, device rotation buckets, the quarter-turn/flip
//! group, and tag reading.

use std::io::Cursor;

use image::DynamicImage;

/// EXIF orientation tag value as read from a photo.
///
/// The eight defined codes plus [`Undefined`](Self::Undefined) (tag value 0,
/// what cameras write when they don't know) and
/// [`Unrecognized`](Self::Unrecognized) for anything outside 0-8.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OrientationCode {
    /// Tag value 0.
    Undefined,
    /// 1: stored upright.
    Normal,
    /// 2: mirrored left-right.
    FlipHorizontal,
    /// 3: upside down.
    Rotate180,
    /// 4: mirrored top-bottom.
    FlipVertical,
    /// 5.
    Transpose,
    /// 6: display needs a 90° clockwise turn.
    Rotate90,
    /// 7.
    Transverse,
    /// 8: display needs a 90° counter-clockwise turn.
    Rotate270,
    /// Any other tag value.
    Unrecognized(u32),
}

impl OrientationCode {
    /// Codes for tag values 1-8, in tag order.
    pub const DEFINED: [Self; 8] = [
        Self::Normal,
        Self::FlipHorizontal,
        Self::Rotate180,
        Self::FlipVertical,
        Self::Transpose,
        Self::Rotate90,
        Self::Transverse,
        Self::Rotate270,
    ];

    /// Interpret a raw tag value. Total: every value maps to some code.
    pub fn from_exif(value: u32) -> Self {
        match value {
            0 => Self::Undefined,
            1..=8 => Self::DEFINED[(value - 1) as usize],
            other => Self::Unrecognized(other),
        }
    }

    /// The raw tag value.
    pub fn to_exif(self) -> u32 {
        match self {
            Self::Undefined => 0,
            Self::Normal => 1,
            Self::FlipHorizontal => 2,
            Self::Rotate180 => 3,
            Self::FlipVertical => 4,
            Self::Transpose => 5,
            Self::Rotate90 => 6,
            Self::Transverse => 7,
            Self::Rotate270 => 8,
            Self::Unrecognized(v) => v,
        }
    }

    /// Undefined reads as Normal; every other code is kept as is.
    pub fn normalized(self) -> Self {
        match self {
            Self::Undefined => Self::Normal,
            other => other,
        }
    }
}

/// How far the device is turned from its natural orientation, snapped to
/// a quarter turn.
///
/// Orientation sensors report a continuous angle in degrees, clockwise
/// from upright. [`from_device_degrees`](Self::from_device_degrees)
/// buckets that angle into the display rotation that keeps the picture
/// upright, which is the counter-rotation of the device:
///
/// ```text
///     device degrees   rotation
///     315..360, 0..45      0
///     225..315            90
///     135..225           180
///      45..135           270
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Bucket a sensor angle. Angles of 360 and above wrap.
    pub fn from_device_degrees(degrees: u32) -> Self {
        match degrees % 360 {
            0..45 | 315..=359 => Self::Deg0,
            225..315 => Self::Deg90,
            135..225 => Self::Deg180,
            _ => Self::Deg270,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// The orientation tag a capture taken at this rotation carries.
    pub fn orientation_code(self) -> OrientationCode {
        match self {
            Self::Deg0 => OrientationCode::Normal,
            Self::Deg90 => OrientationCode::Rotate90,
            Self::Deg180 => OrientationCode::Rotate180,
            Self::Deg270 => OrientationCode::Rotate270,
        }
    }
}

impl From<Rotation> for OrientationCode {
    fn from(rotation: Rotation) -> Self {
        rotation.orientation_code()
    }
}

/// Read the orientation tag from encoded image bytes.
///
/// Missing EXIF data, a missing tag, or a tag without an integer value all
/// read as [`OrientationCode::Undefined`]. Any other EXIF parse error is
/// returned.
pub fn read_orientation(data: &[u8]) -> Result<OrientationCode, exif::Error> {
    let mut cursor = Cursor::new(data);
    let exif = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(OrientationCode::Undefined),
        Err(e) => return Err(e),
    };

    let code = exif
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map_or(OrientationCode::Undefined, OrientationCode::from_exif);
    Ok(code)
}

/// An element of the eight-element quarter-turn/flip group.
///
/// A clockwise rotation by `rotation` quarter turns, optionally followed by
/// a horizontal flip. Every axis-aligned affine transform decomposes into
/// one of these plus a uniform scale.
///
/// ```text
///     rotation/flip   x' y'  (unit square, y down)
///     0 / no          x  y   identity
///     0 / yes        -x  y   flip horizontal
///     1 / no         -y  x   90° clockwise
///     1 / yes         y  x   reflect over main diagonal
///     2 / no         -x -y   180°
///     2 / yes         x -y   flip vertical
///     3 / no          y -x   90° counter-clockwise
///     3 / yes        -y -x   reflect over anti-diagonal
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Orientation {
    /// Clockwise quarter turns (0-3).
    pub rotation: u8,
    /// Horizontal flip applied after rotation.
    pub flip: bool,
}

impl Orientation {
    /// No-op. Displays EXIF 1 (and 0) as stored.
    pub const IDENTITY: Self = Self::new(0, false);
    /// Mirror left-right. Displays EXIF 2.
    pub const FLIP_H: Self = Self::new(0, true);
    /// 90° clockwise. Displays EXIF 6.
    pub const ROTATE_90: Self = Self::new(1, false);
    /// Reflect over the main diagonal. Displays EXIF 7 under
    /// [`resolve`](crate::resolve).
    pub const TRANSPOSE: Self = Self::new(1, true);
    /// Half turn. Displays EXIF 3.
    pub const ROTATE_180: Self = Self::new(2, false);
    /// Mirror top-bottom. Displays EXIF 4.
    pub const FLIP_V: Self = Self::new(2, true);
    /// 90° counter-clockwise. Displays EXIF 8.
    pub const ROTATE_270: Self = Self::new(3, false);
    /// Reflect over the anti-diagonal. Displays EXIF 5 under
    /// [`resolve`](crate::resolve).
    pub const TRANSVERSE: Self = Self::new(3, true);

    /// All eight group elements.
    pub const ALL: [Self; 8] = [
        Self::IDENTITY,
        Self::FLIP_H,
        Self::ROTATE_90,
        Self::TRANSPOSE,
        Self::ROTATE_180,
        Self::FLIP_V,
        Self::ROTATE_270,
        Self::TRANSVERSE,
    ];

    /// Rotation is taken modulo 4.
    pub const fn new(rotation: u8, flip: bool) -> Self {
        Self {
            rotation: rotation & 3,
            flip,
        }
    }

    /// Whether this leaves pixels untouched.
    pub fn is_identity(self) -> bool {
        self.rotation == 0 && !self.flip
    }

    /// Whether this orientation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        self.rotation % 2 == 1
    }

    /// Linear part `[a, b, c, d]` mapping `(x, y)` to `(a·x + b·y, c·x + d·y)`.
    pub fn matrix(self) -> [f64; 4] {
        let [a, b, c, d] = match self.rotation {
            0 => [1.0, 0.0, 0.0, 1.0],
            1 => [0.0, -1.0, 1.0, 0.0],
            2 => [-1.0, 0.0, 0.0, -1.0],
            _ => [0.0, 1.0, -1.0, 0.0],
        };
        if self.flip {
            [-a, -b, c, d]
        } else {
            [a, b, c, d]
        }
    }

    /// Apply to pixels.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        let rotated = match self.rotation {
            0 => img,
            1 => img.rotate90(),
            2 => img.rotate180(),
            _ => img.rotate270(),
        };
        if self.flip { rotated.fliph() } else { rotated }
    }
}
