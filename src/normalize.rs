//! Decode, bound, and orient a photo in one pass.
//!
//! The pipeline:
//!
//! 1. Read the source bytes and decode only the header for the original
//!    dimensions.
//! 2. Pick a coarse subsampling denominator with [`Bounds::plan`] and
//!    shrink the decoded bitmap by it (nearest neighbour, cheap).
//! 3. Plan the fine target with [`Bounds::resized_long_short`] and derive
//!    one uniform scale factor that fits both target axes.
//! 4. Read the EXIF orientation, resolve it to an [`AffineTransform`](crate::AffineTransform) and
//!    post-append the uniform scale.
//! 5. Decompose the combined transform into a quarter-turn/flip plus scale
//!    and apply it to the working bitmap.
//!
//! # Example
//!
//! ```no_run
//! use photonorm::{ImageSource, Normalizer};
//!
//! let photo = Normalizer::default()
//!     .normalize(&ImageSource::path("IMG_0001.jpg"))
//!     .unwrap();
//! assert!(photo.dimensions.width <= 1920);
//! ```

use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::error::{LimitError, LimitErrorKind};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, RgbImage, RgbaImage};
use log::{debug, warn};
use num_traits::NumCast;

use crate::error::NormalizeError;
use crate::geometry::Dimensions;
use crate::orientation::{Orientation, OrientationCode, read_orientation};
use crate::planner::Bounds;
use crate::transform::resolve;

/// Where the encoded photo lives. Borrowed: the caller keeps ownership.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// A file on disk.
    Path(&'a Path),
    /// Encoded bytes already in memory.
    Bytes(&'a [u8]),
}

impl<'a> ImageSource<'a> {
    /// A photo on disk. Accepts anything path-like: `&str`, `&Path`,
    /// `&PathBuf`.
    pub fn path<P: AsRef<Path> + ?Sized>(path: &'a P) -> Self {
        Self::Path(path.as_ref())
    }

    /// An encoded photo already in memory.
    pub fn bytes(data: &'a [u8]) -> Self {
        Self::Bytes(data)
    }

    /// The encoded bytes, reading the file if needed.
    pub fn load(&self) -> Result<Cow<'a, [u8]>, NormalizeError> {
        match *self {
            Self::Bytes(data) => Ok(Cow::Borrowed(data)),
            Self::Path(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|source| NormalizeError::Read {
                    path: path.to_path_buf(),
                    source,
                }),
        }
    }
}

impl<'a> From<&'a [u8]> for ImageSource<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::Bytes(data)
    }
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

/// Resampling filter for the fine resize step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResizeFilter {
    /// Nearest neighbour; what an unfiltered bitmap copy does.
    Nearest,
    /// Bilinear convolution.
    #[default]
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl ResizeFilter {
    fn algorithm(self) -> ResizeAlg {
        match self {
            Self::Nearest => ResizeAlg::Nearest,
            Self::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
            Self::CatmullRom => ResizeAlg::Convolution(FilterType::CatmullRom),
            Self::Lanczos3 => ResizeAlg::Convolution(FilterType::Lanczos3),
        }
    }
}

/// Normalization settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NormalizeOptions {
    /// Long/short side limits of the output.
    pub bounds: Bounds,
    /// Shrink by the integer denominator right after decode.
    pub coarse_subsampling: bool,
    /// Filter for the fine resize.
    pub filter: ResizeFilter,
    /// Orientation applied when the source carries no orientation tag
    /// (tag missing, tag 0, or a format without EXIF).
    pub fallback_orientation: Option<OrientationCode>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            coarse_subsampling: true,
            filter: ResizeFilter::default(),
            fallback_orientation: None,
        }
    }
}

impl NormalizeOptions {
    /// Set the output size limits.
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Enable or disable the post-decode integer shrink. With it off the
    /// fine resize does all the work from the full-size bitmap.
    pub fn coarse_subsampling(mut self, enabled: bool) -> Self {
        self.coarse_subsampling = enabled;
        self
    }

    /// Set the fine resize filter.
    pub fn filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Orientation for untagged sources, typically the capturing device's
    /// [`Rotation`](crate::Rotation).
    pub fn fallback_orientation(mut self, code: impl Into<OrientationCode>) -> Self {
        self.fallback_orientation = Some(code.into());
        self
    }
}

/// An upright, size-bounded photo.
#[derive(Clone, Debug)]
pub struct NormalizedImage {
    /// Final pixels.
    pub image: DynamicImage,
    /// Final width × height.
    pub dimensions: Dimensions,
    /// Dimensions of the source before any processing.
    pub source: Dimensions,
    /// Orientation code applied: the source tag (or the fallback when
    /// untagged), after Undefined → Normal.
    pub orientation: OrientationCode,
    /// Uniform scale applied to the working bitmap.
    pub scale: f64,
    /// Coarse subsampling denominator applied after decode.
    pub subsample: u32,
}

/// Header-only view of a source photo.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Probe {
    /// Stored pixel grid dimensions.
    pub dimensions: Dimensions,
    /// Orientation code as read (not normalized).
    pub orientation: OrientationCode,
    /// Dimensions once the orientation is applied.
    pub display: Dimensions,
}

/// Stateless photo normalizer. Cheap to copy and safe to share.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Run the full pipeline on `source`.
    pub fn normalize(&self, source: &ImageSource<'_>) -> Result<NormalizedImage, NormalizeError> {
        let bytes = source.load()?;
        let bounds = self.options.bounds;

        let original = decode_dimensions(&bytes)?;
        let (long, short) = original.long_short();
        let subsample = if self.options.coarse_subsampling {
            bounds.plan(long, short)
        } else {
            1
        };

        let (decoded, format) = decode(&bytes)?;
        let working = subsample_pixels(decoded, subsample)?;
        let working_dims = Dimensions::new(working.width(), working.height());
        let (ww, wh) = (working_dims.width as f64, working_dims.height as f64);

        let (target_long, target_short) = {
            let (l, s) = working_dims.long_short();
            bounds.resized_long_short(l, s)
        };
        let (tw, th) = working_dims.axes_from_long_short(target_long, target_short);
        let scale = (tw / ww).min(th / wh).min(bounds.fit_scale(ww, wh));

        let read = if carries_exif(format) {
            read_orientation(&bytes)?
        } else {
            OrientationCode::Undefined
        };
        let code = match (read, self.options.fallback_orientation) {
            (OrientationCode::Undefined, Some(fallback)) => fallback,
            (read, _) => read,
        }
        .normalized();

        let transform = resolve(code).post_scale(scale, scale);
        let (orientation, scale) = transform
            .decompose()
            .ok_or(NormalizeError::UnsupportedTransform(transform))?;

        debug!(
            "normalize: source {}x{}, subsample 1/{subsample}, working {}x{}, scale {scale:.4}, {code:?}",
            original.width, original.height, working_dims.width, working_dims.height
        );

        let image = apply(working, orientation, scale, self.options.filter)?;
        let dimensions = Dimensions::new(image.width(), image.height());

        Ok(NormalizedImage {
            image,
            dimensions,
            source: original,
            orientation: code,
            scale,
            subsample,
        })
    }

    /// [`normalize`](Self::normalize), logging and discarding any error.
    pub fn normalize_opt(&self, source: &ImageSource<'_>) -> Option<NormalizedImage> {
        match self.normalize(source) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!("normalize: {e}");
                None
            }
        }
    }
}

/// [`Normalizer::normalize`] with default options.
pub fn normalize(source: &ImageSource<'_>) -> Result<NormalizedImage, NormalizeError> {
    Normalizer::default().normalize(source)
}

/// Dimensions and orientation without decoding pixels.
pub fn probe(source: &ImageSource<'_>) -> Result<Probe, NormalizeError> {
    let bytes = source.load()?;
    let dimensions = decode_dimensions(&bytes)?;
    let format = guess_format(&bytes)?;
    let orientation = if carries_exif(format) {
        read_orientation(&bytes)?
    } else {
        OrientationCode::Undefined
    };
    let display = resolve(orientation.normalized())
        .decompose()
        .map_or(dimensions, |(o, _)| dimensions.oriented(o));

    Ok(Probe {
        dimensions,
        orientation,
        display,
    })
}

// ============================================================================
// Decoding
// ============================================================================

fn reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, NormalizeError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| NormalizeError::Decode(ImageError::IoError(e)))
}

fn guess_format(bytes: &[u8]) -> Result<Option<ImageFormat>, NormalizeError> {
    Ok(reader(bytes)?.format())
}

/// Header-only decode.
fn decode_dimensions(bytes: &[u8]) -> Result<Dimensions, NormalizeError> {
    let dims = Dimensions::from(reader(bytes)?.into_dimensions()?);
    if dims.is_empty() {
        return Err(NormalizeError::Decode(ImageError::Limits(
            LimitError::from_kind(LimitErrorKind::DimensionError),
        )));
    }
    Ok(dims)
}

fn decode(bytes: &[u8]) -> Result<(DynamicImage, Option<ImageFormat>), NormalizeError> {
    let reader = reader(bytes)?;
    let format = reader.format();
    Ok((reader.decode()?, format))
}

/// Containers the EXIF reader understands.
fn carries_exif(format: Option<ImageFormat>) -> bool {
    matches!(
        format,
        Some(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Tiff | ImageFormat::WebP)
    )
}

// ============================================================================
// Pixel work
// ============================================================================

/// Float pixel extent to a whole pixel count, at least 1.
fn to_pixels(extent: f64) -> u32 {
    <u32 as NumCast>::from(extent.round()).unwrap_or(1).max(1)
}

fn subsample_pixels(img: DynamicImage, denominator: u32) -> Result<DynamicImage, NormalizeError> {
    if denominator <= 1 {
        return Ok(img);
    }
    let width = (img.width() / denominator).max(1);
    let height = (img.height() / denominator).max(1);
    resample(img, width, height, ResizeAlg::Nearest)
}

/// Scale first, then orient: a uniform scale commutes with the group
/// element and resampling the smaller, unrotated buffer is cheaper.
fn apply(
    img: DynamicImage,
    orientation: Orientation,
    scale: f64,
    filter: ResizeFilter,
) -> Result<DynamicImage, NormalizeError> {
    let width = to_pixels(img.width() as f64 * scale);
    let height = to_pixels(img.height() as f64 * scale);
    let scaled = resample(img, width, height, filter.algorithm())?;
    Ok(orientation.apply(scaled))
}

fn resample(
    img: DynamicImage,
    width: u32,
    height: u32,
    alg: ResizeAlg,
) -> Result<DynamicImage, NormalizeError> {
    if img.width() == width && img.height() == height {
        return Ok(img);
    }

    let has_alpha = img.color().has_alpha();
    let (src_w, src_h) = (img.width(), img.height());
    let (pixel_type, raw) = if has_alpha {
        (PixelType::U8x4, img.into_rgba8().into_raw())
    } else {
        (PixelType::U8x3, img.into_rgb8().into_raw())
    };

    let src = Image::from_vec_u8(src_w, src_h, raw, pixel_type)?;
    let mut dst = Image::new(width, height, pixel_type);

    let options = ResizeOptions::new().resize_alg(alg);
    Resizer::new().resize(&src, &mut dst, Some(&options))?;

    let out = dst.into_vec();
    let resized = if has_alpha {
        RgbaImage::from_raw(width, height, out).map(DynamicImage::ImageRgba8)
    } else {
        RgbImage::from_raw(width, height, out).map(DynamicImage::ImageRgb8)
    };
    resized.ok_or(NormalizeError::ResizeOutput { width, height })
}
