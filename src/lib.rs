//! EXIF-aware photo normalization: decode, bound to a long/short side
//! limit, and turn upright in one pass.
//!
//! # Modules
//!
//! - [`planner`]: long/short side bounds, subsampling denominator, target sizes
//! - [`orientation`]: EXIF orientation codes, device rotation buckets, tag reading
//! - [`transform`]: affine transforms and the orientation-code resolver
//! - [`normalize`]: the decode → plan → orient → resample pipeline
//! - [`export`]: JPEG encoding and capture file naming
//!
//! # Example
//!
//! ```no_run
//! use photonorm::{ExportOptions, ImageSource, Normalizer, export};
//! use std::path::Path;
//!
//! let photo = Normalizer::default().normalize(&ImageSource::path("IMG_0001.jpg"))?;
//! export::write_jpeg(&photo, Path::new("/tmp"), "IMG_0001.jpg", &ExportOptions::default())?;
//! # Ok::<(), photonorm::NormalizeError>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod export;
pub mod geometry;
pub mod normalize;
pub mod orientation;
pub mod planner;
pub mod transform;

pub use error::NormalizeError;
pub use export::ExportOptions;
pub use geometry::Dimensions;
pub use normalize::{
    ImageSource, NormalizeOptions, NormalizedImage, Normalizer, Probe, ResizeFilter, normalize,
    probe,
};
pub use orientation::{Orientation, OrientationCode, Rotation, read_orientation};
pub use planner::{Bounds, MAX_LONG_SIDE, MAX_SHORT_SIDE, plan, resized_long_short};
pub use transform::{AffineTransform, resolve};
