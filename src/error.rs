//! Error type shared by decoding, normalization and export.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading a photo and writing the
/// normalized result.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The source path could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a decodable image.
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// EXIF data is present but unreadable.
    #[error("orientation metadata unreadable: {0}")]
    Metadata(#[from] exif::Error),

    /// Pixel buffer handed to the resampler does not match its extent.
    #[error("resize buffer rejected: {0}")]
    ResizeBuffer(#[from] fast_image_resize::ImageBufferError),

    #[error("resize failed: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),

    /// Resampled pixels could not be wrapped back into an image.
    #[error("resized buffer does not fill {width}x{height}")]
    ResizeOutput { width: u32, height: u32 },

    /// The combined transform is not a quarter-turn/flip plus uniform scale.
    #[error("transform is not axis-aligned: {0:?}")]
    UnsupportedTransform(crate::transform::AffineTransform),

    #[error("encode failed: {0}")]
    Encode(image::ImageError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NormalizeError {
    /// Source could not be opened or parsed as an image.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Decode(_))
    }

    /// Orientation metadata could not be read.
    pub fn is_metadata_failure(&self) -> bool {
        matches!(self, Self::Metadata(_))
    }
}
