//! Encoding and writing normalized photos and raw captures.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use log::debug;

use crate::error::NormalizeError;
use crate::normalize::NormalizedImage;

/// `strftime` pattern for capture file stems.
pub const CAPTURE_DATE_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Extension, with the dot, of every file this module writes.
pub const EXTENSION_JPEG: &str = ".jpg";
/// Media type of the bytes [`encode_jpeg`] produces.
pub const MIME_TYPE_JPEG: &str = "image/jpeg";

/// Output encoding settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExportOptions {
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { jpeg_quality: 100 }
    }
}

impl ExportOptions {
    /// Set JPEG quality, clamped to 1-100.
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

/// Encode as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, NormalizeError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(NormalizeError::Encode)?;
    Ok(buf)
}

/// Encode `photo` as JPEG and write it to `dir/file_name`.
///
/// `dir` must exist. Returns the written path.
pub fn write_jpeg(
    photo: &NormalizedImage,
    dir: &Path,
    file_name: &str,
    options: &ExportOptions,
) -> Result<PathBuf, NormalizeError> {
    let data = encode_jpeg(&photo.image, options.jpeg_quality)?;
    let path = dir.join(file_name);
    fs::write(&path, &data).map_err(|source| NormalizeError::Write {
        path: path.clone(),
        source,
    })?;
    debug!(
        "wrote {} ({MIME_TYPE_JPEG}, {}x{}, {} bytes)",
        path.display(),
        photo.dimensions.width,
        photo.dimensions.height,
        data.len()
    );
    Ok(path)
}

/// `yyyyMMdd_HHmmss.jpg` for a capture taken at `timestamp`.
pub fn capture_file_name<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}{EXTENSION_JPEG}", timestamp.format(CAPTURE_DATE_FORMAT))
}

/// Write already-encoded capture bytes into `dir` under a timestamped
/// name, creating `dir` if needed.
pub fn save_capture<Tz>(
    data: &[u8],
    dir: &Path,
    timestamp: &DateTime<Tz>,
) -> Result<PathBuf, NormalizeError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fs::create_dir_all(dir).map_err(|source| NormalizeError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(capture_file_name(timestamp));
    fs::write(&path, data).map_err(|source| NormalizeError::Write {
        path: path.clone(),
        source,
    })?;
    debug!("saved capture {} ({MIME_TYPE_JPEG}, {} bytes)", path.display(), data.len());
    Ok(path)
}
