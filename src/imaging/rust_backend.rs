//! Pure Rust codec backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (RGB, alpha dropped) |

use super::backend::{BackendError, ImageBackend};
use super::params::{OutputFormat, Quality};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
///
/// Live photos, screenshots and bursts all arrive as one of these still
/// formats once they are on disk.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// True when `path` has an extension we can decode (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, BackendError> {
        image::load_from_memory(bytes)
            .map(|img| img.to_rgba8())
            .map_err(|e| BackendError::DecodeFailed(e.to_string()))
    }

    fn encode(
        &self,
        image: &RgbaImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError> {
        let mut buf = Vec::new();
        let (width, height) = image.dimensions();
        let result = match format {
            OutputFormat::Png => image::codecs::png::PngEncoder::new(&mut buf).write_image(
                image.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            ),
            OutputFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.value() as u8)
                    .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
            }
        };
        result.map_err(|e| BackendError::EncodeFailed(format!("{format:?} encode failed: {e}")))?;
        Ok(buf)
    }
}
