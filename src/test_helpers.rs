//! Shared test utilities for the framed test suite.
//!
//! Synthetic images and encoded fixtures, so unit tests never depend on files
//! checked into the repository.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = write_test_jpeg(tmp.path(), "beach.jpg", 400, 300);
//! let img = gradient_image(400, 300);
//! ```

use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Bitmaps
// =========================================================================

/// An opaque image whose channels vary with position.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

/// An image filled with one colour.
pub fn solid_image(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

// =========================================================================
// Encoded fixtures
// =========================================================================

/// Encode a gradient as JPEG bytes.
pub fn encode_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Write a gradient JPEG into `dir` and return its path.
pub fn write_test_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, encode_test_jpeg(width, height)).unwrap();
    path
}

/// Write a file with the given name that is not a decodable image.
pub fn write_corrupt_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"\xFF\xD8 truncated").unwrap();
    path
}
