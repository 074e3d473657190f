//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two codec operations the rest of
//! the crate needs: decode and encode. Filters never touch bytes;
//! acquisition and the photo library only touch bytes through this trait.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust and built on
//! the `image` crate.

use super::params::{OutputFormat, Quality};
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    DecodeFailed(String),
    #[error("Encode failed: {0}")]
    EncodeFailed(String),
}

/// Trait for image codec backends.
pub trait ImageBackend: Sync {
    /// Decode encoded bytes into an RGBA bitmap.
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, BackendError>;

    /// Encode an RGBA bitmap.
    fn encode(
        &self,
        image: &RgbaImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError>;
}
