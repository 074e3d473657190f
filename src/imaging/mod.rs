//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` crate codecs behind [`ImageBackend`] |
//! | **Crop** | `image::imageops::crop_imm` |
//! | **Blur, noise smoothing** | `imageproc::filter::gaussian_blur_f32` |
//! | **Tone, colour, vignette** | per-pixel maps over rows with `rayon` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry and colour maths (unit testable)
//! - **Parameters**: Data structures describing each filter stage and preset
//! - **Operations**: One pixel operation per filter stage
//! - **Pipeline**: The fixed, ordered chains and the fall-back-to-original policy
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod pipeline;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{
    ColorControls, ColorMatrix, FilmStripParams, FilterVariant, NoiseReduction, OutputFormat,
    PolaroidParams, PolaroidPreset, Quality, Vignette, WhiteBalance, WhitePoint,
};
pub use pipeline::{FilterStep, Pipeline, VignetteRadius, apply};
pub use rust_backend::{RustBackend, is_supported_image, supported_input_extensions};
