//! Parameter types for the filter stages.
//!
//! These structs describe *what* a stage does, not *how*. The pixel work lives
//! in [`operations`](super::operations); the ordering lives in
//! [`pipeline`](super::pipeline). Keeping the numbers here means both presets
//! of the Polaroid look read as plain data.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`FilterVariant`] / [`PolaroidPreset`]: which look to apply.
//! - [`ColorControls`], [`Vignette`], [`NoiseReduction`], [`WhiteBalance`],
//!   [`ColorMatrix`]: per-stage parameters.
//! - [`OutputFormat`]: encoding used when writing a filtered image.

use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Encoding for written images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    /// Format for a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }
}

/// The two Polaroid parameter sets.
///
/// `Standard` is what the dedicated Polaroid screen uses. `Soft` is the
/// lower-contrast, blurrier variant from the alternate screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolaroidPreset {
    #[default]
    Standard,
    Soft,
}

/// Which look to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVariant {
    Polaroid(PolaroidPreset),
    FilmStrip,
}

impl FilterVariant {
    pub fn name(self) -> &'static str {
        match self {
            FilterVariant::Polaroid(PolaroidPreset::Standard) => "polaroid",
            FilterVariant::Polaroid(PolaroidPreset::Soft) => "polaroid (soft)",
            FilterVariant::FilmStrip => "film strip",
        }
    }
}

/// Contrast / brightness / saturation adjustment.
///
/// Identity is `contrast = 1, brightness = 0, saturation = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorControls {
    pub contrast: f32,
    pub brightness: f32,
    pub saturation: f32,
}

/// Radial darkening toward the edges.
///
/// `radius` is in pixels, measured from the image centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vignette {
    pub intensity: f32,
    pub radius: f32,
}

/// Threshold smoothing with a sharpening counter-term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseReduction {
    /// Luma differences below this (0–1 scale) are smoothed away.
    pub noise_level: f32,
    /// Amount of unsharp-mask applied to everything above the threshold.
    pub sharpness: f32,
}

/// A white point as colour temperature (Kelvin) plus green–magenta tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhitePoint {
    pub kelvin: f32,
    pub tint: f32,
}

/// Retarget `neutral` so it renders like `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhiteBalance {
    pub neutral: WhitePoint,
    pub target: WhitePoint,
}

/// Per-channel linear remix plus bias, on 0–1 channel values.
///
/// Each row is `[r, g, b, a]` weights for one output channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    pub r: [f32; 4],
    pub g: [f32; 4],
    pub b: [f32; 4],
    pub a: [f32; 4],
    pub bias: [f32; 4],
}

impl ColorMatrix {
    pub fn identity() -> Self {
        Self {
            r: [1.0, 0.0, 0.0, 0.0],
            g: [0.0, 1.0, 0.0, 0.0],
            b: [0.0, 0.0, 1.0, 0.0],
            a: [0.0, 0.0, 0.0, 1.0],
            bias: [0.0; 4],
        }
    }

    /// Warm remix used as the last Polaroid stage.
    pub fn instant_film() -> Self {
        Self {
            r: [1.05, 0.02, 0.0, 0.0],
            g: [0.0, 1.0, 0.05, 0.0],
            b: [0.0, 0.0, 0.95, 0.0],
            a: [0.0, 0.0, 0.0, 1.0],
            bias: [0.02, 0.01, -0.01, 0.0],
        }
    }
}

/// Full parameter set of one Polaroid preset.
///
/// The vignette radius is 1.5 px, so past the few centre pixels the darkening
/// is uniform rather than a radial falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolaroidParams {
    pub white_balance: WhiteBalance,
    pub color: ColorControls,
    pub vignette: Vignette,
    pub noise: NoiseReduction,
    pub blur_radius: f32,
    pub matrix: ColorMatrix,
}

impl PolaroidParams {
    pub fn for_preset(preset: PolaroidPreset) -> Self {
        let standard = Self {
            white_balance: WhiteBalance {
                neutral: WhitePoint {
                    kelvin: 6500.0,
                    tint: 0.0,
                },
                target: WhitePoint {
                    kelvin: 7200.0,
                    tint: 100.0,
                },
            },
            color: ColorControls {
                contrast: 1.0,
                brightness: 0.2,
                saturation: 0.9,
            },
            vignette: Vignette {
                intensity: 0.3,
                radius: 1.5,
            },
            noise: NoiseReduction {
                noise_level: 0.02,
                sharpness: 0.4,
            },
            blur_radius: 0.2,
            matrix: ColorMatrix::instant_film(),
        };

        match preset {
            PolaroidPreset::Standard => standard,
            PolaroidPreset::Soft => Self {
                color: ColorControls {
                    contrast: 0.85,
                    brightness: 0.15,
                    saturation: 0.9,
                },
                blur_radius: 0.4,
                ..standard
            },
        }
    }
}

/// Film-strip noir parameters. The vignette radius depends on the crop size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilmStripParams {
    pub color: ColorControls,
    pub vignette_intensity: f32,
    /// Vignette radius = crop side / this divisor.
    pub vignette_divisor: f32,
    pub blur_radius: f32,
}

impl FilmStripParams {
    pub fn vignette_for(&self, side: u32) -> Vignette {
        Vignette {
            intensity: self.vignette_intensity,
            radius: side as f32 / self.vignette_divisor,
        }
    }
}

impl Default for FilmStripParams {
    fn default() -> Self {
        Self {
            color: ColorControls {
                contrast: 0.9,
                brightness: 0.0,
                saturation: 0.5,
            },
            vignette_intensity: 0.7,
            vignette_divisor: 1.5,
            blur_radius: 0.3,
        }
    }
}
