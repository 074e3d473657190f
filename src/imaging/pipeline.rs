//! The fixed filter chains.
//!
//! A [`Pipeline`] is an ordered list of [`FilterStep`]s. Each step consumes the
//! previous step's output; the first step is always the centre-square crop.
//! If any step produces no output the whole run falls back to the original
//! image, unchanged. That fallback is logged, never returned as an error.
//!
//! ```text
//! FilmStrip: crop → noir → colour controls → vignette(size/1.5) → blur
//! Polaroid:  crop → white balance → colour controls → vignette → noise
//!            reduction → blur → colour matrix
//! ```

use super::operations;
use super::params::{
    ColorControls, ColorMatrix, FilmStripParams, FilterVariant, NoiseReduction, PolaroidParams,
    Vignette, WhiteBalance,
};
use image::RgbaImage;
use log::{debug, warn};

/// Vignette radius: fixed in pixels, or derived from the crop side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VignetteRadius {
    Fixed(f32),
    /// Crop side divided by this value.
    SideOver(f32),
}

/// One stage of a filter chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterStep {
    CenterSquareCrop,
    Noir,
    WhiteBalance(WhiteBalance),
    ColorControls(ColorControls),
    Vignette { intensity: f32, radius: VignetteRadius },
    NoiseReduction(NoiseReduction),
    GaussianBlur { radius: f32 },
    ColorMatrix(ColorMatrix),
}

impl FilterStep {
    pub fn name(&self) -> &'static str {
        match self {
            FilterStep::CenterSquareCrop => "crop",
            FilterStep::Noir => "noir",
            FilterStep::WhiteBalance(_) => "white-balance",
            FilterStep::ColorControls(_) => "color-controls",
            FilterStep::Vignette { .. } => "vignette",
            FilterStep::NoiseReduction(_) => "noise-reduction",
            FilterStep::GaussianBlur { .. } => "gaussian-blur",
            FilterStep::ColorMatrix(_) => "color-matrix",
        }
    }

    /// Apply this step. `None` means the step produced no image.
    pub fn apply(&self, image: &RgbaImage) -> Option<RgbaImage> {
        match self {
            FilterStep::CenterSquareCrop => operations::crop_center_square(image),
            FilterStep::Noir => operations::noir(image),
            FilterStep::WhiteBalance(wb) => operations::white_balance(image, wb),
            FilterStep::ColorControls(cc) => operations::color_controls(image, cc),
            FilterStep::Vignette { intensity, radius } => {
                let radius = match *radius {
                    VignetteRadius::Fixed(r) => r,
                    VignetteRadius::SideOver(divisor) => {
                        image.width().min(image.height()) as f32 / divisor
                    }
                };
                operations::vignette(
                    image,
                    &Vignette {
                        intensity: *intensity,
                        radius,
                    },
                )
            }
            FilterStep::NoiseReduction(nr) => operations::noise_reduction(image, nr),
            FilterStep::GaussianBlur { radius } => operations::gaussian_blur(image, *radius),
            FilterStep::ColorMatrix(m) => operations::color_matrix(image, m),
        }
    }
}

/// An ordered, immutable chain of filter steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    steps: Vec<FilterStep>,
}

impl Pipeline {
    /// Build a chain from explicit steps.
    pub fn from_steps(steps: Vec<FilterStep>) -> Self {
        Self { steps }
    }

    /// The chain for a variant.
    pub fn for_variant(variant: FilterVariant) -> Self {
        match variant {
            FilterVariant::FilmStrip => Self::film_strip(&FilmStripParams::default()),
            FilterVariant::Polaroid(preset) => {
                Self::polaroid(&PolaroidParams::for_preset(preset))
            }
        }
    }

    pub fn film_strip(p: &FilmStripParams) -> Self {
        Self::from_steps(vec![
            FilterStep::CenterSquareCrop,
            FilterStep::Noir,
            FilterStep::ColorControls(p.color),
            FilterStep::Vignette {
                intensity: p.vignette_intensity,
                radius: VignetteRadius::SideOver(p.vignette_divisor),
            },
            FilterStep::GaussianBlur {
                radius: p.blur_radius,
            },
        ])
    }

    pub fn polaroid(p: &PolaroidParams) -> Self {
        Self::from_steps(vec![
            FilterStep::CenterSquareCrop,
            FilterStep::WhiteBalance(p.white_balance),
            FilterStep::ColorControls(p.color),
            FilterStep::Vignette {
                intensity: p.vignette.intensity,
                radius: VignetteRadius::Fixed(p.vignette.radius),
            },
            FilterStep::NoiseReduction(p.noise),
            FilterStep::GaussianBlur {
                radius: p.blur_radius,
            },
            FilterStep::ColorMatrix(p.matrix),
        ])
    }

    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }

    /// Run every step in order, or `None` if any step had no output.
    pub fn try_run(&self, image: &RgbaImage) -> Option<RgbaImage> {
        let mut current = image.clone();
        for step in &self.steps {
            match step.apply(&current) {
                Some(next) => {
                    debug!(
                        "{}: {}x{} -> {}x{}",
                        step.name(),
                        current.width(),
                        current.height(),
                        next.width(),
                        next.height()
                    );
                    current = next;
                }
                None => {
                    warn!(
                        "filter step '{}' produced no output on a {}x{} image",
                        step.name(),
                        current.width(),
                        current.height()
                    );
                    return None;
                }
            }
        }
        Some(current)
    }

    /// Run the chain, falling back to a copy of `image` if any step fails.
    pub fn run(&self, image: &RgbaImage) -> RgbaImage {
        self.try_run(image).unwrap_or_else(|| {
            warn!("filter chain failed; returning the original image");
            image.clone()
        })
    }
}

/// Apply a variant's filter chain to an image.
///
/// Never fails: a chain that cannot produce output yields the input unchanged.
pub fn apply(variant: FilterVariant, image: &RgbaImage) -> RgbaImage {
    debug!(
        "applying {} to {}x{}",
        variant.name(),
        image.width(),
        image.height()
    );
    Pipeline::for_variant(variant).run(image)
}
