//! Pixel operations, one per filter stage.
//!
//! Every operation takes the previous stage's image by reference and returns
//! a freshly allocated one. `None` means the stage could not produce output
//! (empty image, invalid parameter); the [`pipeline`](super::pipeline) turns
//! that into its fall-back-to-original policy.
//!
//! Channel values are normalised to 0–1 for the maths and clamped on the way
//! back to 8 bits. Per-pixel work is spread over rows with rayon; each pixel
//! depends only on its inputs, so results do not depend on scheduling.

use super::calculations::{
    blur_sigma, center_square, luma, noir_curve, vignette_factor, white_balance_gains,
};
use super::params::{ColorControls, ColorMatrix, NoiseReduction, Vignette, WhiteBalance};
use image::RgbaImage;
use rayon::prelude::*;

/// Sigma of the smoothing pass used by [`noise_reduction`].
const NOISE_SMOOTHING_SIGMA: f32 = 1.0;

#[inline]
fn to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn from_unit(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Run `f` over every pixel with its coordinates, in 0–1 units.
fn map_pixels<F>(image: &RgbaImage, f: F) -> Option<RgbaImage>
where
    F: Fn(u32, u32, [f32; 4]) -> [f32; 4] + Sync,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let mut out = image.clone();
    let row_len = width as usize * 4;
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let input = [to_unit(px[0]), to_unit(px[1]), to_unit(px[2]), to_unit(px[3])];
                let [r, g, b, a] = f(x as u32, y as u32, input);
                px[0] = from_unit(r);
                px[1] = from_unit(g);
                px[2] = from_unit(b);
                px[3] = from_unit(a);
            }
        });
    Some(out)
}

/// Crop to a centred square of side `min(width, height)`.
pub fn crop_center_square(image: &RgbaImage) -> Option<RgbaImage> {
    let rect = center_square(image.width(), image.height());
    if rect.side == 0 {
        return None;
    }
    Some(image::imageops::crop_imm(image, rect.x, rect.y, rect.side, rect.side).to_image())
}

/// Monochrome noir look: luma through a contrast-boosting curve.
pub fn noir(image: &RgbaImage) -> Option<RgbaImage> {
    map_pixels(image, |_, _, [r, g, b, a]| {
        let l = noir_curve(luma(r, g, b));
        [l, l, l, a]
    })
}

/// Shift the white point.
pub fn white_balance(image: &RgbaImage, wb: &WhiteBalance) -> Option<RgbaImage> {
    let [gr, gg, gb] = white_balance_gains(wb);
    if ![gr, gg, gb].iter().all(|g| g.is_finite()) {
        return None;
    }
    map_pixels(image, |_, _, [r, g, b, a]| [r * gr, g * gg, b * gb, a])
}

/// Saturation, then brightness, then contrast around mid-grey.
pub fn color_controls(image: &RgbaImage, params: &ColorControls) -> Option<RgbaImage> {
    let ColorControls {
        contrast,
        brightness,
        saturation,
    } = *params;
    map_pixels(image, |_, _, [r, g, b, a]| {
        let grey = luma(r, g, b);
        let adjust = |c: f32| {
            let c = grey + (c - grey) * saturation;
            let c = c + brightness;
            (c - 0.5) * contrast + 0.5
        };
        [adjust(r), adjust(g), adjust(b), a]
    })
}

/// Radial darkening around the image centre.
pub fn vignette(image: &RgbaImage, params: &Vignette) -> Option<RgbaImage> {
    if !params.radius.is_finite() || !params.intensity.is_finite() {
        return None;
    }
    let cx = image.width() as f32 / 2.0;
    let cy = image.height() as f32 / 2.0;
    map_pixels(image, |x, y, [r, g, b, a]| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let k = vignette_factor((dx * dx + dy * dy).sqrt(), params.radius, params.intensity);
        [r * k, g * k, b * k, a]
    })
}

/// Gaussian blur with sigma = `radius`. Alpha is carried over unblurred.
pub fn gaussian_blur(image: &RgbaImage, radius: f32) -> Option<RgbaImage> {
    let sigma = blur_sigma(radius)?;
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    let mut blurred = imageproc::filter::gaussian_blur_f32(image, sigma);
    for (dst, src) in blurred.pixels_mut().zip(image.pixels()) {
        dst[3] = src[3];
    }
    Some(blurred)
}

/// Smooth sub-threshold noise and sharpen everything else.
///
/// Pixels whose luma differs from a smoothed copy by less than
/// `noise_level` take the smoothed value; the rest get an unsharp mask of
/// strength `sharpness`.
pub fn noise_reduction(image: &RgbaImage, params: &NoiseReduction) -> Option<RgbaImage> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    let smoothed = imageproc::filter::gaussian_blur_f32(image, NOISE_SMOOTHING_SIGMA);
    let NoiseReduction {
        noise_level,
        sharpness,
    } = *params;

    map_pixels(image, |x, y, [r, g, b, a]| {
        let s = smoothed.get_pixel(x, y);
        let (sr, sg, sb) = (to_unit(s[0]), to_unit(s[1]), to_unit(s[2]));
        if (luma(r, g, b) - luma(sr, sg, sb)).abs() < noise_level {
            [sr, sg, sb, a]
        } else {
            [
                r + sharpness * (r - sr),
                g + sharpness * (g - sg),
                b + sharpness * (b - sb),
                a,
            ]
        }
    })
}

/// Linear channel remix plus bias.
pub fn color_matrix(image: &RgbaImage, m: &ColorMatrix) -> Option<RgbaImage> {
    let dot = |row: &[f32; 4], px: &[f32; 4]| {
        row[0] * px[0] + row[1] * px[1] + row[2] * px[2] + row[3] * px[3]
    };
    map_pixels(image, |_, _, px| {
        [
            dot(&m.r, &px) + m.bias[0],
            dot(&m.g, &px) + m.bias[1],
            dot(&m.b, &px) + m.bias[2],
            dot(&m.a, &px) + m.bias[3],
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::{PolaroidParams, PolaroidPreset, WhitePoint};
    use crate::test_helpers::{gradient_image, solid_image};
    use image::Rgba;

    #[test]
    fn crop_landscape_to_square() {
        let img = gradient_image(400, 300);
        let out = crop_center_square(&img).unwrap();
        assert_eq!(out.dimensions(), (300, 300));
        // Column 0 of the crop is column 50 of the source
        assert_eq!(out.get_pixel(0, 0), img.get_pixel(50, 0));
    }

    #[test]
    fn crop_empty_image_has_no_output() {
        assert!(crop_center_square(&RgbaImage::new(0, 10)).is_none());
    }

    #[test]
    fn noir_is_grey_and_keeps_alpha() {
        let img = solid_image(4, 4, Rgba([200, 40, 90, 128]));
        let out = noir(&img).unwrap();
        for px in out.pixels() {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 128);
        }
    }

    #[test]
    fn identity_color_controls_preserve_pixels() {
        let img = gradient_image(16, 16);
        let out = color_controls(
            &img,
            &ColorControls {
                contrast: 1.0,
                brightness: 0.0,
                saturation: 1.0,
            },
        )
        .unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn zero_saturation_is_grey() {
        let img = solid_image(2, 2, Rgba([255, 0, 0, 255]));
        let out = color_controls(
            &img,
            &ColorControls {
                contrast: 1.0,
                brightness: 0.0,
                saturation: 0.0,
            },
        )
        .unwrap();
        let px = out.get_pixel(0, 0);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }

    #[test]
    fn brightness_lifts_and_clamps() {
        let img = solid_image(2, 2, Rgba([250, 100, 0, 255]));
        let out = color_controls(
            &img,
            &ColorControls {
                contrast: 1.0,
                brightness: 0.2,
                saturation: 1.0,
            },
        )
        .unwrap();
        let px = out.get_pixel(0, 0);
        assert_eq!(px[0], 255);
        assert_eq!(px[1], 151);
        assert_eq!(px[2], 51);
    }

    #[test]
    fn vignette_darkens_corners_not_centre() {
        let img = solid_image(100, 100, Rgba([200, 200, 200, 255]));
        let out = vignette(
            &img,
            &Vignette {
                intensity: 0.7,
                radius: 100.0 / 1.5,
            },
        )
        .unwrap();
        let centre = out.get_pixel(50, 50)[0];
        let corner = out.get_pixel(0, 0)[0];
        assert!(centre >= 199, "centre {centre}");
        assert_eq!(corner, 60);
    }

    #[test]
    fn white_balance_warms_grey() {
        let img = solid_image(2, 2, Rgba([128, 128, 128, 255]));
        let wb = PolaroidParams::for_preset(PolaroidPreset::Standard).white_balance;
        let out = white_balance(&img, &wb).unwrap();
        let px = out.get_pixel(0, 0);
        assert!(px[0] > px[2], "expected red > blue, got {:?}", px);
    }

    #[test]
    fn white_balance_identity() {
        let img = gradient_image(8, 8);
        let wp = WhitePoint {
            kelvin: 5000.0,
            tint: 10.0,
        };
        let out = white_balance(
            &img,
            &WhiteBalance {
                neutral: wp,
                target: wp,
            },
        )
        .unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn blur_flat_image_is_unchanged_in_alpha() {
        let img = solid_image(10, 10, Rgba([100, 150, 200, 255]));
        let out = gaussian_blur(&img, 0.3).unwrap();
        assert_eq!(out.dimensions(), (10, 10));
        for px in out.pixels() {
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn blur_rejects_invalid_radius() {
        let img = solid_image(4, 4, Rgba([0, 0, 0, 255]));
        assert!(gaussian_blur(&img, 0.0).is_none());
        assert!(gaussian_blur(&img, f32::NAN).is_none());
    }

    #[test]
    fn noise_reduction_keeps_flat_areas() {
        let img = solid_image(12, 12, Rgba([90, 90, 90, 255]));
        let out = noise_reduction(
            &img,
            &NoiseReduction {
                noise_level: 0.02,
                sharpness: 0.4,
            },
        )
        .unwrap();
        for px in out.pixels() {
            assert!(px[0].abs_diff(90) <= 1);
        }
    }

    #[test]
    fn identity_matrix_preserves_pixels() {
        let img = gradient_image(8, 8);
        let out = color_matrix(&img, &ColorMatrix::identity()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn instant_film_matrix_shifts_black() {
        let img = solid_image(1, 1, Rgba([0, 0, 0, 255]));
        let out = color_matrix(&img, &ColorMatrix::instant_film()).unwrap();
        // bias: +0.02 red, +0.01 green, -0.01 blue (clamped)
        assert_eq!(out.get_pixel(0, 0), &Rgba([5, 3, 0, 255]));
    }
}
