//! Pure calculation functions for the filter stages.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{WhiteBalance, WhitePoint};

/// Rec. 709 luma weights.
pub const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// A crop rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

/// Calculate the centred square crop for an image.
///
/// The side is the shorter of the two dimensions; the longer one is trimmed
/// symmetrically (odd remainders round toward the top-left).
///
/// # Examples
/// ```
/// # use framed::imaging::calculations::{center_square, CropRect};
/// assert_eq!(center_square(400, 300), CropRect { x: 50, y: 0, side: 300 });
/// ```
pub fn center_square(width: u32, height: u32) -> CropRect {
    let side = width.min(height);
    CropRect {
        x: (width - side) / 2,
        y: (height - side) / 2,
        side,
    }
}

/// Relative luminance of a normalised RGB triple.
#[inline]
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA[0] * r + LUMA[1] * g + LUMA[2] * b
}

/// Hermite smoothstep between `edge0` and `edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Multiplicative brightness factor of a vignette at distance `distance`.
///
/// 1.0 at the centre, falling smoothly to `1 - intensity` at `radius` and
/// staying there beyond it.
pub fn vignette_factor(distance: f32, radius: f32, intensity: f32) -> f32 {
    let t = if radius > 0.0 { distance / radius } else { 1.0 };
    1.0 - intensity * smoothstep(0.0, 1.0, t)
}

/// Contrast-boosting tone curve used by the noir look.
///
/// Fixes 0, 0.5 and 1; steepens the midtones.
pub fn noir_curve(l: f32) -> f32 {
    let l = l.clamp(0.0, 1.0);
    let s = smoothstep(0.0, 1.0, l);
    (0.6 * s + 0.4 * l).clamp(0.0, 1.0)
}

/// Approximate RGB of a black body at `kelvin`, normalised to 0–1.
///
/// Tanner Helland's polynomial fit of the Planckian locus.
#[allow(clippy::excessive_precision)]
pub fn kelvin_to_rgb(kelvin: f32) -> [f32; 3] {
    let temp = (kelvin / 100.0).clamp(10.0, 400.0);

    let (r, g, b) = if temp <= 66.0 {
        let g = 99.4708025861 * temp.ln() - 161.1195681661;
        let b = if temp <= 19.0 {
            0.0
        } else {
            138.5177312231 * (temp - 10.0).ln() - 305.0447927307
        };
        (255.0, g, b)
    } else {
        let r = 329.698727446 * (temp - 60.0).powf(-0.1332047592);
        let g = 288.1221695283 * (temp - 60.0).powf(-0.0755148492);
        (r, g, 255.0)
    };

    [
        r.clamp(0.0, 255.0) / 255.0,
        g.clamp(0.0, 255.0) / 255.0,
        b.clamp(0.0, 255.0) / 255.0,
    ]
}

fn green_normalised(wp: WhitePoint) -> [f32; 3] {
    let [r, g, b] = kelvin_to_rgb(wp.kelvin);
    let g = g.max(0.001);
    [r.max(0.001) / g, 1.0, b.max(0.001) / g]
}

/// Per-channel gains that move `neutral` to `target`.
///
/// A target warmer-labelled than the neutral (higher Kelvin) means the scene
/// is assumed lit by bluer light, so blue is pulled down and red pushed up.
/// A positive tint delta pulls green down (toward magenta).
pub fn white_balance_gains(wb: &WhiteBalance) -> [f32; 3] {
    let src = green_normalised(wb.neutral);
    let dst = green_normalised(wb.target);
    let tint = 1.0 - (wb.target.tint - wb.neutral.tint) / 500.0;
    [src[0] / dst[0], tint, src[2] / dst[2]]
}

/// Gaussian sigma for a blur radius.
///
/// The radius is used directly as sigma. Returns `None` for non-positive or
/// non-finite radii, which the blur stage treats as "no output".
pub fn blur_sigma(radius: f32) -> Option<f32> {
    (radius.is_finite() && radius > 0.0).then_some(radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // center_square tests
    // =========================================================================

    #[test]
    fn crop_landscape() {
        assert_eq!(center_square(400, 300), CropRect { x: 50, y: 0, side: 300 });
    }

    #[test]
    fn crop_portrait() {
        assert_eq!(center_square(300, 500), CropRect { x: 0, y: 100, side: 300 });
    }

    #[test]
    fn crop_square_is_identity() {
        assert_eq!(center_square(256, 256), CropRect { x: 0, y: 0, side: 256 });
    }

    #[test]
    fn crop_odd_remainder_rounds_down() {
        // 101 - 100 = 1 → offset 0
        assert_eq!(center_square(101, 100), CropRect { x: 0, y: 0, side: 100 });
        assert_eq!(center_square(103, 100), CropRect { x: 1, y: 0, side: 100 });
    }

    #[test]
    fn crop_degenerate_has_zero_side() {
        assert_eq!(center_square(0, 50).side, 0);
    }

    // =========================================================================
    // tone helpers
    // =========================================================================

    #[test]
    fn luma_weights_sum_to_one() {
        assert!((luma(1.0, 1.0, 1.0) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn noir_curve_fixed_points() {
        assert!(noir_curve(0.0).abs() < 1e-6);
        assert!((noir_curve(0.5) - 0.5).abs() < 1e-6);
        assert!((noir_curve(1.0) - 1.0).abs() < 1e-6);
        // Steepened: shadows darker, highlights brighter
        assert!(noir_curve(0.25) < 0.25);
        assert!(noir_curve(0.75) > 0.75);
    }

    #[test]
    fn vignette_centre_untouched_edges_darkened() {
        assert_eq!(vignette_factor(0.0, 200.0, 0.7), 1.0);
        assert!((vignette_factor(250.0, 200.0, 0.7) - 0.3).abs() < 1e-6);
        let mid = vignette_factor(100.0, 200.0, 0.7);
        assert!(mid < 1.0 && mid > 0.3);
    }

    #[test]
    fn vignette_zero_radius_darkens_everything() {
        assert!((vignette_factor(0.0, 0.0, 0.3) - 0.7).abs() < 1e-6);
    }

    // =========================================================================
    // white balance
    // =========================================================================

    #[test]
    fn kelvin_6600_is_near_white() {
        let [r, g, b] = kelvin_to_rgb(6600.0);
        assert!(r > 0.99);
        assert!(g > 0.9);
        assert!(b > 0.9);
    }

    #[test]
    fn same_white_points_give_unit_gains() {
        let wp = WhitePoint {
            kelvin: 6500.0,
            tint: 0.0,
        };
        let gains = white_balance_gains(&WhiteBalance {
            neutral: wp,
            target: wp,
        });
        for g in gains {
            assert!((g - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn higher_target_kelvin_warms() {
        let gains = white_balance_gains(&WhiteBalance {
            neutral: WhitePoint {
                kelvin: 6500.0,
                tint: 0.0,
            },
            target: WhitePoint {
                kelvin: 7200.0,
                tint: 100.0,
            },
        });
        assert!(gains[0] > 1.0, "red gain {:?}", gains);
        assert!(gains[2] < 1.0, "blue gain {:?}", gains);
        assert!((gains[1] - 0.8).abs() < 1e-6);
    }

    // =========================================================================
    // blur_sigma
    // =========================================================================

    #[test]
    fn blur_sigma_passes_positive_radius() {
        assert_eq!(blur_sigma(0.3), Some(0.3));
    }

    #[test]
    fn blur_sigma_rejects_invalid_radius() {
        assert_eq!(blur_sigma(0.0), None);
        assert_eq!(blur_sigma(-1.0), None);
        assert_eq!(blur_sigma(f32::NAN), None);
        assert_eq!(blur_sigma(f32::INFINITY), None);
    }
}
