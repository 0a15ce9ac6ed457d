//! RGB to HSV conversion on the 8-bit scale.
//!
//! Hue is stored as degrees halved (`0..=179`) so it fits a byte; saturation
//! and value use the full `0..=255` range. The arithmetic is 12-bit fixed
//! point with rounding, which reproduces the integers produced by the usual
//! 8-bit computer-vision conversion, so band thresholds written for that
//! convention carry over unchanged.

use image::Rgb;
use plant_core::Hsv;

const HSV_SHIFT: i32 = 12;
const HALF: i32 = 1 << (HSV_SHIFT - 1);
const HUE_RANGE: i32 = 180;

/// `round((255 << 12) / v)`, zero for `v == 0`
const SATURATION_SCALE: [i32; 256] = build_saturation_scale();

/// `round((180 << 12) / (6 * diff))`, zero for `diff == 0`
const HUE_SCALE: [i32; 256] = build_hue_scale();

const fn rounded_div(numerator: i32, denominator: i32) -> i32 {
    (2 * numerator + denominator) / (2 * denominator)
}

const fn build_saturation_scale() -> [i32; 256] {
    let mut table = [0i32; 256];
    let mut v = 1;
    while v < 256 {
        table[v] = rounded_div(255 << HSV_SHIFT, v as i32);
        v += 1;
    }
    table
}

const fn build_hue_scale() -> [i32; 256] {
    let mut table = [0i32; 256];
    let mut diff = 1;
    while diff < 256 {
        table[diff] = rounded_div(HUE_RANGE << HSV_SHIFT, 6 * diff as i32);
        diff += 1;
    }
    table
}

/// Converts one RGB triple to 8-bit HSV.
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let v = r.max(g).max(b);
    let diff = v - r.min(g).min(b);

    let s = (diff * SATURATION_SCALE[v as usize] + HALF) >> HSV_SHIFT;

    // Sector offset by whichever channel holds the maximum; red wins ties.
    let sector = if v == r {
        g - b
    } else if v == g {
        b - r + 2 * diff
    } else {
        r - g + 4 * diff
    };
    let mut h = (sector * HUE_SCALE[diff as usize] + HALF) >> HSV_SHIFT;
    if h < 0 {
        h += HUE_RANGE;
    }

    Hsv::new(h as u8, s as u8, v as u8)
}

/// Converts an `image` pixel.
#[inline]
pub fn pixel_to_hsv(pixel: &Rgb<u8>) -> Hsv {
    let [r, g, b] = pixel.0;
    rgb_to_hsv(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(rgb_to_hsv(255, 0, 0), Hsv::new(0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), Hsv::new(60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), Hsv::new(120, 255, 255));
    }

    #[test]
    fn test_secondary_hues() {
        assert_eq!(rgb_to_hsv(255, 255, 0).h, 30);
        assert_eq!(rgb_to_hsv(0, 255, 255).h, 90);
        assert_eq!(rgb_to_hsv(255, 0, 255).h, 150);
    }

    #[test]
    fn test_greys_have_no_saturation() {
        for level in [0u8, 1, 64, 128, 200, 255] {
            let hsv = rgb_to_hsv(level, level, level);
            assert_eq!(hsv.s, 0);
            assert_eq!(hsv.h, 0);
            assert_eq!(hsv.v, level);
        }
    }

    #[test]
    fn test_brown_pixel() {
        // A typical dry-leaf brown
        assert_eq!(rgb_to_hsv(150, 100, 50), Hsv::new(15, 170, 150));
    }

    #[test]
    fn test_hue_stays_below_180() {
        for r in (0..=255u16).step_by(5) {
            for g in (0..=255u16).step_by(5) {
                for b in (0..=255u16).step_by(5) {
                    let hsv = rgb_to_hsv(r as u8, g as u8, b as u8);
                    assert!(hsv.h < 180, "hue {} for ({r},{g},{b})", hsv.h);
                }
            }
        }
    }

    #[test]
    fn test_pixel_wrapper_matches() {
        let pixel = Rgb([34u8, 139, 34]);
        assert_eq!(pixel_to_hsv(&pixel), rgb_to_hsv(34, 139, 34));
    }

    #[test]
    fn test_scale_tables() {
        assert_eq!(SATURATION_SCALE[0], 0);
        assert_eq!(SATURATION_SCALE[255], 4096);
        assert_eq!(HUE_SCALE[0], 0);
        assert_eq!(HUE_SCALE[255], 482);
    }
}
