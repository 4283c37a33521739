//! RGB → HSV conversion for 8-bit pixels.
//!
//! Convention (matches OpenCV's 8-bit `COLOR_RGB2HSV`):
//!   H in half-degree units, 0–179 (a rounded 180 wraps to 0)
//!   S = 255 · (max − min) / max, 0 when max = 0
//!   V = max(R, G, B)
//!
//! Category thresholds are expressed in this same space.

use serde::{Deserialize, Serialize};

/// Hue upper limit in half-degree units.
pub const HUE_MAX: u8 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    #[inline]
    pub fn to_array(self) -> [u8; 3] {
        [self.h, self.s, self.v]
    }
}

/// Convert one RGB pixel to HSV.
///
/// Hue in degrees:
///   60 · (G − B) / Δ          if max = R
///   120 + 60 · (B − R) / Δ    if max = G
///   240 + 60 · (R − G) / Δ    if max = B
/// shifted into [0, 360), halved, and rounded. Grey pixels (Δ = 0) get H = 0.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = f64::from(max - min);

    let s = if max == 0 {
        0
    } else {
        (255.0 * delta / f64::from(max)).round() as u8
    };

    let h = if delta == 0.0 {
        0
    } else {
        let (rf, gf, bf) = (f64::from(r), f64::from(g), f64::from(b));
        let mut deg = if max == r {
            60.0 * (gf - bf) / delta
        } else if max == g {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        if deg < 0.0 {
            deg += 360.0;
        }
        let half = (deg / 2.0).round() as u8;
        if half >= HUE_MAX { 0 } else { half }
    };

    Hsv { h, s, v: max }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_land_on_expected_hues() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), Hsv::new(0, 255, 255));
        assert_eq!(rgb_to_hsv([0, 255, 0]), Hsv::new(60, 255, 255));
        assert_eq!(rgb_to_hsv([0, 0, 255]), Hsv::new(120, 255, 255));
    }

    #[test]
    fn secondaries_land_on_expected_hues() {
        assert_eq!(rgb_to_hsv([255, 255, 0]).h, 30);
        assert_eq!(rgb_to_hsv([0, 255, 255]).h, 90);
        assert_eq!(rgb_to_hsv([255, 0, 255]).h, 150);
    }

    #[test]
    fn greys_have_zero_hue_and_saturation() {
        for v in [0u8, 1, 127, 255] {
            assert_eq!(rgb_to_hsv([v, v, v]), Hsv::new(0, 0, v));
        }
    }

    #[test]
    fn saddle_brown_is_low_hue() {
        // max = R = 139, min = 19, Δ = 120; hue = 60·50/120 = 25° → 12.5 → 13.
        let hsv = rgb_to_hsv([139, 69, 19]);
        assert_eq!(hsv, Hsv::new(13, 220, 139));
    }

    #[test]
    fn near_red_negative_hue_wraps_below_180() {
        // Hue just under 360° rounds to 180 half-degrees and wraps to 0.
        let hsv = rgb_to_hsv([255, 0, 1]);
        assert_eq!(hsv.h, 0);
        let hsv = rgb_to_hsv([255, 0, 20]);
        assert!(hsv.h < HUE_MAX && hsv.h > 170, "got {}", hsv.h);
    }

    #[test]
    fn hue_never_reaches_limit() {
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(15) {
                for b in (0..=255u16).step_by(15) {
                    let hsv = rgb_to_hsv([r as u8, g as u8, b as u8]);
                    assert!(hsv.h < HUE_MAX);
                    assert_eq!(hsv.v, r.max(g).max(b) as u8);
                }
            }
        }
    }
}
