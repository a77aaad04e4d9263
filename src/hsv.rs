// RGB -> HSV in the common 8-bit layout: H in 0..=179 (degrees / 2), S and V in 0..=255.
// Marker thresholds are written in this layout, so a hue of 120 is pure blue.

use serde::{Deserialize, Serialize};

pub const HUE_MAX: u8 = 179;

/// Convert one pixel. Gray pixels (no chroma) get hue 0.
#[inline]
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let h_deg = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let h_deg = if h_deg < 0.0 { h_deg + 360.0 } else { h_deg };

    // 359.x degrees rounds up to 180, which is the same hue as 0.
    let mut h = (h_deg / 2.0).round() as u32;
    if h > HUE_MAX as u32 {
        h -= 180;
    }

    [h as u8, s.round() as u8, v.round() as u8]
}

/// Inclusive per-channel HSV window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| self.lower[i] <= hsv[i] && hsv[i] <= self.upper[i])
    }
}
