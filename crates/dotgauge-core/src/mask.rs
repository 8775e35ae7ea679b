//! Red-mask extraction.
//!
//! A pixel belongs to the mask when its hue falls into either of two
//! configured bands at sufficient saturation and value. Two bands are needed
//! because red straddles the hue wraparound: the default covers [0, 10] and
//! [160, 180] on the 0-180 hue scale.

use serde::{Deserialize, Serialize};

use crate::image::{Mask, RgbFrameView};

/// One inclusive hue interval on the 0-180 scale.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HueBand {
    pub h_lo: u8,
    pub h_hi: u8,
}

/// Thresholds for red-mask extraction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RedMaskParams {
    /// Hue bands whose union defines "red".
    pub bands: [HueBand; 2],
    /// Minimal saturation (0-255) in either band.
    pub min_saturation: u8,
    /// Minimal value (0-255) in either band.
    pub min_value: u8,
}

impl Default for RedMaskParams {
    fn default() -> Self {
        Self {
            bands: [
                HueBand { h_lo: 0, h_hi: 10 },
                HueBand { h_lo: 160, h_hi: 180 },
            ],
            min_saturation: 100,
            min_value: 100,
        }
    }
}

/// Convert one 8-bit RGB pixel to HSV on OpenCV scales: H in 0-180,
/// S and V in 0-255.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let r = rgb[0] as f32;
    let g = rgb[1] as f32;
    let b = rgb[2] as f32;

    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = v - min;

    let s = if v > 0.0 { 255.0 * delta / v } else { 0.0 };

    let mut h = if delta == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / delta
    } else if v == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    [
        (h * 0.5).round() as u8,
        s.round().min(255.0) as u8,
        v.round().min(255.0) as u8,
    ]
}

/// Threshold a frame into the union of the two red hue bands.
///
/// Total for every input: an all-red or all-black frame yields a valid
/// (all-set or all-clear) mask. Pure function of the frame and params.
pub fn extract_red_mask(frame: &RgbFrameView<'_>, params: &RedMaskParams) -> Mask {
    let mut mask = Mask::new(frame.width, frame.height);

    for y in 0..frame.height {
        for x in 0..frame.width {
            let i = (y * frame.width + x) * 3;
            let rgb = [frame.data[i], frame.data[i + 1], frame.data[i + 2]];
            let [h, s, v] = rgb_to_hsv(rgb);

            if s < params.min_saturation || v < params.min_value {
                continue;
            }
            let in_band = params
                .bands
                .iter()
                .any(|band| h >= band.h_lo && h <= band.h_hi);
            if in_band {
                mask.set(x, y);
            }
        }
    }

    mask
}
