// Mask builder: which pixels look like the marker?
// Visual expectation: in the "Mask" window the marker shows up as one white blob on black,
// with camera speckle removed by the morphology pass.
use crate::hsv::{HsvRange, rgb_to_hsv};
use crate::types::{FrameBuffer, unpack_rgb};
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode, open};
use serde::{Deserialize, Serialize};

pub const MASK_ON: u8 = 255;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Inclusive HSV window the marker color must fall in.
    pub hsv: HsvRange,
    /// Side of the square structuring element (odd, 1 = no cleanup).
    pub kernel_size: u32,
}

/// Threshold + clean up one frame.
/// What you *see* afterward: a white blob where the marker is, black elsewhere.
pub fn build_mask(frame: &FrameBuffer, config: &MaskConfig) -> GrayImage {
    let raw = threshold_hsv(frame, &config.hsv);
    clean_mask(&raw, config.kernel_size)
}

/// 255 where the pixel's HSV falls inside `range`, 0 elsewhere.
pub fn threshold_hsv(frame: &FrameBuffer, range: &HsvRange) -> GrayImage {
    let mut mask = GrayImage::new(frame.width as u32, frame.height as u32);
    for (px, out) in frame.pixels.iter().zip(mask.pixels_mut()) {
        let hsv = rgb_to_hsv(unpack_rgb(*px));
        *out = Luma([if range.contains(hsv) { MASK_ON } else { 0 }]);
    }
    mask
}

/// Erode -> open -> dilate with a `kernel_size`-square element.
/// Erosion eats isolated speckle, opening removes what survived, dilation
/// grows the blob back to roughly its thresholded size.
pub fn clean_mask(mask: &GrayImage, kernel_size: u32) -> GrayImage {
    // LInf ball of radius k is a (2k+1)-square.
    let k = u8::try_from(kernel_size / 2).unwrap_or(u8::MAX);
    if k == 0 {
        return mask.clone();
    }
    let eroded = erode(mask, Norm::LInf, k);
    let opened = open(&eroded, Norm::LInf, k);
    dilate(&opened, Norm::LInf, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{BLUE_MARKER, disc_frame, lit_pixels};

    fn config() -> MaskConfig {
        MaskConfig {
            hsv: HsvRange { lower: [100, 150, 100], upper: [140, 255, 255] },
            kernel_size: 5,
        }
    }

    #[test]
    fn empty_scene_gives_all_zero_mask() {
        let frame = FrameBuffer::filled(64, 48, 0x00_20_20_20);
        let mask = build_mask(&frame, &config());
        assert_eq!(mask.dimensions(), (64, 48));
        assert_eq!(lit_pixels(&mask), 0);
    }

    #[test]
    fn marker_disc_survives_cleanup() {
        let frame = disc_frame(160, 120, (80, 60), 20, BLUE_MARKER, 0);
        let raw = threshold_hsv(&frame, &config().hsv);
        let cleaned = build_mask(&frame, &config());

        let before = lit_pixels(&raw);
        let after = lit_pixels(&cleaned);
        assert!(before > 1000);
        // Cleanup must not grow or shrink the blob materially.
        assert!(after * 10 >= before * 8, "{after} vs {before}");
        assert!(after * 10 <= before * 12, "{after} vs {before}");
        assert_eq!(cleaned.get_pixel(80, 60)[0], MASK_ON);
    }

    #[test]
    fn speckle_is_removed() {
        let mut frame = FrameBuffer::filled(40, 40, 0);
        // A lone marker-colored pixel and a 3x3 clump, both smaller than the kernel.
        frame.pixels[5 * 40 + 5] = BLUE_MARKER;
        for y in 20..23 {
            for x in 20..23 {
                frame.pixels[y * 40 + x] = BLUE_MARKER;
            }
        }
        assert_eq!(lit_pixels(&threshold_hsv(&frame, &config().hsv)), 10);
        assert_eq!(lit_pixels(&build_mask(&frame, &config())), 0);
    }

    #[test]
    fn kernel_of_one_is_identity() {
        let frame = disc_frame(40, 40, (20, 20), 3, BLUE_MARKER, 0);
        let raw = threshold_hsv(&frame, &config().hsv);
        assert_eq!(clean_mask(&raw, 1), raw);
    }

    #[test]
    fn off_color_marker_is_ignored() {
        // Pure red is outside a blue hue window.
        let frame = disc_frame(80, 80, (40, 40), 15, 0x00_FF_00_00, 0);
        assert_eq!(lit_pixels(&build_mask(&frame, &config())), 0);
    }
}
