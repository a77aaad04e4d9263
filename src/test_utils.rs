// Synthetic frames and masks for the vision and session tests.

use crate::types::FrameBuffer;
use image::{GrayImage, Luma};

/// Saturated blue, the marker color every test config looks for.
pub(crate) const BLUE_MARKER: u32 = 0x00_00_00_FF;

/// Frame with a filled disc of `fg` on a `bg` background.
pub(crate) fn disc_frame(
    w: usize,
    h: usize,
    center: (i32, i32),
    radius: i32,
    fg: u32,
    bg: u32,
) -> FrameBuffer {
    let mut fb = FrameBuffer::filled(w, h, bg);
    let r2 = radius * radius;
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let (dx, dy) = (x - center.0, y - center.1);
            if dx * dx + dy * dy <= r2 {
                fb.pixels[y as usize * w + x as usize] = fg;
            }
        }
    }
    fb
}

/// Binary mask with a filled disc.
pub(crate) fn disc_mask(w: u32, h: u32, center: (i32, i32), radius: i32) -> GrayImage {
    let mut mask = GrayImage::new(w, h);
    paint_disc(&mut mask, center, radius);
    mask
}

pub(crate) fn paint_disc(mask: &mut GrayImage, center: (i32, i32), radius: i32) {
    let r2 = radius * radius;
    let (w, h) = mask.dimensions();
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let (dx, dy) = (x - center.0, y - center.1);
            if dx * dx + dy * dy <= r2 {
                mask.put_pixel(x as u32, y as u32, Luma([255]));
            }
        }
    }
}

/// Binary mask with a filled axis-aligned rectangle, inclusive bounds.
pub(crate) fn rect_mask(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
    let mut mask = GrayImage::new(w, h);
    for y in y0..=y1 {
        for x in x0..=x1 {
            mask.put_pixel(x, y, Luma([255]));
        }
    }
    mask
}

pub(crate) fn lit_pixels(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] > 0).count()
}
