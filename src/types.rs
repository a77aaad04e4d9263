// Core pixel + geometry types shared by the camera, the tracker and the compositor.

use image::{GrayImage, RgbImage};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Solid frame of one color.
    #[cfg(test)]
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    /// Pack an RGB image into 0x00RRGGBB, optionally mirrored left<->right.
    pub fn from_rgb_image(img: &RgbImage, mirror: bool) -> Self {
        let (w, h) = img.dimensions();
        Self::from_rgb_bytes(w as usize, h as usize, img.as_raw(), mirror)
    }

    /// Pack tightly-packed RGB8 rows into 0x00RRGGBB.
    /// Visual: with `mirror` on, moving your hand right moves the pointer right.
    pub fn from_rgb_bytes(w: usize, h: usize, rgb: &[u8], mirror: bool) -> Self {
        let mut pixels = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                let sx = if mirror { w - 1 - x } else { x };
                let i = (y * w + sx) * 3;
                pixels.push(pack_rgb([rgb[i], rgb[i + 1], rgb[i + 2]]));
            }
        }
        Self { width: w, height: h, pixels }
    }

    /// Binary mask as a black/white frame, for the "Mask" window.
    pub fn from_mask(mask: &GrayImage) -> Self {
        let (w, h) = mask.dimensions();
        let pixels = mask
            .pixels()
            .map(|p| if p[0] > 0 { 0x00_FF_FF_FF } else { 0 })
            .collect();
        Self { width: w as usize, height: h as usize, pixels }
    }

    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width + x as usize])
    }
}

/// Pixel coordinate in display-frame space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[inline]
pub const fn pack_rgb(rgb: [u8; 3]) -> u32 {
    ((rgb[0] as u32) << 16) | ((rgb[1] as u32) << 8) | (rgb[2] as u32)
}

#[inline]
pub const fn unpack_rgb(px: u32) -> [u8; 3] {
    [((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8]
}
