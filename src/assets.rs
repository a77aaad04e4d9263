// Loads the logo overlay once at startup.
// Visual: the picture shows up in its slot at the top-right of every frame.

use crate::compositor::Overlay;
use crate::config::OverlayConfig;
use crate::error::Error;
use crate::types::FrameBuffer;
use image::imageops::{self, FilterType};
use log::info;

pub fn load_overlay(config: &OverlayConfig) -> Result<Overlay, Error> {
    let img = image::open(&config.path)
        .map_err(|e| Error::Asset(format!("open {}: {e}", config.path.display())))?;
    let overlay = overlay_from_image(&img.to_rgb8(), config);
    info!(
        "overlay {} loaded as {}x{} at ({}, {})",
        config.path.display(),
        config.width,
        config.height,
        config.x,
        config.y
    );
    Ok(overlay)
}

/// Resize to the configured slot; aspect ratio is not preserved.
pub fn overlay_from_image(img: &image::RgbImage, config: &OverlayConfig) -> Overlay {
    let resized = imageops::resize(img, config.width, config.height, FilterType::Triangle);
    Overlay { x: config.x, y: config.y, raster: FrameBuffer::from_rgb_image(&resized, false) }
}
