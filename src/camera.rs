// Opens the webcam and converts frames into a buffer the tracker and the window can use.
// Visual expectation: when main.rs calls `next_frame()`, you get a
// Vec<u32> where each pixel is 0x00RRGGBB, already mirrored if configured.

use crate::config::CameraConfig;
use crate::error::Error;
use crate::types::FrameBuffer;
use log::info;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
    mirror: bool,
}

impl CameraCapture {
    /// Open the configured device at a target resolution (falls back if not exact).
    /// On success, nothing is shown on screen yet; we just hold an open stream.
    pub fn open(config: &CameraConfig) -> Result<Self, Error> {
        let idx = CameraIndex::Index(config.index);

        let fmt = CameraFormat::new(
            Resolution::new(config.width, config.height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );

        // Ask for RGB frames, as close as possible to the requested format.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // This fails if no device exists at that index.
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        info!(
            "camera {} streaming at {}x{} (requested {}x{})",
            config.index,
            actual.width(),
            actual.height(),
            config.width,
            config.height
        );

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
            mirror: config.mirror,
        })
    }

    /// Grab one frame (blocks until the camera has a new one).
    /// What you’ll see: after main.rs pushes this buffer to the window,
    /// the live camera image updates by one frame.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        // Decode to an ImageBuffer<Rgb<u8>, Vec<u8>> (handles various raw formats safely).
        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        // Go through the raw bytes: nokhwa may link a different `image` release than we do.
        let (w, h) = rgb_img.dimensions();
        Ok(FrameBuffer::from_rgb_bytes(w as usize, h as usize, rgb_img.as_raw(), self.mirror))
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
