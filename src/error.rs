// Error types for the whole app.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Asset error: {0}")]
    Asset(String), // Loading the overlay image failed
    #[error(transparent)]
    Config(#[from] ConfigError), // Startup configuration is unusable
}

/// Malformed configuration. Always fatal at startup.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("could not read config {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("could not parse config: {0}")]
    Parse(String),
    #[error("palette is empty")]
    EmptyPalette,
    #[error("button {label:?} has inverted bounds")]
    InvertedButton { label: String },
    #[error("button {label:?} extends below the toolbar band (y <= {band_bottom})")]
    ButtonOutsideBand { label: String, band_bottom: i32 },
    #[error("buttons {first:?} and {second:?} overlap")]
    OverlappingButtons { first: String, second: String },
    #[error("button {label:?} selects color {index} but the palette has {len} colors")]
    UnknownColor { label: String, index: usize, len: usize },
    #[error("morphology kernel size must be odd and >= 1, got {0}")]
    BadKernel(u32),
    #[error("hue bound {0} is above 179")]
    HueOutOfRange(u8),
    #[error("lower HSV bound {lower:?} exceeds upper bound {upper:?}")]
    InvertedHsvRange { lower: [u8; 3], upper: [u8; 3] },
    #[error("minimum contour area must be finite and >= 0, got {0}")]
    BadMinArea(f64),
    #[error("stroke thickness must be >= 1")]
    ZeroThickness,
    #[error("{0} cap must be >= 1 when set")]
    ZeroCap(&'static str),
    #[error("overlay {width}x{height} at ({x},{y}) does not fit in a {frame_w}x{frame_h} frame")]
    OverlayOutOfFrame {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        frame_w: u32,
        frame_h: u32,
    },
}
