// Startup configuration: toolbar layout, palette, marker thresholds, caps.
// Read once from an optional JSON file; anything the file leaves out keeps its default.

use crate::compositor::{PaletteColor, RenderStyle};
use crate::error::ConfigError;
use crate::hsv::{HUE_MAX, HsvRange};
use crate::ledger::LedgerLimits;
use crate::pointer::TrackerConfig;
use crate::toolbar::{Button, Rect, Toolbar, ToolbarAction};
use crate::vision::MaskConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub index: u32,
    pub width: u32,
    pub height: u32,
    /// Flip frames left<->right so the view behaves like a mirror.
    pub mirror: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolbarConfig {
    /// Lowest row (inclusive) of the button band.
    pub band_bottom: i32,
    pub buttons: Vec<Button>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub path: PathBuf,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl OverlayConfig {
    /// The logo slot of the default layout: 100x100 at the right end of the band.
    pub fn default_slot(path: PathBuf) -> Self {
        Self { path, x: 510, y: 1, width: 100, height: 100 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub mask: MaskConfig,
    pub tracker: TrackerConfig,
    pub toolbar: ToolbarConfig,
    pub palette: Vec<PaletteColor>,
    pub render: RenderStyle,
    pub ledger: LedgerLimits,
    pub overlay: Option<OverlayConfig>,
}

fn color(name: &str, rgb: [u8; 3]) -> PaletteColor {
    PaletteColor { name: name.to_string(), rgb }
}

fn button(label: &str, x0: i32, x1: i32, action: ToolbarAction) -> Button {
    Button { label: label.to_string(), rect: Rect::new(x0, 1, x1, 65), action }
}

impl Default for AppConfig {
    /// 640x480 mirrored webcam, a blue-ish marker, CLEAR ALL + four color buttons.
    /// A logo, when configured, is drawn over the YELLOW button.
    fn default() -> Self {
        Self {
            camera: CameraConfig { index: 0, width: 640, height: 480, mirror: true },
            mask: MaskConfig {
                hsv: HsvRange { lower: [64, 72, 49], upper: [153, 255, 255] },
                kernel_size: 5,
            },
            tracker: TrackerConfig { min_area: 1000.0 },
            toolbar: ToolbarConfig {
                band_bottom: 65,
                buttons: vec![
                    button("CLEAR ALL", 40, 140, ToolbarAction::Clear),
                    button("BLUE", 160, 255, ToolbarAction::SelectColor(0)),
                    button("GREEN", 275, 370, ToolbarAction::SelectColor(1)),
                    button("RED", 390, 485, ToolbarAction::SelectColor(2)),
                    button("YELLOW", 505, 600, ToolbarAction::SelectColor(3)),
                ],
            },
            palette: vec![
                color("Blue", [0, 0, 255]),
                color("Green", [0, 255, 0]),
                color("Red", [255, 0, 0]),
                color("Yellow", [255, 255, 0]),
            ],
            render: RenderStyle {
                stroke_thickness: 2,
                indicator_thickness: 2,
                indicator_color: [255, 255, 0],
                label_color: [255, 255, 255],
                clear_button_color: [122, 122, 122],
            },
            ledger: LedgerLimits {
                max_strokes_per_color: Some(512),
                max_points_per_stroke: Some(1024),
            },
            overlay: None,
        }
    }
}

impl AppConfig {
    /// Defaults, or the JSON file at `path` layered over them.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject anything that would make button or tracking behavior undefined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }

        let k = self.mask.kernel_size;
        if k == 0 || k % 2 == 0 {
            return Err(ConfigError::BadKernel(k));
        }
        let HsvRange { lower, upper } = self.mask.hsv;
        for hue in [lower[0], upper[0]] {
            if hue > HUE_MAX {
                return Err(ConfigError::HueOutOfRange(hue));
            }
        }
        if (0..3).any(|i| lower[i] > upper[i]) {
            return Err(ConfigError::InvertedHsvRange { lower, upper });
        }

        let min_area = self.tracker.min_area;
        if !min_area.is_finite() || min_area < 0.0 {
            return Err(ConfigError::BadMinArea(min_area));
        }

        if self.render.stroke_thickness == 0 || self.render.indicator_thickness == 0 {
            return Err(ConfigError::ZeroThickness);
        }
        if self.ledger.max_strokes_per_color == Some(0) {
            return Err(ConfigError::ZeroCap("max_strokes_per_color"));
        }
        if self.ledger.max_points_per_stroke == Some(0) {
            return Err(ConfigError::ZeroCap("max_points_per_stroke"));
        }

        self.build_toolbar().map(|_| ())
    }

    /// Validated toolbar for this layout and palette.
    pub fn build_toolbar(&self) -> Result<Toolbar, ConfigError> {
        Toolbar::new(self.toolbar.band_bottom, self.toolbar.buttons.clone(), self.palette.len())
    }

    /// The overlay must land fully inside the frame the camera actually delivers.
    pub fn check_overlay_fits(&self, frame_w: u32, frame_h: u32) -> Result<(), ConfigError> {
        let Some(o) = &self.overlay else {
            return Ok(());
        };
        let fits = o.x >= 0
            && o.y >= 0
            && o.x as u64 + o.width as u64 <= frame_w as u64
            && o.y as u64 + o.height as u64 <= frame_h as u64;
        if fits {
            Ok(())
        } else {
            Err(ConfigError::OverlayOutOfFrame {
                x: o.x,
                y: o.y,
                width: o.width,
                height: o.height,
                frame_w,
                frame_h,
            })
        }
    }
}
