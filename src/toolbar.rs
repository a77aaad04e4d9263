// Toolbar: the fixed row of buttons along the top edge of the frame.
// Visual: gray "CLEAR ALL" plus one filled button per drawing color.

use crate::error::ConfigError;
use crate::types::Point;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarAction {
    Clear,
    SelectColor(usize),
}

/// Axis-aligned rectangle with inclusive pixel bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.x0 <= p.x && p.x <= self.x1 && self.y0 <= p.y && p.y <= self.y1
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    pub fn is_inverted(&self) -> bool {
        self.x0 > self.x1 || self.y0 > self.y1
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub rect: Rect,
    pub action: ToolbarAction,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toolbar {
    band_bottom: i32,
    buttons: Vec<Button>,
}

impl Toolbar {
    /// Check the layout once at startup; a bad layout never reaches the main loop.
    pub fn new(
        band_bottom: i32,
        buttons: Vec<Button>,
        palette_len: usize,
    ) -> Result<Self, ConfigError> {
        for (i, b) in buttons.iter().enumerate() {
            if b.rect.is_inverted() {
                return Err(ConfigError::InvertedButton { label: b.label.clone() });
            }
            if b.rect.y1 > band_bottom {
                return Err(ConfigError::ButtonOutsideBand {
                    label: b.label.clone(),
                    band_bottom,
                });
            }
            if let ToolbarAction::SelectColor(index) = b.action {
                if index >= palette_len {
                    return Err(ConfigError::UnknownColor {
                        label: b.label.clone(),
                        index,
                        len: palette_len,
                    });
                }
            }
            if let Some(other) = buttons[..i].iter().find(|o| o.rect.overlaps(&b.rect)) {
                return Err(ConfigError::OverlappingButtons {
                    first: other.label.clone(),
                    second: b.label.clone(),
                });
            }
        }
        Ok(Self { band_bottom, buttons })
    }

    /// Lowest row (inclusive) that belongs to the button band.
    pub fn band_bottom(&self) -> i32 {
        self.band_bottom
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    #[inline]
    pub fn in_band(&self, p: Point) -> bool {
        p.y <= self.band_bottom
    }

    /// Action under `p`, if any. Anything below the band is rejected before
    /// the buttons are looked at; gaps between buttons resolve to `None`.
    pub fn resolve(&self, p: Point) -> Option<ToolbarAction> {
        if !self.in_band(p) {
            return None;
        }
        self.buttons.iter().find(|b| b.rect.contains(p)).map(|b| b.action)
    }
}
