// Frame compositor: paint the toolbar, logo, pointer ring and every stroke onto a frame.
// Visual order (back to front): buttons + labels, logo, yellow pointer ring, ink.
// Output depends only on the inputs, so the same state always paints the same pixels.

use crate::draw::{blit, draw_circle, draw_line, draw_text_5x7, fill_rect, text_width_5x7};
use crate::ledger::StrokeLedger;
use crate::pointer::PointerReading;
use crate::toolbar::{Toolbar, ToolbarAction};
use crate::types::{FrameBuffer, pack_rgb};
use serde::{Deserialize, Serialize};

/// One drawing color of the palette; its index is the color id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub name: String,
    pub rgb: [u8; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub stroke_thickness: u32,
    pub indicator_thickness: u32,
    pub indicator_color: [u8; 3],
    pub label_color: [u8; 3],
    pub clear_button_color: [u8; 3],
}

/// A fixed-size raster (the logo) pasted at a fixed spot every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub x: i32,
    pub y: i32,
    pub raster: FrameBuffer,
}

/// Everything the compositor reads for one frame.
pub struct Scene<'a> {
    pub toolbar: &'a Toolbar,
    pub palette: &'a [PaletteColor],
    pub style: &'a RenderStyle,
    pub overlay: Option<&'a Overlay>,
    pub reading: &'a PointerReading,
    pub ledger: &'a StrokeLedger,
}

pub fn compose(fb: &mut FrameBuffer, scene: &Scene<'_>) {
    draw_toolbar(fb, scene);

    if let Some(overlay) = scene.overlay {
        blit(fb, &overlay.raster, overlay.x, overlay.y);
    }

    if let PointerReading::At { position, radius, .. } = scene.reading {
        draw_circle(
            fb,
            position.x,
            position.y,
            *radius as i32,
            scene.style.indicator_thickness,
            pack_rgb(scene.style.indicator_color),
        );
    }

    for (color, track) in scene.ledger.tracks().iter().enumerate() {
        let Some(ink) = scene.palette.get(color) else { continue };
        let ink = pack_rgb(ink.rgb);
        for stroke in track.strokes() {
            for (a, b) in stroke.segments() {
                draw_line(fb, a.x, a.y, b.x, b.y, scene.style.stroke_thickness, ink);
            }
        }
    }
}

fn draw_toolbar(fb: &mut FrameBuffer, scene: &Scene<'_>) {
    let label_color = pack_rgb(scene.style.label_color);
    for button in scene.toolbar.buttons() {
        let fill = match button.action {
            ToolbarAction::Clear => scene.style.clear_button_color,
            ToolbarAction::SelectColor(c) => {
                scene.palette.get(c).map_or(scene.style.clear_button_color, |p| p.rgb)
            }
        };
        let r = button.rect;
        fill_rect(fb, r.x0, r.y0, r.x1, r.y1, pack_rgb(fill));

        // Largest scale (up to 2x) at which the label still fits inside the button.
        let inner_w = r.x1 - r.x0 + 1 - 4;
        let scale = if text_width_5x7(&button.label, 2) <= inner_w { 2 } else { 1 };
        let tx = r.x0 + (r.x1 - r.x0 + 1 - text_width_5x7(&button.label, scale)) / 2;
        let ty = r.y0 + (r.y1 - r.y0 + 1 - 7 * scale) / 2;
        draw_text_5x7(fb, tx, ty, &button.label, label_color, scale);
    }
}
