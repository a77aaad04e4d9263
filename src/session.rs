// One drawing session: owns the active color + stroke history and runs the per-frame cycle.
//
// Per frame: mask -> pointer reading -> (toolbar action | drawing point | stroke break) -> render.
// Nothing here blocks; camera reads and window updates happen in main.rs.

use crate::compositor::{Overlay, PaletteColor, RenderStyle, Scene, compose};
use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::ledger::StrokeLedger;
use crate::pointer::{PointerReading, extract_pointer};
use crate::toolbar::{Toolbar, ToolbarAction};
use crate::types::FrameBuffer;
use crate::vision::{MaskConfig, build_mask};
use image::GrayImage;
use log::{debug, info};

/// Everything one cycle hands back to the display side.
pub struct CycleOutput {
    pub frame: FrameBuffer,
    pub mask: GrayImage,
    pub reading: PointerReading,
    pub action: Option<ToolbarAction>,
}

pub struct Session {
    mask: MaskConfig,
    min_area: f64,
    toolbar: Toolbar,
    palette: Vec<PaletteColor>,
    style: RenderStyle,
    overlay: Option<Overlay>,
    ledger: StrokeLedger,
    tracking: bool,
}

impl Session {
    /// Validate the configuration and set up one empty track per palette color.
    pub fn new(config: &AppConfig, overlay: Option<Overlay>) -> Result<Self, ConfigError> {
        config.validate()?;
        let toolbar = config.build_toolbar()?;
        Ok(Self {
            mask: config.mask,
            min_area: config.tracker.min_area,
            toolbar,
            palette: config.palette.clone(),
            style: config.render,
            overlay,
            ledger: StrokeLedger::new(config.palette.len(), config.ledger),
            tracking: false,
        })
    }

    pub fn ledger(&self) -> &StrokeLedger {
        &self.ledger
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    /// Run one full cycle on a camera frame.
    pub fn step(&mut self, frame: &FrameBuffer) -> CycleOutput {
        let mask = build_mask(frame, &self.mask);
        let reading = extract_pointer(&mask, self.min_area);
        let action = self.apply_reading(&reading);
        let frame = self.render(frame, &reading);
        CycleOutput { frame, mask, reading, action }
    }

    /// Feed one reading into the state machine. Returns the toolbar action it
    /// triggered, if any.
    pub fn apply_reading(&mut self, reading: &PointerReading) -> Option<ToolbarAction> {
        let PointerReading::At { position, area, .. } = *reading else {
            if self.tracking {
                debug!("pointer lost");
                self.tracking = false;
            }
            self.ledger.on_pointer_lost();
            return None;
        };
        if !self.tracking {
            debug!("pointer acquired at ({}, {}), blob area {area:.0}", position.x, position.y);
            self.tracking = true;
        }

        // The band is reserved for buttons: nothing in it is ever drawn.
        if self.toolbar.in_band(position) {
            let action = self.toolbar.resolve(position);
            if let Some(action) = action {
                self.apply_action(action);
            }
            return action;
        }

        self.ledger.on_point(position);
        None
    }

    pub fn apply_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::Clear => {
                if self.ledger.total_points() > 0 {
                    info!("canvas cleared");
                }
                self.ledger.on_clear();
            }
            ToolbarAction::SelectColor(c) => {
                if c != self.ledger.active_color() {
                    let name = self.palette.get(c).map_or("?", |p| p.name.as_str());
                    info!("color changed to {name}");
                }
                self.ledger.on_color_change(c);
            }
        }
    }

    /// Paint the current state over a copy of `frame`.
    pub fn render(&self, frame: &FrameBuffer, reading: &PointerReading) -> FrameBuffer {
        let mut out = frame.clone();
        let scene = Scene {
            toolbar: &self.toolbar,
            palette: &self.palette,
            style: &self.style,
            overlay: self.overlay.as_ref(),
            reading,
            ledger: &self.ledger,
        };
        compose(&mut out, &scene);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hsv::HsvRange;
    use crate::pointer::TrackerConfig;
    use crate::test_utils::{BLUE_MARKER, disc_frame};
    use crate::toolbar::{Button, Rect};
    use crate::types::Point;

    const BLUE: usize = 0;
    const GREEN: usize = 1;
    const RED: usize = 2;

    fn config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.mask = MaskConfig {
            hsv: HsvRange { lower: [100, 150, 100], upper: [140, 255, 255] },
            kernel_size: 5,
        };
        cfg.tracker = TrackerConfig { min_area: 400.0 };
        cfg.palette = vec![
            PaletteColor { name: "Blue".into(), rgb: [0, 0, 255] },
            PaletteColor { name: "Green".into(), rgb: [0, 255, 0] },
            PaletteColor { name: "Red".into(), rgb: [255, 0, 0] },
        ];
        cfg.toolbar.band_bottom = 65;
        cfg.toolbar.buttons = vec![
            Button { label: "CLEAR ALL".into(), rect: Rect::new(40, 1, 140, 65), action: ToolbarAction::Clear },
            Button { label: "BLUE".into(), rect: Rect::new(160, 1, 255, 65), action: ToolbarAction::SelectColor(BLUE) },
            Button { label: "GREEN".into(), rect: Rect::new(275, 1, 370, 65), action: ToolbarAction::SelectColor(GREEN) },
            Button { label: "RED".into(), rect: Rect::new(390, 1, 485, 65), action: ToolbarAction::SelectColor(RED) },
        ];
        cfg.overlay = None;
        cfg
    }

    fn session() -> Session {
        Session::new(&config(), None).expect("valid config")
    }

    fn at(x: i32, y: i32) -> PointerReading {
        PointerReading::At { position: Point::new(x, y), area: 1500.0, radius: 20.0 }
    }

    fn strokes(s: &Session, color: usize) -> Vec<Vec<(i32, i32)>> {
        s.ledger()
            .track(color)
            .expect("palette color")
            .strokes()
            .map(|st| st.points().map(|p| (p.x, p.y)).collect())
            .collect()
    }

    #[test]
    fn gap_splits_blue_track_into_two_strokes() {
        let mut s = session();
        s.apply_reading(&at(50, 100));
        s.apply_reading(&PointerReading::NoPointer);
        s.apply_reading(&at(60, 110));
        assert_eq!(strokes(&s, BLUE), vec![vec![(50, 100)], vec![(60, 110)]]);
    }

    #[test]
    fn clear_button_empties_every_track() {
        let mut s = session();
        s.apply_reading(&at(50, 100));
        s.apply_reading(&at(300, 30));
        s.apply_reading(&at(300, 200));
        assert_eq!(s.ledger().active_color(), GREEN);

        let action = s.apply_reading(&at(90, 30));
        assert_eq!(action, Some(ToolbarAction::Clear));
        assert!(s.ledger().tracks().iter().all(|t| t.is_empty()));
        assert_eq!(s.ledger().active_color(), GREEN);
    }

    #[test]
    fn color_hit_starts_a_new_stroke_without_drop() {
        let mut s = session();
        s.apply_reading(&at(400, 30)); // RED
        s.apply_reading(&at(400, 200));
        s.apply_reading(&at(410, 210));
        // Back up to RED without ever losing the marker, then down again.
        s.apply_reading(&at(420, 30));
        s.apply_reading(&at(430, 220));
        assert_eq!(strokes(&s, RED), vec![vec![(400, 200), (410, 210)], vec![(430, 220)]]);
    }

    #[test]
    fn band_readings_are_never_drawn() {
        let mut s = session();
        s.apply_reading(&at(150, 30)); // gap between buttons
        s.apply_reading(&at(600, 10)); // right of every button
        s.apply_reading(&at(90, 65)); // on the band edge
        assert_eq!(s.ledger().total_points(), 0);
    }

    #[test]
    fn step_tracks_a_synthetic_marker() {
        let mut s = session();
        let frame = disc_frame(640, 480, (320, 240), 25, BLUE_MARKER, 0);
        let out = s.step(&frame);

        let p = out.reading.position().expect("marker should be found");
        assert!((p.x - 320).abs() <= 2 && (p.y - 240).abs() <= 2, "{p:?}");
        assert_eq!(out.action, None);
        assert_eq!(out.mask.dimensions(), (640, 480));
        assert_eq!((out.frame.width, out.frame.height), (640, 480));
        assert_eq!(s.ledger().total_points(), 1);
    }

    #[test]
    fn step_on_empty_scene_breaks_the_stroke() {
        let mut s = session();
        let marker = disc_frame(640, 480, (320, 240), 25, BLUE_MARKER, 0);
        let empty = FrameBuffer::filled(640, 480, 0);
        s.step(&marker);
        let out = s.step(&empty);
        assert_eq!(out.reading, PointerReading::NoPointer);
        s.step(&marker);
        assert_eq!(s.ledger().track(BLUE).map(|t| t.stroke_count()), Some(2));
    }

    #[test]
    fn step_on_toolbar_marker_switches_color() {
        let mut s = session();
        // Marker centered on the GREEN button.
        let frame = disc_frame(640, 480, (322, 33), 25, BLUE_MARKER, 0);
        let out = s.step(&frame);
        assert_eq!(out.action, Some(ToolbarAction::SelectColor(GREEN)));
        assert_eq!(s.ledger().active_color(), GREEN);
        assert_eq!(s.ledger().total_points(), 0);
    }

    #[test]
    fn default_layout_selects_yellow_under_the_logo() {
        let mut s = Session::new(&AppConfig::default(), None).expect("default config");
        assert_eq!(s.apply_reading(&at(550, 30)), Some(ToolbarAction::SelectColor(3)));
        assert_eq!(s.ledger().active_color(), 3);
    }

    #[test]
    fn rendering_does_not_change_state() {
        let mut s = session();
        s.apply_reading(&at(100, 200));
        s.apply_reading(&at(150, 250));
        let frame = FrameBuffer::filled(640, 480, 0);
        let reading = at(150, 250);
        assert_eq!(s.render(&frame, &reading), s.render(&frame, &reading));
    }

    #[test]
    fn bad_config_fails_fast() {
        let mut cfg = config();
        cfg.palette.clear();
        assert!(matches!(Session::new(&cfg, None), Err(ConfigError::EmptyPalette)));
    }
}
