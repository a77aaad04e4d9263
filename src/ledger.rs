// Stroke ledger: every line the user has drawn, grouped per palette color.
//
// A stroke is one continuous pen-down run. The ledger decides when a new run
// starts: after the marker was lost, after a color switch, or after a clear.
// It never stores empty strokes, so idle frames cost nothing.

use crate::types::Point;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Optional caps on how much history each color keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLimits {
    /// Oldest strokes are dropped beyond this many per color.
    pub max_strokes_per_color: Option<usize>,
    /// Oldest points are dropped beyond this many per stroke.
    pub max_points_per_stroke: Option<usize>,
}

impl LedgerLimits {
    #[cfg(test)]
    pub const UNBOUNDED: Self = Self { max_strokes_per_color: None, max_points_per_stroke: None };
}

/// Ordered points of one continuous run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stroke {
    points: VecDeque<Point>,
}

impl Stroke {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    /// Consecutive point pairs; a stroke of 0 or 1 points has none.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.iter().zip(self.points.iter().skip(1)).map(|(a, b)| (*a, *b))
    }

    fn push(&mut self, p: Point, cap: Option<usize>) {
        if let Some(cap) = cap {
            while self.points.len() >= cap.max(1) {
                self.points.pop_front();
            }
        }
        self.points.push_back(p);
    }
}

/// All strokes of one palette color, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorTrack {
    strokes: VecDeque<Stroke>,
}

impl ColorTrack {
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.strokes.iter()
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    fn start_stroke(&mut self, cap: Option<usize>) {
        if let Some(cap) = cap {
            while self.strokes.len() >= cap.max(1) {
                self.strokes.pop_front();
            }
        }
        self.strokes.push_back(Stroke::default());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeLedger {
    tracks: Vec<ColorTrack>,
    active: usize,
    /// Set when the next accepted point must open a fresh stroke.
    break_pending: bool,
    limits: LedgerLimits,
}

impl StrokeLedger {
    /// One empty track per palette color; the first color is active.
    pub fn new(palette_len: usize, limits: LedgerLimits) -> Self {
        Self {
            tracks: vec![ColorTrack::default(); palette_len],
            active: 0,
            break_pending: true,
            limits,
        }
    }

    pub fn active_color(&self) -> usize {
        self.active
    }

    pub fn tracks(&self) -> &[ColorTrack] {
        &self.tracks
    }

    pub fn track(&self, color: usize) -> Option<&ColorTrack> {
        self.tracks.get(color)
    }

    pub fn total_points(&self) -> usize {
        self.tracks.iter().map(ColorTrack::point_count).sum()
    }

    /// Marker vanished: the current stroke is finished.
    /// Repeated calls while the marker stays away are no-ops.
    pub fn on_pointer_lost(&mut self) {
        self.break_pending = true;
    }

    /// Switch the color that receives new points. The new stroke is opened by
    /// the next point, so hovering a color button without drawing leaves no trace.
    pub fn on_color_change(&mut self, color: usize) {
        if color >= self.tracks.len() {
            warn!("ignoring color {color}: palette has {} colors", self.tracks.len());
            return;
        }
        self.active = color;
        self.break_pending = true;
    }

    /// Wipe every color's history. The active color stays selected.
    pub fn on_clear(&mut self) {
        for track in &mut self.tracks {
            track.strokes.clear();
        }
        self.break_pending = true;
    }

    /// Record one drawing point for the active color.
    pub fn on_point(&mut self, p: Point) {
        let limits = self.limits;
        let Some(track) = self.tracks.get_mut(self.active) else {
            return;
        };
        if self.break_pending || track.strokes.is_empty() {
            track.start_stroke(limits.max_strokes_per_color);
            self.break_pending = false;
            debug!("stroke {} started for color {}", track.strokes.len(), self.active);
        }
        if let Some(stroke) = track.strokes.back_mut() {
            stroke.push(p, limits.max_points_per_stroke);
        }
    }
}
