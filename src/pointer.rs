// Pointer extractor: reduce the marker mask to one (position, area) reading per frame.
// Visual expectation: the yellow circle in the "Tracking" window hugs the biggest blob,
// and disappears when only small noise is left in the mask.

use crate::types::Point;
use image::GrayImage;
use imageproc::contours::{BorderType, Contour, find_contours};
use imageproc::geometry::contour_area;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Blobs whose enclosed area is not above this are treated as noise.
    pub min_area: f64,
}

/// What the tracker saw this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerReading {
    NoPointer,
    At {
        /// Center of the blob's minimum enclosing circle, truncated to whole pixels.
        position: Point,
        /// Area enclosed by the blob's outer contour.
        area: f64,
        /// Radius of the minimum enclosing circle (indicator only).
        radius: f32,
    },
}

impl PointerReading {
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerReading::NoPointer => None,
            PointerReading::At { position, .. } => Some(*position),
        }
    }
}

/// Find the biggest external blob and report where it is.
pub fn extract_pointer(mask: &GrayImage, min_area: f64) -> PointerReading {
    let contours = find_contours::<i32>(mask);

    // Largest outer, top-level contour; strict `>` keeps the first on ties.
    let mut best: Option<(&Contour<i32>, f64)> = None;
    for contour in contours
        .iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
    {
        let area = contour_area(&contour.points);
        if best.is_none_or(|(_, a)| area > a) {
            best = Some((contour, area));
        }
    }

    let Some((contour, area)) = best else {
        return PointerReading::NoPointer;
    };
    if area <= min_area {
        return PointerReading::NoPointer;
    }

    let circle = min_enclosing_circle(&contour.points);
    PointerReading::At {
        position: Point::new(circle.cx as i32, circle.cy as i32),
        area,
        radius: circle.r as f32,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    fn contains(&self, p: (f64, f64)) -> bool {
        let (dx, dy) = (p.0 - self.cx, p.1 - self.cy);
        (dx * dx + dy * dy).sqrt() <= self.r + 1e-7 * self.r.max(1.0)
    }

    fn from_two(a: (f64, f64), b: (f64, f64)) -> Self {
        let (cx, cy) = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
        let r = ((a.0 - cx).powi(2) + (a.1 - cy).powi(2)).sqrt();
        Self { cx, cy, r }
    }

    fn from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let (bx, by) = (b.0 - a.0, b.1 - a.1);
        let (cx, cy) = (c.0 - a.0, c.1 - a.1);
        let d = 2.0 * (bx * cy - by * cx);
        if d.abs() < 1e-12 {
            // Collinear: the widest pair spans the other point.
            let candidates = [Self::from_two(a, b), Self::from_two(a, c), Self::from_two(b, c)];
            return candidates
                .into_iter()
                .fold(candidates[0], |best, cand| if cand.r > best.r { cand } else { best });
        }
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        Self { cx: a.0 + ux, cy: a.1 + uy, r: (ux * ux + uy * uy).sqrt() }
    }
}

/// Smallest circle containing every point (Welzl, iterative form).
/// Points are shuffled with a fixed seed, so the same contour always gives the same circle.
pub fn min_enclosing_circle(points: &[imageproc::point::Point<i32>]) -> Circle {
    let mut pts: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    let Some(&first) = pts.first() else {
        return Circle { cx: 0.0, cy: 0.0, r: 0.0 };
    };

    let mut rng = Rng32::from_seed(0x9E37_79B9);
    for i in (1..pts.len()).rev() {
        let j = (rng.next_u32() as usize) % (i + 1);
        pts.swap(i, j);
    }

    let mut c = Circle { cx: first.0, cy: first.1, r: 0.0 };
    for i in 0..pts.len() {
        if c.contains(pts[i]) {
            continue;
        }
        c = Circle { cx: pts[i].0, cy: pts[i].1, r: 0.0 };
        for j in 0..i {
            if c.contains(pts[j]) {
                continue;
            }
            c = Circle::from_two(pts[i], pts[j]);
            for k in 0..j {
                if !c.contains(pts[k]) {
                    c = Circle::from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    c
}

/// Deterministic xorshift32, only used to decorrelate contour point order.
struct Rng32 {
    state: u32,
}

impl Rng32 {
    fn from_seed(seed: u32) -> Self {
        Self { state: seed | 1 }
    }

    #[inline]
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{disc_mask, paint_disc, rect_mask};
    use imageproc::point::Point as IPoint;

    #[test]
    fn all_zero_mask_has_no_pointer() {
        let mask = GrayImage::new(64, 48);
        assert_eq!(extract_pointer(&mask, 0.0), PointerReading::NoPointer);
    }

    #[test]
    fn small_blob_is_rejected_as_noise() {
        // Wide vs narrow synthetic blobs: only the policy matters, not the numbers.
        let narrow = disc_mask(200, 200, (100, 100), 5);
        let wide = disc_mask(200, 200, (100, 100), 40);

        let narrow_area = match extract_pointer(&narrow, 0.0) {
            PointerReading::At { area, .. } => area,
            PointerReading::NoPointer => panic!("narrow blob should be seen without a threshold"),
        };
        let threshold = narrow_area * 4.0;
        assert_eq!(extract_pointer(&narrow, threshold), PointerReading::NoPointer);
        assert!(matches!(extract_pointer(&wide, threshold), PointerReading::At { .. }));
    }

    #[test]
    fn area_equal_to_minimum_is_rejected() {
        // 40x40 pixel square: boundary polygon through pixel centers is 39x39.
        let mask = rect_mask(100, 100, 10, 10, 49, 49);
        let PointerReading::At { area, .. } = extract_pointer(&mask, 0.0) else {
            panic!("square should be detected");
        };
        assert_eq!(area, 39.0 * 39.0);
        assert_eq!(extract_pointer(&mask, area), PointerReading::NoPointer);
        assert!(matches!(extract_pointer(&mask, area - 1.0), PointerReading::At { .. }));
    }

    #[test]
    fn reading_never_reports_area_below_minimum() {
        for radius in [2, 6, 12, 25] {
            let mask = disc_mask(120, 120, (60, 60), radius);
            if let PointerReading::At { area, .. } = extract_pointer(&mask, 300.0) {
                assert!(area > 300.0, "radius {radius} gave area {area}");
            }
        }
    }

    #[test]
    fn largest_blob_wins() {
        let mut mask = disc_mask(300, 200, (60, 100), 15);
        paint_disc(&mut mask, (200, 100), 40);
        let reading = extract_pointer(&mask, 100.0);
        let Some(p) = reading.position() else { panic!("expected a pointer") };
        assert!((p.x - 200).abs() <= 1 && (p.y - 100).abs() <= 1, "{p:?}");
    }

    #[test]
    fn equal_blobs_pick_the_first_found() {
        let mut mask = rect_mask(200, 100, 20, 20, 49, 49);
        for y in 20..=49 {
            for x in 120..=149 {
                mask.put_pixel(x, y, image::Luma([255]));
            }
        }
        let p = extract_pointer(&mask, 10.0).position().expect("pointer");
        assert!(p.x < 100, "{p:?}");
    }

    #[test]
    fn enclosing_circle_of_square_goes_through_corners() {
        let mask = rect_mask(100, 100, 10, 10, 49, 49);
        let PointerReading::At { position, radius, .. } = extract_pointer(&mask, 0.0) else {
            panic!("square should be detected");
        };
        assert_eq!(position, Point::new(29, 29));
        let expected = (2.0f32).sqrt() * 19.5;
        assert!((radius - expected).abs() < 1e-3, "{radius} vs {expected}");
    }

    #[test]
    fn enclosing_circle_covers_every_point() {
        let pts: Vec<IPoint<i32>> = [(0, 0), (10, 3), (4, 9), (7, 7), (2, 5), (9, 9), (-3, 4)]
            .into_iter()
            .map(|(x, y)| IPoint::new(x, y))
            .collect();
        let c = min_enclosing_circle(&pts);
        for p in &pts {
            let d = ((p.x as f64 - c.cx).powi(2) + (p.y as f64 - c.cy).powi(2)).sqrt();
            assert!(d <= c.r + 1e-6);
        }
        assert_eq!(c, min_enclosing_circle(&pts));
    }

    #[test]
    fn collinear_points_use_the_widest_pair() {
        let pts = vec![IPoint::new(0, 0), IPoint::new(5, 0), IPoint::new(10, 0)];
        let c = min_enclosing_circle(&pts);
        assert!((c.cx - 5.0).abs() < 1e-9 && c.cy.abs() < 1e-9);
        assert!((c.r - 5.0).abs() < 1e-9);
    }

    #[test]
    fn shoelace_ignores_orientation() {
        let cw = [IPoint::new(0, 0), IPoint::new(0, 4), IPoint::new(3, 4), IPoint::new(3, 0)];
        let mut ccw = cw;
        ccw.reverse();
        assert_eq!(contour_area(&cw), 12.0);
        assert_eq!(contour_area(&ccw), 12.0);
        assert_eq!(contour_area(&cw[..2]), 0.0);
    }
}
