//! Board geometry: point to segment and segment to aim point.
//!
//! Coordinates are board units centred on the bull with `y` pointing down,
//! so 20 sits at negative `y`.

use crate::model::Point;
use crate::segment::{Ring, Segment, BULL, OUTER_BULL};

/// Board numbers clockwise from the top.
pub const BOARD_NUMBERS: [u8; 20] = [20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5];

const SECTOR_DEGREES: f64 = 360.0 / 20.0;

/// Ring boundaries, measured from the centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardRadii {
    pub inner_bull: f64,
    pub outer_bull: f64,
    pub triple_inner: f64,
    pub triple_outer: f64,
    pub double_inner: f64,
    pub double_outer: f64,
}

impl Default for BoardRadii {
    /// Trebles and doubles are drawn wider than regulation so they are easy
    /// to tap; humans and the AI aim at the same board.
    fn default() -> Self {
        BoardRadii {
            inner_bull: 3.5,
            outer_bull: 8.5,
            triple_inner: 38.0,
            triple_outer: 48.0,
            double_inner: 80.0,
            double_outer: 100.0,
        }
    }
}

pub trait BoardGeometry {
    /// `None` when the point is off the board.
    fn segment_at(&self, point: Point) -> Option<Segment>;

    /// Where a player aims to hit `segment`.
    fn segment_center(&self, segment: &Segment) -> Point;
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StandardBoard {
    pub radii: BoardRadii,
}

impl StandardBoard {
    fn sector_index(number: u8) -> Option<usize> {
        BOARD_NUMBERS.iter().position(|&n| n == number)
    }

    /// Angle of a sector's centre line in degrees, screen orientation.
    fn sector_mid_angle(index: usize) -> f64 {
        -90.0 + index as f64 * SECTOR_DEGREES
    }
}

fn polar(radius: f64, degrees: f64) -> Point {
    let rad = degrees.to_radians();
    Point { x: radius * rad.cos(), y: radius * rad.sin() }
}

impl BoardGeometry for StandardBoard {
    fn segment_at(&self, point: Point) -> Option<Segment> {
        let r = &self.radii;
        let distance = point.x.hypot(point.y);
        if distance > r.double_outer {
            return None;
        }
        if distance <= r.inner_bull {
            return Some(BULL);
        }
        if distance <= r.outer_bull {
            return Some(OUTER_BULL);
        }

        let from_top = (point.y.atan2(point.x).to_degrees() + 90.0 + 360.0) % 360.0;
        let index = (((from_top + SECTOR_DEGREES / 2.0) % 360.0) / SECTOR_DEGREES) as usize;
        let number = BOARD_NUMBERS[index.min(BOARD_NUMBERS.len() - 1)];

        let ring = if distance <= r.triple_inner {
            Ring::Single
        } else if distance <= r.triple_outer {
            Ring::Triple
        } else if distance <= r.double_inner {
            Ring::Single
        } else {
            Ring::Double
        };
        Some(Segment::new(number, ring))
    }

    fn segment_center(&self, segment: &Segment) -> Point {
        let r = &self.radii;
        let Some(index) = Self::sector_index(segment.number()) else {
            return Point { x: 0.0, y: 0.0 };
        };
        let radius = match segment.ring() {
            Ring::InnerBull | Ring::OuterBull => return Point { x: 0.0, y: 0.0 },
            Ring::Double => (r.double_inner + r.double_outer) / 2.0,
            Ring::Triple => (r.triple_inner + r.triple_outer) / 2.0,
            Ring::Single => (r.outer_bull + r.triple_inner) / 2.0,
        };
        polar(radius, Self::sector_mid_angle(index))
    }
}
