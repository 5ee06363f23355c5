//! How far an AI dart lands from where it was aimed.

use crate::config::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::model::Point;
use rand::Rng;
use std::f64::consts::TAU;

/// Spread at difficulty 10.
pub const MIN_RADIUS: f64 = 8.0;
/// Spread at difficulty 1, wider than the board itself.
pub const MAX_RADIUS: f64 = 120.0;

const EXPECTED_AVERAGES: [u32; 10] = [12, 18, 24, 28, 32, 38, 44, 50, 54, 58];
const EXPECTED_MPRS: [f64; 10] = [0.5, 0.8, 1.0, 1.3, 1.6, 2.0, 2.5, 3.0, 3.5, 4.2];

fn clamp(difficulty: u8) -> u8 {
    difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// Exponential interpolation from `MAX_RADIUS` down to `MIN_RADIUS`, so low
/// levels improve in big steps and high levels in fine ones.
pub fn accuracy_radius(difficulty: u8, global_multiplier: f64) -> f64 {
    let t = f64::from(MAX_DIFFICULTY - clamp(difficulty)) / 9.0;
    MIN_RADIUS * (MAX_RADIUS / MIN_RADIUS).powf(t) * global_multiplier
}

/// Uniform by area: the square root keeps hits from bunching at the centre.
pub fn sample_point_in_disc<R: Rng + ?Sized>(center: Point, radius: f64, rng: &mut R) -> Point {
    let r = radius * rng.gen::<f64>().sqrt();
    let theta = rng.gen::<f64>() * TAU;
    Point { x: center.x + r * theta.cos(), y: center.y + r * theta.sin() }
}

/// Three-dart average a level should roughly produce. Display only.
pub fn expected_average(difficulty: u8) -> u32 {
    EXPECTED_AVERAGES[usize::from(clamp(difficulty) - 1)]
}

/// Cricket marks per round a level should roughly produce. Display only.
pub fn expected_mpr(difficulty: u8) -> f64 {
    EXPECTED_MPRS[usize::from(clamp(difficulty) - 1)]
}

pub fn difficulty_description(difficulty: u8) -> &'static str {
    match difficulty {
        0..=2 => "Beginner",
        3..=4 => "Casual",
        5..=6 => "Club Player",
        7..=8 => "Advanced",
        9 => "Expert",
        _ => "Professional",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn radius_endpoints_and_clamping() {
        assert!((accuracy_radius(1, 1.0) - MAX_RADIUS).abs() < 1e-9);
        assert!((accuracy_radius(10, 1.0) - MIN_RADIUS).abs() < 1e-9);
        assert_eq!(accuracy_radius(0, 1.0), accuracy_radius(1, 1.0));
        assert_eq!(accuracy_radius(15, 1.0), accuracy_radius(10, 1.0));
        // level 5 is a middling club player
        let mid = accuracy_radius(5, 1.0);
        assert!(mid > 35.0 && mid < 40.0, "{mid}");
    }

    #[test]
    fn radius_scales_with_multiplier() {
        let base = accuracy_radius(6, 1.0);
        assert!((accuracy_radius(6, 2.0) - 2.0 * base).abs() < 1e-9);
        assert!((accuracy_radius(6, 0.5) - 0.5 * base).abs() < 1e-9);
    }

    #[test]
    fn descriptions_and_lookups() {
        assert_eq!(difficulty_description(1), "Beginner");
        assert_eq!(difficulty_description(4), "Casual");
        assert_eq!(difficulty_description(6), "Club Player");
        assert_eq!(difficulty_description(8), "Advanced");
        assert_eq!(difficulty_description(9), "Expert");
        assert_eq!(difficulty_description(10), "Professional");
        assert_eq!(expected_average(5), 32);
        assert_eq!(expected_average(42), 58);
        assert!((expected_mpr(1) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_radius_hits_the_center() {
        let mut rng = StdRng::seed_from_u64(9);
        let c = Point { x: 3.0, y: -4.0 };
        assert_eq!(sample_point_in_disc(c, 0.0, &mut rng), c);
    }
}
