//! Checkout solver: finishing sequences that bring an X01 score to exactly
//! zero on a double or the inner bull.

use crate::error::{EngineError, Result};
use crate::segment::{all_segments, d, s, t, Segment, BULL, BULL_NUMBER};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

pub const MIN_CHECKOUT: u32 = 2;
pub const MAX_CHECKOUT: u32 = 170;

/// Finishing doubles players favour, most popular first.
const PREFERRED_FINISHES: [u8; 10] = [20, 16, 8, 10, 12, 18, 14, 6, 4, 2];

/// Standard checkout for every finishable score. 169, 168, 166, 165, 163, 162
/// and 159 have no three-dart finish.
const CHECKOUT_TABLE: &[(u32, &[Segment])] = &[
    (170, &[t(20), t(20), BULL]),
    (167, &[t(20), t(19), BULL]),
    (164, &[t(20), t(18), BULL]),
    (161, &[t(20), t(17), BULL]),
    (160, &[t(20), t(20), d(20)]),
    (158, &[t(20), t(20), d(19)]),
    (157, &[t(20), t(19), d(20)]),
    (156, &[t(20), t(20), d(18)]),
    (155, &[t(20), t(19), d(19)]),
    (154, &[t(20), t(18), d(20)]),
    (153, &[t(20), t(19), d(18)]),
    (152, &[t(20), t(20), d(16)]),
    (151, &[t(20), t(17), d(20)]),
    (150, &[t(20), t(18), d(18)]),
    (149, &[t(20), t(19), d(16)]),
    (148, &[t(20), t(20), d(14)]),
    (147, &[t(20), t(17), d(18)]),
    (146, &[t(20), t(18), d(16)]),
    (145, &[t(20), t(19), d(14)]),
    (144, &[t(20), t(20), d(12)]),
    (143, &[t(20), t(17), d(16)]),
    (142, &[t(20), t(14), d(20)]),
    (141, &[t(20), t(19), d(12)]),
    (140, &[t(20), t(20), d(10)]),
    (139, &[t(20), t(13), d(20)]),
    (138, &[t(20), t(18), d(12)]),
    (137, &[t(20), t(19), d(10)]),
    (136, &[t(20), t(20), d(8)]),
    (135, &[t(20), t(17), d(12)]),
    (134, &[t(20), t(14), d(16)]),
    (133, &[t(20), t(19), d(8)]),
    (132, &[t(20), t(16), d(12)]),
    (131, &[t(20), t(13), d(16)]),
    (130, &[t(20), t(18), d(8)]),
    (129, &[t(19), t(16), d(12)]),
    (128, &[t(18), t(14), d(16)]),
    (127, &[t(20), t(17), d(8)]),
    (126, &[t(19), t(19), d(6)]),
    (125, &[t(18), t(13), d(16)]),
    (124, &[t(20), t(16), d(8)]),
    (123, &[t(19), t(16), d(9)]),
    (122, &[t(18), t(18), d(7)]),
    (121, &[t(20), t(11), d(14)]),
    (120, &[t(20), s(20), d(20)]),
    (119, &[t(19), t(12), d(13)]),
    (118, &[t(20), s(18), d(20)]),
    (117, &[t(20), s(17), d(20)]),
    (116, &[t(20), s(16), d(20)]),
    (115, &[t(20), s(15), d(20)]),
    (114, &[t(20), s(14), d(20)]),
    (113, &[t(20), s(13), d(20)]),
    (112, &[t(20), s(12), d(20)]),
    (111, &[t(20), s(19), d(16)]),
    (110, &[t(20), s(10), d(20)]),
    (109, &[t(20), s(9), d(20)]),
    (108, &[t(20), s(16), d(16)]),
    (107, &[t(20), s(15), d(16)]),
    (106, &[t(20), s(14), d(16)]),
    (105, &[t(20), s(13), d(16)]),
    (104, &[t(20), s(12), d(16)]),
    (103, &[t(20), s(11), d(16)]),
    (102, &[t(20), s(10), d(16)]),
    (101, &[t(20), s(9), d(16)]),
    (100, &[t(20), d(20)]),
    (99, &[t(19), s(10), d(16)]),
    (98, &[t(20), d(19)]),
    (97, &[t(19), d(20)]),
    (96, &[t(20), d(18)]),
    (95, &[t(19), d(19)]),
    (94, &[t(18), d(20)]),
    (93, &[t(19), d(18)]),
    (92, &[t(20), d(16)]),
    (91, &[t(17), d(20)]),
    (90, &[t(18), d(18)]),
    (89, &[t(19), d(16)]),
    (88, &[t(20), d(14)]),
    (87, &[t(17), d(18)]),
    (86, &[t(18), d(16)]),
    (85, &[t(19), d(14)]),
    (84, &[t(20), d(12)]),
    (83, &[t(17), d(16)]),
    (82, &[t(14), d(20)]),
    (81, &[t(19), d(12)]),
    (80, &[t(20), d(10)]),
    (79, &[t(13), d(20)]),
    (78, &[t(18), d(12)]),
    (77, &[t(19), d(10)]),
    (76, &[t(20), d(8)]),
    (75, &[t(17), d(12)]),
    (74, &[t(14), d(16)]),
    (73, &[t(19), d(8)]),
    (72, &[t(16), d(12)]),
    (71, &[t(13), d(16)]),
    (70, &[t(18), d(8)]),
    (69, &[t(19), d(6)]),
    (68, &[t(20), d(4)]),
    (67, &[t(17), d(8)]),
    (66, &[t(10), d(18)]),
    (65, &[t(19), d(4)]),
    (64, &[t(16), d(8)]),
    (63, &[t(13), d(12)]),
    (62, &[t(10), d(16)]),
    (61, &[t(15), d(8)]),
    (60, &[s(20), d(20)]),
    (59, &[s(19), d(20)]),
    (58, &[s(18), d(20)]),
    (57, &[s(17), d(20)]),
    (56, &[s(16), d(20)]),
    (55, &[s(15), d(20)]),
    (54, &[s(14), d(20)]),
    (53, &[s(13), d(20)]),
    (52, &[s(12), d(20)]),
    (51, &[s(11), d(20)]),
    (50, &[BULL]),
    (49, &[s(9), d(20)]),
    (48, &[s(16), d(16)]),
    (47, &[s(15), d(16)]),
    (46, &[s(14), d(16)]),
    (45, &[s(13), d(16)]),
    (44, &[s(12), d(16)]),
    (43, &[s(11), d(16)]),
    (42, &[s(10), d(16)]),
    (41, &[s(9), d(16)]),
    (40, &[d(20)]),
    (39, &[s(7), d(16)]),
    (38, &[d(19)]),
    (37, &[s(5), d(16)]),
    (36, &[d(18)]),
    (35, &[s(3), d(16)]),
    (34, &[d(17)]),
    (33, &[s(1), d(16)]),
    (32, &[d(16)]),
    (31, &[s(7), d(12)]),
    (30, &[d(15)]),
    (29, &[s(13), d(8)]),
    (28, &[d(14)]),
    (27, &[s(11), d(8)]),
    (26, &[d(13)]),
    (25, &[s(9), d(8)]),
    (24, &[d(12)]),
    (23, &[s(7), d(8)]),
    (22, &[d(11)]),
    (21, &[s(5), d(8)]),
    (20, &[d(10)]),
    (19, &[s(3), d(8)]),
    (18, &[d(9)]),
    (17, &[s(1), d(8)]),
    (16, &[d(8)]),
    (15, &[s(7), d(4)]),
    (14, &[d(7)]),
    (13, &[s(5), d(4)]),
    (12, &[d(6)]),
    (11, &[s(3), d(4)]),
    (10, &[d(5)]),
    (9, &[s(1), d(4)]),
    (8, &[d(4)]),
    (7, &[s(3), d(2)]),
    (6, &[d(3)]),
    (5, &[s(1), d(2)]),
    (4, &[d(2)]),
    (3, &[s(1), d(1)]),
    (2, &[d(1)]),
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutPath {
    pub score: u32,
    pub darts: Vec<Segment>,
    pub possible: bool,
}

impl CheckoutPath {
    fn found(score: u32, darts: Vec<Segment>) -> Self {
        CheckoutPath { score, darts, possible: true }
    }

    fn impossible(score: u32) -> Self {
        CheckoutPath { score, darts: Vec::new(), possible: false }
    }

    pub fn total(&self) -> u32 {
        self.darts.iter().map(Segment::points).sum()
    }
}

impl fmt::Display for CheckoutPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.possible || self.darts.is_empty() {
            return write!(f, "No checkout available");
        }
        let labels: Vec<String> = self.darts.iter().map(Segment::checkout_label).collect();
        write!(f, "{}", labels.join(" → "))
    }
}

fn check_darts_left(darts_left: u8) -> Result<()> {
    if (1..=3).contains(&darts_left) {
        Ok(())
    } else {
        Err(EngineError::DartsLeftOutOfRange(darts_left))
    }
}

fn finishing_segment(preferred: u8) -> Result<Segment> {
    match preferred {
        1..=20 => Ok(d(preferred)),
        BULL_NUMBER => Ok(BULL),
        other => Err(EngineError::InvalidPreferredDouble(other)),
    }
}

fn table_path(score: u32) -> Option<&'static [Segment]> {
    CHECKOUT_TABLE.iter().find(|(entry, _)| *entry == score).map(|(_, darts)| *darts)
}

/// Easiest segment worth exactly `points`: singles before bulls before
/// doubles before triples.
fn best_setup(catalogue: &[Segment], points: u32) -> Option<Segment> {
    catalogue
        .iter()
        .filter(|seg| seg.points() == points)
        .min_by_key(|seg| seg.ring().setup_rank())
        .copied()
}

/// Setup darts (at most `darts_left - 1`) that leave exactly `finish`.
fn path_ending_on(catalogue: &[Segment], score: u32, finish: Segment, darts_left: u8) -> Option<Vec<Segment>> {
    if score == finish.points() {
        return Some(vec![finish]);
    }
    let remaining = score.checked_sub(finish.points()).filter(|r| *r > 0)?;
    if darts_left >= 2 {
        if let Some(setup) = best_setup(catalogue, remaining) {
            return Some(vec![setup, finish]);
        }
    }
    if darts_left >= 3 {
        for first in catalogue.iter().filter(|seg| seg.points() < remaining) {
            if let Some(second) = best_setup(catalogue, remaining - first.points()) {
                return Some(vec![*first, second, finish]);
            }
        }
    }
    None
}

fn search(catalogue: &[Segment], score: u32, darts_left: u8) -> Option<Vec<Segment>> {
    let mut finishers: Vec<Segment> = catalogue.iter().copied().filter(Segment::is_finisher).collect();
    finishers.sort_by(|a, b| b.points().cmp(&a.points()));

    if let Some(finish) = finishers.iter().find(|f| f.points() == score) {
        return Some(vec![*finish]);
    }
    if darts_left >= 2 {
        for finish in finishers.iter().filter(|f| f.points() < score) {
            if let Some(setup) = best_setup(catalogue, score - finish.points()) {
                return Some(vec![setup, *finish]);
            }
        }
    }
    if darts_left >= 3 {
        for finish in finishers.iter().filter(|f| f.points() < score) {
            let remaining = score - finish.points();
            for first in catalogue.iter().filter(|seg| seg.points() < remaining) {
                if let Some(second) = best_setup(catalogue, remaining - first.points()) {
                    return Some(vec![*first, second, *finish]);
                }
            }
        }
    }
    None
}

/// Compute a finishing path for `score` within `darts_left` darts.
///
/// A preferred double wins over the standard table whenever a path ending on
/// it exists. `Err` means the caller passed arguments no game can produce;
/// an unreachable finish is `Ok` with `possible == false`.
pub fn compute_checkout(score: u32, preferred_double: Option<u8>, darts_left: u8) -> Result<CheckoutPath> {
    if !(MIN_CHECKOUT..=MAX_CHECKOUT).contains(&score) {
        return Err(EngineError::ScoreOutOfRange(score));
    }
    check_darts_left(darts_left)?;
    let catalogue = all_segments();

    if let Some(preferred) = preferred_double {
        let finish = finishing_segment(preferred)?;
        if score >= finish.points() {
            if let Some(darts) = path_ending_on(&catalogue, score, finish, darts_left) {
                trace!(score, preferred, "checkout on preferred double");
                return Ok(CheckoutPath::found(score, darts));
            }
        }
    }

    if let Some(darts) = table_path(score).filter(|path| path.len() <= darts_left as usize) {
        return Ok(CheckoutPath::found(score, darts.to_vec()));
    }

    Ok(match search(&catalogue, score, darts_left) {
        Some(darts) => CheckoutPath::found(score, darts),
        None => CheckoutPath::impossible(score),
    })
}

/// `false` for anything outside the solver's domain rather than an error:
/// strategy code tries arbitrary remainders.
pub fn is_checkable(score: u32, darts_left: u8) -> bool {
    compute_checkout(score, None, darts_left).is_ok_and(|path| path.possible)
}

fn finish_rank(double: u8) -> (usize, std::cmp::Reverse<u8>) {
    let common = PREFERRED_FINISHES.iter().position(|&p| p == double).unwrap_or(PREFERRED_FINISHES.len());
    (common, std::cmp::Reverse(double))
}

/// Every double 1..=20 some path within `darts_left` can finish on, most
/// popular finishes first.
pub fn valid_checkout_doubles(score: u32, darts_left: u8) -> Vec<u8> {
    if !(MIN_CHECKOUT..=MAX_CHECKOUT).contains(&score) || check_darts_left(darts_left).is_err() {
        return Vec::new();
    }
    let catalogue = all_segments();
    let mut doubles: Vec<u8> = (1..=20u8)
        .filter(|&n| path_ending_on(&catalogue, score, d(n), darts_left).is_some())
        .collect();
    doubles.sort_by_key(|&n| finish_rank(n));
    doubles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{Ring, OUTER_BULL};

    #[test]
    fn table_entries_add_up_and_finish_on_a_double() {
        for (score, path) in CHECKOUT_TABLE {
            let total: u32 = path.iter().map(Segment::points).sum();
            assert_eq!(total, *score, "table entry {score}");
            assert!(path.last().unwrap().is_finisher(), "table entry {score}");
            assert!(path.len() <= 3);
        }
    }

    #[test]
    fn literal_checkouts() {
        assert_eq!(compute_checkout(170, None, 3).unwrap().darts, vec![t(20), t(20), BULL]);
        assert_eq!(compute_checkout(40, None, 1).unwrap().darts, vec![d(20)]);
        assert_eq!(compute_checkout(100, None, 2).unwrap().darts, vec![t(20), d(20)]);
        assert_eq!(compute_checkout(50, None, 1).unwrap().darts, vec![BULL]);
    }

    #[test]
    fn bogey_numbers_are_impossible() {
        for score in [169, 168, 166, 165, 163, 162, 159] {
            let path = compute_checkout(score, None, 3).unwrap();
            assert!(!path.possible, "{score}");
            assert!(path.darts.is_empty());
        }
    }

    #[test]
    fn falls_back_to_search_when_table_path_is_too_long() {
        // table says 20, D20; one dart cannot do it
        assert!(!compute_checkout(60, None, 1).unwrap().possible);
        // table says 9, D16 for 41; with one dart nothing works either
        assert!(!is_checkable(41, 1));
        // 100 in one dart is impossible
        assert!(!compute_checkout(100, None, 1).unwrap().possible);
    }

    #[test]
    fn preferred_double_takes_precedence() {
        let path = compute_checkout(100, Some(16), 3).unwrap();
        assert!(path.possible);
        assert_eq!(path.darts.last(), Some(&d(16)));
        assert_eq!(path.total(), 100);

        // 40 could go D20 directly; preferring D10 gives a single 20 setup
        let path = compute_checkout(40, Some(10), 2).unwrap();
        assert_eq!(path.darts, vec![s(20), d(10)]);

        let path = compute_checkout(50, Some(25), 1).unwrap();
        assert_eq!(path.darts, vec![BULL]);
    }

    #[test]
    fn preferred_double_too_big_uses_table() {
        let path = compute_checkout(32, Some(20), 3).unwrap();
        assert_eq!(path.darts, vec![d(16)]);
    }

    #[test]
    fn setup_prefers_singles_over_multiplied_rings() {
        // 10 left for the setup: single 10 rather than D5
        let path = compute_checkout(36, Some(13), 2).unwrap();
        assert_eq!(path.darts, vec![s(10), d(13)]);
        // 25 left: the outer bull is the only way
        let path = compute_checkout(75, Some(25), 2).unwrap();
        assert_eq!(path.darts, vec![OUTER_BULL, BULL]);
    }

    #[test]
    fn contract_violations_are_errors() {
        assert!(matches!(compute_checkout(1, None, 3), Err(EngineError::ScoreOutOfRange(1))));
        assert!(matches!(compute_checkout(171, None, 3), Err(EngineError::ScoreOutOfRange(171))));
        assert!(matches!(compute_checkout(40, None, 0), Err(EngineError::DartsLeftOutOfRange(0))));
        assert!(matches!(compute_checkout(40, None, 4), Err(EngineError::DartsLeftOutOfRange(4))));
        assert!(matches!(compute_checkout(40, Some(21), 3), Err(EngineError::InvalidPreferredDouble(21))));
        assert!(!is_checkable(171, 3));
        assert!(!is_checkable(1, 3));
    }

    #[test]
    fn valid_doubles_sorted_by_popularity() {
        let doubles = valid_checkout_doubles(40, 1);
        assert_eq!(doubles, vec![20]);

        let doubles = valid_checkout_doubles(40, 2);
        assert_eq!(&doubles[..4], &[20, 16, 8, 10]);
        // common finishes first, then the rest high to low
        let tail_start = doubles.iter().position(|&n| !PREFERRED_FINISHES.contains(&n)).unwrap();
        assert!(doubles[tail_start..].windows(2).all(|w| w[0] > w[1]));
        assert!(!doubles.contains(&0));
        assert!(valid_checkout_doubles(180, 3).is_empty());
    }

    #[test]
    fn formats_paths() {
        assert_eq!(compute_checkout(170, None, 3).unwrap().to_string(), "T20 → T20 → Bull");
        assert_eq!(compute_checkout(169, None, 3).unwrap().to_string(), "No checkout available");
    }

    #[test]
    fn ring_helper_is_consistent() {
        assert!(Ring::InnerBull.is_finisher());
        assert!(!Ring::OuterBull.is_finisher());
    }
}
