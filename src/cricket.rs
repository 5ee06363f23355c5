//! Cricket dart scoring across every player's marks and points.

use crate::model::{CricketScore, CricketVariant, PlayerId};
use crate::rules::is_cricket_number;
use crate::segment::Segment;
use std::collections::BTreeMap;
use tracing::debug;

pub type CricketScores = BTreeMap<PlayerId, CricketScore>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CricketOutcome {
    pub scores: CricketScores,
    pub won: bool,
}

pub fn initial_cricket_scores(player_ids: &[PlayerId]) -> CricketScores {
    player_ids.iter().map(|id| (id.clone(), CricketScore::default())).collect()
}

fn number_value(number: u8) -> u32 {
    number as u32
}

fn opponents_open(scores: &CricketScores, thrower: &str, number: u8, player_ids: &[PlayerId]) -> Vec<PlayerId> {
    player_ids
        .iter()
        .filter(|id| id.as_str() != thrower)
        .filter(|id| scores.get(id.as_str()).is_some_and(|s| !s.is_closed(number)))
        .cloned()
        .collect()
}

/// Apply one dart thrown by `thrower`. Misses, non-cricket numbers and unknown
/// throwers leave every score as it was.
pub fn apply_cricket_throw(
    scores: &CricketScores,
    thrower: &str,
    segment: Option<&Segment>,
    variant: CricketVariant,
    player_ids: &[PlayerId],
) -> CricketOutcome {
    let unchanged = || CricketOutcome { scores: scores.clone(), won: false };
    let Some(seg) = segment else { return unchanged() };
    let number = seg.number();
    if !is_cricket_number(number) {
        return unchanged();
    }
    let Some(current) = scores.get(thrower).and_then(|s| s.mark(number)).map(|m| m.marks) else {
        return unchanged();
    };

    let hits = seg.multiplier() as u8;
    let was_closed = current >= 3;
    let new_marks = (current + hits).min(3);
    let scoring_hits = if was_closed {
        hits
    } else {
        (current + hits).saturating_sub(3)
    };

    let mut next = scores.clone();
    if let Some(mark) = next.get_mut(thrower).and_then(|s| s.marks.iter_mut().find(|m| m.number == number)) {
        mark.marks = new_marks;
    }

    if scoring_hits > 0 {
        let points = scoring_hits as u32 * number_value(number);
        let open = opponents_open(&next, thrower, number, player_ids);
        match variant {
            CricketVariant::Cutthroat => {
                for id in &open {
                    if let Some(opp) = next.get_mut(id) {
                        opp.points += points;
                    }
                }
            }
            CricketVariant::Standard => {
                if new_marks >= 3 && !open.is_empty() {
                    if let Some(own) = next.get_mut(thrower) {
                        own.points += points;
                    }
                }
            }
            CricketVariant::NoScore => {}
        }
        debug!(number, scoring_hits, ?variant, opponents_open = open.len(), "cricket points");
    }

    let won = has_won(&next, thrower, variant, player_ids);
    CricketOutcome { scores: next, won }
}

fn has_won(scores: &CricketScores, thrower: &str, variant: CricketVariant, player_ids: &[PlayerId]) -> bool {
    let Some(own) = scores.get(thrower) else { return false };
    if !own.all_closed() {
        return false;
    }
    let mut others = player_ids
        .iter()
        .filter(|id| id.as_str() != thrower)
        .filter_map(|id| scores.get(id.as_str()));
    match variant {
        CricketVariant::Cutthroat => others.all(|s| own.points <= s.points),
        CricketVariant::Standard | CricketVariant::NoScore => others.all(|s| own.points >= s.points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{d, t, BULL, OUTER_BULL};

    fn ids() -> Vec<PlayerId> {
        vec!["a".to_string(), "b".to_string()]
    }

    fn throw(scores: &CricketScores, who: &str, seg: Segment, variant: CricketVariant) -> CricketOutcome {
        apply_cricket_throw(scores, who, Some(&seg), variant, &ids())
    }

    fn close_all_but(scores: &mut CricketScores, who: &str, skip: Option<u8>) {
        let score = scores.get_mut(who).unwrap();
        for m in score.marks.iter_mut() {
            if Some(m.number) != skip {
                m.marks = 3;
            }
        }
    }

    #[test]
    fn miss_and_non_cricket_numbers_are_noops() {
        let start = initial_cricket_scores(&ids());
        let out = apply_cricket_throw(&start, "a", None, CricketVariant::Standard, &ids());
        assert_eq!(out.scores, start);
        let out = throw(&start, "a", t(14), CricketVariant::Standard);
        assert_eq!(out.scores, start);
        assert!(!out.won);
    }

    #[test]
    fn marks_cap_at_three() {
        let start = initial_cricket_scores(&ids());
        let out = throw(&start, "a", d(20), CricketVariant::NoScore);
        assert_eq!(out.scores["a"].mark(20).unwrap().marks, 2);
        let out = throw(&out.scores, "a", t(20), CricketVariant::NoScore);
        let mark = out.scores["a"].mark(20).unwrap();
        assert_eq!(mark.marks, 3);
        assert!(mark.closed());
    }

    #[test]
    fn bull_rings_count_one_and_two_marks() {
        let start = initial_cricket_scores(&ids());
        let out = throw(&start, "a", OUTER_BULL, CricketVariant::Standard);
        assert_eq!(out.scores["a"].mark(25).unwrap().marks, 1);
        let out = throw(&out.scores, "a", BULL, CricketVariant::Standard);
        assert_eq!(out.scores["a"].mark(25).unwrap().marks, 3);
        assert_eq!(out.scores["a"].points, 0);
        let out = throw(&out.scores, "a", BULL, CricketVariant::Standard);
        assert_eq!(out.scores["a"].points, 50);
    }

    #[test]
    fn standard_overflow_scores_for_thrower() {
        let start = initial_cricket_scores(&ids());
        let out = throw(&start, "a", d(20), CricketVariant::Standard);
        // two marks + triple: closes with two extra hits
        let out = throw(&out.scores, "a", t(20), CricketVariant::Standard);
        assert_eq!(out.scores["a"].points, 40);
        assert_eq!(out.scores["b"].points, 0);
    }

    #[test]
    fn standard_stops_scoring_once_everyone_closed() {
        let mut scores = initial_cricket_scores(&ids());
        scores.get_mut("a").unwrap().marks[0].marks = 3;
        scores.get_mut("b").unwrap().marks[0].marks = 3;
        let out = throw(&scores, "a", t(20), CricketVariant::Standard);
        assert_eq!(out.scores["a"].points, 0);
    }

    #[test]
    fn cutthroat_scores_against_open_opponents() {
        let ids3: Vec<PlayerId> = vec!["a".into(), "b".into(), "c".into()];
        let mut scores = initial_cricket_scores(&ids3);
        scores.get_mut("a").unwrap().marks[1].marks = 3; // 19
        scores.get_mut("c").unwrap().marks[1].marks = 3;
        let out = apply_cricket_throw(&scores, "a", Some(&t(19)), CricketVariant::Cutthroat, &ids3);
        assert_eq!(out.scores["a"].points, 0);
        assert_eq!(out.scores["b"].points, 57);
        assert_eq!(out.scores["c"].points, 0);
    }

    #[test]
    fn no_score_never_changes_points() {
        let mut scores = initial_cricket_scores(&ids());
        scores.get_mut("a").unwrap().marks[0].marks = 3;
        let out = throw(&scores, "a", t(20), CricketVariant::NoScore);
        assert_eq!(out.scores["a"].points, 0);
        assert_eq!(out.scores["b"].points, 0);
    }

    #[test]
    fn standard_win_needs_all_closed_and_lead() {
        let mut scores = initial_cricket_scores(&ids());
        close_all_but(&mut scores, "a", Some(15));
        scores.get_mut("b").unwrap().points = 30;
        let out = throw(&scores, "a", t(15), CricketVariant::Standard);
        assert!(!out.won, "closed but behind on points");

        scores.get_mut("b").unwrap().points = 0;
        let out = throw(&scores, "a", t(15), CricketVariant::Standard);
        assert!(out.won);
    }

    #[test]
    fn cutthroat_win_requires_lowest_points() {
        let mut scores = initial_cricket_scores(&ids());
        close_all_but(&mut scores, "a", Some(25));
        scores.get_mut("a").unwrap().points = 80;
        scores.get_mut("b").unwrap().points = 20;
        let out = throw(&scores, "a", BULL, CricketVariant::Cutthroat);
        let out = throw(&out.scores, "a", OUTER_BULL, CricketVariant::Cutthroat);
        assert!(out.scores["a"].all_closed());
        assert!(!out.won, "highest points cannot win cutthroat");

        scores.get_mut("a").unwrap().points = 10;
        let out = throw(&scores, "a", BULL, CricketVariant::Cutthroat);
        let out = throw(&out.scores, "a", OUTER_BULL, CricketVariant::Cutthroat);
        assert!(out.won);
    }

    #[test]
    fn no_score_wins_on_closing_everything() {
        let mut scores = initial_cricket_scores(&ids());
        close_all_but(&mut scores, "b", Some(16));
        let out = throw(&scores, "b", t(16), CricketVariant::NoScore);
        assert!(out.won);
    }
}
