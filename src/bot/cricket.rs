use crate::model::{CricketScore, CricketVariant, GameState};
use crate::rules::cricket_variant;
use crate::segment::{t, Segment, BULL, BULL_NUMBER};
use rand::Rng;

/// A number the thrower has closed and at least one opponent has not.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoringOpportunity {
    pub number: u8,
    pub opponents_open: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClosingPriority {
    pub number: u8,
    pub my_marks: u8,
    pub opponent_marks: u8,
    pub priority: u32,
}

/// The thrower's view of a cricket leg.
#[derive(Clone, Debug, PartialEq)]
pub struct CricketAnalysis {
    pub cutthroat: bool,
    /// Positive is good for the thrower; in cutthroat that means fewer points.
    pub point_differential: i64,
    pub closed: Vec<u8>,
    pub open: Vec<u8>,
    /// Highest number first.
    pub scoring: Vec<ScoringOpportunity>,
    /// Highest priority first.
    pub closing: Vec<ClosingPriority>,
    pub winning: bool,
}

fn aim_at(number: u8) -> Segment {
    if number == BULL_NUMBER { BULL } else { t(number) }
}

pub fn analyze(state: &GameState, player_id: &str) -> Option<CricketAnalysis> {
    let mine = state.current_leg().scores.cricket(player_id)?;
    let opponents: Vec<&CricketScore> = state
        .players
        .iter()
        .filter(|p| p.id != player_id)
        .filter_map(|p| state.current_leg().scores.cricket(&p.id))
        .collect();
    let cutthroat = cricket_variant(&state.rules) == CricketVariant::Cutthroat;

    let my_points = i64::from(mine.points);
    let max_opp = opponents.iter().map(|s| i64::from(s.points)).max().unwrap_or(0);
    let min_opp = opponents.iter().map(|s| i64::from(s.points)).min();
    let point_differential = if cutthroat { min_opp.unwrap_or(i64::MAX) - my_points } else { my_points - max_opp };

    let (closed, open): (Vec<u8>, Vec<u8>) = mine.marks.iter().map(|m| m.number).partition(|&n| mine.is_closed(n));

    let mut scoring: Vec<ScoringOpportunity> = closed
        .iter()
        .map(|&number| ScoringOpportunity {
            number,
            opponents_open: opponents.iter().filter(|o| !o.is_closed(number)).count(),
        })
        .filter(|o| o.opponents_open > 0)
        .collect();
    scoring.sort_by(|a, b| b.number.cmp(&a.number));

    let mut closing: Vec<ClosingPriority> = open
        .iter()
        .map(|&number| {
            let my_marks = mine.mark(number).map_or(0, |m| m.marks);
            let opponent_marks = opponents.iter().filter_map(|o| o.mark(number)).map(|m| m.marks).max().unwrap_or(0);
            ClosingPriority {
                number,
                my_marks,
                opponent_marks,
                priority: u32::from(number) + 10 * u32::from(my_marks) + 5 * u32::from(opponent_marks),
            }
        })
        .collect();
    closing.sort_by(|a, b| b.priority.cmp(&a.priority));

    let leading = if cutthroat {
        min_opp.map_or(true, |min| my_points <= min)
    } else {
        my_points >= max_opp
    };

    Some(CricketAnalysis { cutthroat, point_differential, winning: open.is_empty() && leading, closed, open, scoring, closing })
}

fn scoring_target(analysis: &CricketAnalysis) -> Segment {
    analysis.scoring.first().map_or(t(20), |o| aim_at(o.number))
}

fn closing_target(analysis: &CricketAnalysis, difficulty: u8) -> Segment {
    let pick = |f: fn(&ClosingPriority) -> bool| analysis.closing.iter().find(|p| f(p)).map(|p| aim_at(p.number));
    if difficulty >= 8 {
        if let Some(deny) = pick(|p| p.opponent_marks >= 2) {
            return deny;
        }
    }
    if difficulty >= 5 {
        if let Some(finish) = pick(|p| p.my_marks >= 2) {
            return finish;
        }
    }
    analysis.closing.first().map_or(t(20), |p| aim_at(p.number))
}

/// Target for the next cricket dart. Below level 6 a player trailing by a
/// little tosses a coin between scoring and closing.
pub fn choose_cricket_target<R: Rng + ?Sized>(state: &GameState, player_id: &str, difficulty: u8, rng: &mut R) -> Segment {
    let Some(a) = analyze(state, player_id) else {
        return t(20);
    };
    let can_score = !a.scoring.is_empty();

    if a.open.is_empty() {
        if a.winning {
            // stay off the bull
            let safest = a.closed.iter().copied().filter(|&n| n != BULL_NUMBER).max().unwrap_or(20);
            return t(safest);
        }
        return scoring_target(&a);
    }

    if a.point_differential < -20 && can_score {
        return scoring_target(&a);
    }

    if a.point_differential < 0 && can_score && (difficulty >= 6 || rng.gen_bool(0.5)) {
        return scoring_target(&a);
    }

    if difficulty >= 7 && a.scoring.first().is_some_and(|o| o.number >= 18) && a.point_differential < 40 {
        return scoring_target(&a);
    }

    closing_target(&a, difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameRules, LegScores, Player};
    use rand::{rngs::StdRng, SeedableRng};

    fn game(variant: CricketVariant) -> GameState {
        let rules = GameRules::cricket(variant, 1);
        crate::start_game(rules, vec![Player::ai("cpu", "CPU", 5), Player::human("h", "Human")]).unwrap()
    }

    fn set(g: &mut GameState, who: &str, marks: &[(u8, u8)], points: u32) {
        if let LegScores::Cricket(map) = &mut g.legs[0].scores {
            let score = map.get_mut(who).unwrap();
            for &(number, m) in marks {
                score.marks.iter_mut().find(|x| x.number == number).unwrap().marks = m;
            }
            score.points = points;
        }
    }

    fn all_closed() -> Vec<(u8, u8)> {
        crate::rules::CRICKET_NUMBERS.iter().map(|&n| (n, 3)).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    #[test]
    fn fresh_leg_goes_for_the_bull() {
        let g = game(CricketVariant::Standard);
        assert_eq!(choose_cricket_target(&g, "cpu", 5, &mut rng()), BULL);
        let a = analyze(&g, "cpu").unwrap();
        assert_eq!(a.closing[0].number, 25);
        assert_eq!(a.closing[1].number, 20);
        assert!(a.scoring.is_empty());
    }

    #[test]
    fn winning_with_everything_closed_stays_off_bull() {
        let mut g = game(CricketVariant::Standard);
        set(&mut g, "cpu", &all_closed(), 40);
        assert_eq!(choose_cricket_target(&g, "cpu", 10, &mut rng()), t(20));
    }

    #[test]
    fn closed_but_behind_must_score() {
        let mut g = game(CricketVariant::Standard);
        set(&mut g, "cpu", &all_closed(), 0);
        set(&mut g, "h", &[(20, 3), (19, 3), (25, 3)], 30);
        assert_eq!(choose_cricket_target(&g, "cpu", 3, &mut rng()), t(18));
    }

    #[test]
    fn far_behind_scores_at_any_level() {
        let mut g = game(CricketVariant::Standard);
        set(&mut g, "cpu", &[(17, 3)], 0);
        set(&mut g, "h", &[], 50);
        assert_eq!(choose_cricket_target(&g, "cpu", 1, &mut rng()), t(17));
    }

    #[test]
    fn strong_players_keep_pressure_on_high_numbers() {
        let mut g = game(CricketVariant::Standard);
        set(&mut g, "cpu", &[(19, 3)], 10);
        assert_eq!(choose_cricket_target(&g, "cpu", 7, &mut rng()), t(19));
        // a level 6 player closes instead
        assert_ne!(choose_cricket_target(&g, "cpu", 6, &mut rng()), t(19));
    }

    #[test]
    fn defensive_and_finishing_priorities() {
        let mut g = game(CricketVariant::Standard);
        set(&mut g, "cpu", &[(16, 2)], 0);
        set(&mut g, "h", &[(17, 2)], 0);
        assert_eq!(choose_cricket_target(&g, "cpu", 8, &mut rng()), t(17));
        assert_eq!(choose_cricket_target(&g, "cpu", 5, &mut rng()), t(16));
    }

    #[test]
    fn cutthroat_differential_favours_fewer_points() {
        let mut g = game(CricketVariant::Cutthroat);
        set(&mut g, "cpu", &[(20, 3)], 60);
        set(&mut g, "h", &[], 0);
        let a = analyze(&g, "cpu").unwrap();
        assert_eq!(a.point_differential, -60);
        assert_eq!(choose_cricket_target(&g, "cpu", 2, &mut rng()), t(20));
    }
}
