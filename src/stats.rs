//! Leg and game statistics folded from recorded throws.

use crate::checkout::is_checkable;
use crate::model::{GameRules, GameState, GameType, LegScores, LegState, Player, PlayerId, Throw};
use crate::replay::{project_leg, TurnSummary};
use crate::rules::is_cricket_number;
use crate::segment::{Ring, Segment};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct X01LegPlayerStats {
    pub darts_thrown: u32,
    pub total_score: u32,
    pub average_per_dart: f64,
    pub average_per_turn: f64,
    pub highest_turn: u32,
    pub doubles_hit: u32,
    pub triples_hit: u32,
    pub missed_darts: u32,
    pub checkout_score: Option<u32>, // winner only
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CricketLegPlayerStats {
    pub darts_thrown: u32,
    pub marks_per_round: f64,
    pub total_marks: u32,
    pub total_points: u32,
    pub hit_accuracy: f64,
    pub triple_rate: f64,
    pub single_rate: f64,
    pub double_rate: f64,
    pub numbers_closed: u32,
    pub best_round: u32,
    pub missed_darts: u32,
    pub wasted_darts: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "game_type", content = "players", rename_all = "lowercase")]
pub enum LegBreakdown {
    X01(BTreeMap<PlayerId, X01LegPlayerStats>),
    Cricket(BTreeMap<PlayerId, CricketLegPlayerStats>),
}

/// What the leg-winner screen shows.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LegStatistics {
    pub leg_number: u32,
    pub winner_id: PlayerId,
    pub breakdown: LegBreakdown,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayerStatistics {
    pub darts_thrown: u32,
    pub total_score: u32,
    pub average_per_dart: f64,
    pub average_per_turn: f64,
    pub highest_turn: u32,
    pub checkout_attempts: u32,
    pub checkout_successes: u32,
    pub checkout_percentage: f64,
    pub highest_checkout: u32,
    pub doubles_hit: u32,
    pub triples_hit: u32,
    pub missed_darts: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CricketPlayerStatistics {
    pub darts_thrown: u32,
    pub marks_per_round: f64,
    pub total_marks: u32,
    pub total_points: u32,
    pub hit_accuracy: f64,
    pub triple_rate: f64,
    pub single_rate: f64,
    pub double_rate: f64,
    pub numbers_closed: u32,
    /// Never populated; kept for record compatibility.
    pub first_to_close: u32,
    pub best_round: u32,
    pub white_horses: u32,
    pub hat_tricks: u32,
    pub missed_darts: u32,
    pub wasted_darts: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GameStatistics {
    pub player_stats: BTreeMap<PlayerId, PlayerStatistics>,
    pub cricket_stats: Option<BTreeMap<PlayerId, CricketPlayerStatistics>>,
}

fn ratio(num: u32, den: u32) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn percent(num: u32, den: u32) -> f64 {
    ratio(num, den) * 100.0
}

#[derive(Debug, Default)]
struct DartTally {
    darts: u32,
    missed: u32,
    doubles: u32,
    triples: u32,
    cricket_hits: u32,
    cricket_singles: u32,
    cricket_doubles: u32,
    cricket_triples: u32,
    marks: u32,
    wasted: u32,
}

impl DartTally {
    fn add(&mut self, segment: Option<&Segment>) {
        self.darts += 1;
        let Some(seg) = segment else {
            self.missed += 1;
            return;
        };
        match seg.ring() {
            Ring::Double | Ring::InnerBull => self.doubles += 1,
            Ring::Triple => self.triples += 1,
            Ring::Single | Ring::OuterBull => {}
        }
        if !is_cricket_number(seg.number()) {
            self.wasted += 1;
            return;
        }
        self.cricket_hits += 1;
        self.marks += seg.multiplier();
        match seg.ring() {
            Ring::Triple => self.cricket_triples += 1,
            Ring::Double | Ring::InnerBull => self.cricket_doubles += 1,
            Ring::Single | Ring::OuterBull => self.cricket_singles += 1,
        }
    }
}

#[derive(Debug, Default)]
struct RoundTally {
    rounds: u32,
    best_round: u32,
    white_horses: u32,
    hat_tricks: u32,
}

impl RoundTally {
    fn add(&mut self, darts: &[Throw]) {
        let mut marks = 0;
        let mut triples = BTreeSet::new();
        let mut bulls = 0;
        for seg in darts.iter().filter_map(|t| t.segment.as_ref()) {
            if !is_cricket_number(seg.number()) {
                continue;
            }
            marks += seg.multiplier();
            if seg.ring() == Ring::Triple {
                triples.insert(seg.number());
            }
            if seg.ring().is_bull() {
                bulls += 1;
            }
        }
        self.rounds += 1;
        self.best_round = self.best_round.max(marks);
        if triples.len() >= 3 {
            self.white_horses += 1;
        }
        if bulls >= 3 {
            self.hat_tricks += 1;
        }
    }
}

fn player_turns<'a>(turns: &'a [TurnSummary], player_id: &'a str) -> impl Iterator<Item = &'a TurnSummary> + 'a {
    turns.iter().filter(move |t| t.player_id == player_id)
}

fn tally_player(leg: &LegState, player_id: &str) -> DartTally {
    let mut tally = DartTally::default();
    for throw in leg.throws.iter().filter(|t| t.player_id == player_id) {
        tally.add(throw.segment.as_ref());
    }
    tally
}

/// Points of the turn that won the leg for `player_id`.
fn winning_turn_score(leg: &LegState, turns: &[TurnSummary], player_id: &str) -> Option<u32> {
    if leg.winner_id.as_deref() != Some(player_id) {
        return None;
    }
    player_turns(turns, player_id).last().map(TurnSummary::scored)
}

fn cricket_standing(leg: &LegState, player_id: &str) -> (u32, u32) {
    match &leg.scores {
        LegScores::Cricket(scores) => scores
            .get(player_id)
            .map(|s| (s.points, s.closed_count() as u32))
            .unwrap_or_default(),
        LegScores::X01(_) => (0, 0),
    }
}

fn x01_leg_player(leg: &LegState, turns: &[TurnSummary], player_id: &str) -> X01LegPlayerStats {
    let tally = tally_player(leg, player_id);
    let total_score: u32 = player_turns(turns, player_id).map(TurnSummary::scored).sum();
    let average_per_dart = ratio(total_score, tally.darts);
    X01LegPlayerStats {
        darts_thrown: tally.darts,
        total_score,
        average_per_dart,
        average_per_turn: average_per_dart * 3.0,
        highest_turn: player_turns(turns, player_id).map(TurnSummary::scored).max().unwrap_or(0),
        doubles_hit: tally.doubles,
        triples_hit: tally.triples,
        missed_darts: tally.missed,
        checkout_score: winning_turn_score(leg, turns, player_id),
    }
}

fn cricket_leg_player(leg: &LegState, turns: &[TurnSummary], player_id: &str) -> CricketLegPlayerStats {
    let tally = tally_player(leg, player_id);
    let mut rounds = RoundTally::default();
    for turn in player_turns(turns, player_id) {
        rounds.add(&leg.throws[turn.throw_range()]);
    }
    let (total_points, numbers_closed) = cricket_standing(leg, player_id);
    CricketLegPlayerStats {
        darts_thrown: tally.darts,
        marks_per_round: ratio(tally.marks, rounds.rounds),
        total_marks: tally.marks,
        total_points,
        hit_accuracy: percent(tally.cricket_hits, tally.darts),
        triple_rate: percent(tally.cricket_triples, tally.cricket_hits),
        single_rate: percent(tally.cricket_singles, tally.cricket_hits),
        double_rate: percent(tally.cricket_doubles, tally.cricket_hits),
        numbers_closed,
        best_round: rounds.best_round,
        missed_darts: tally.missed,
        wasted_darts: tally.wasted,
    }
}

/// Statistics for a finished leg; `None` while the leg is still being played.
pub fn leg_statistics(leg: &LegState, players: &[Player], rules: &GameRules) -> Option<LegStatistics> {
    let winner_id = leg.winner_id.clone()?;
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id.clone()).collect();
    Some(summarize_leg(leg, winner_id, &ids, rules))
}

pub(crate) fn summarize_leg(leg: &LegState, winner_id: PlayerId, ids: &[PlayerId], rules: &GameRules) -> LegStatistics {
    let turns = project_leg(rules, ids, &leg.throws).turns;
    let breakdown = match rules.game_type {
        GameType::Cricket => {
            LegBreakdown::Cricket(ids.iter().map(|id| (id.clone(), cricket_leg_player(leg, &turns, id))).collect())
        }
        GameType::ThreeOhOne | GameType::FiveOhOne => {
            LegBreakdown::X01(ids.iter().map(|id| (id.clone(), x01_leg_player(leg, &turns, id))).collect())
        }
    };
    LegStatistics { leg_number: leg.leg_number, winner_id, breakdown }
}

fn x01_game_player(state: &GameState, projections: &[Vec<TurnSummary>], player_id: &str) -> PlayerStatistics {
    let mut tally = DartTally::default();
    let mut total_score = 0;
    let mut highest_turn = 0;
    let mut attempts = 0;
    let mut successes = 0;
    let mut highest_checkout = 0;

    for (leg, turns) in state.legs.iter().zip(projections) {
        for throw in leg.throws.iter().filter(|t| t.player_id == player_id) {
            tally.add(throw.segment.as_ref());
        }
        for turn in player_turns(turns, player_id) {
            total_score += turn.scored();
            highest_turn = highest_turn.max(turn.scored());
            if turn.start_remaining.is_some_and(|r| is_checkable(r, 3)) {
                attempts += 1;
            }
        }
        if let Some(checkout) = winning_turn_score(leg, turns, player_id) {
            successes += 1;
            highest_checkout = highest_checkout.max(checkout);
        }
    }

    let average_per_dart = ratio(total_score, tally.darts);
    PlayerStatistics {
        darts_thrown: tally.darts,
        total_score,
        average_per_dart,
        average_per_turn: average_per_dart * 3.0,
        highest_turn,
        checkout_attempts: attempts,
        checkout_successes: successes,
        checkout_percentage: percent(successes, attempts),
        highest_checkout,
        doubles_hit: tally.doubles,
        triples_hit: tally.triples,
        missed_darts: tally.missed,
    }
}

fn cricket_game_player(
    state: &GameState,
    projections: &[Vec<TurnSummary>],
    player_id: &str,
) -> (CricketPlayerStatistics, PlayerStatistics) {
    let mut tally = DartTally::default();
    let mut rounds = RoundTally::default();
    for (leg, turns) in state.legs.iter().zip(projections) {
        for throw in leg.throws.iter().filter(|t| t.player_id == player_id) {
            tally.add(throw.segment.as_ref());
        }
        for turn in player_turns(turns, player_id) {
            rounds.add(&leg.throws[turn.throw_range()]);
        }
    }
    let (total_points, numbers_closed) = state.legs.last().map(|leg| cricket_standing(leg, player_id)).unwrap_or_default();

    let cricket = CricketPlayerStatistics {
        darts_thrown: tally.darts,
        marks_per_round: ratio(tally.marks, rounds.rounds),
        total_marks: tally.marks,
        total_points,
        hit_accuracy: percent(tally.cricket_hits, tally.darts),
        triple_rate: percent(tally.cricket_triples, tally.cricket_hits),
        single_rate: percent(tally.cricket_singles, tally.cricket_hits),
        double_rate: percent(tally.cricket_doubles, tally.cricket_hits),
        numbers_closed,
        first_to_close: 0,
        best_round: rounds.best_round,
        white_horses: rounds.white_horses,
        hat_tricks: rounds.hat_tricks,
        missed_darts: tally.missed,
        wasted_darts: tally.wasted,
    };
    // Marks stand in for points so generic history views still have numbers.
    let generic = PlayerStatistics {
        darts_thrown: tally.darts,
        total_score: tally.marks,
        average_per_dart: ratio(tally.marks, tally.darts),
        average_per_turn: ratio(tally.marks, rounds.rounds),
        highest_turn: rounds.best_round,
        doubles_hit: tally.cricket_doubles,
        triples_hit: tally.cricket_triples,
        missed_darts: tally.missed,
        ..PlayerStatistics::default()
    };
    (cricket, generic)
}

/// Fold every leg of one game into per-player totals.
pub fn game_statistics(state: &GameState) -> GameStatistics {
    let ids = state.player_ids();
    let projections: Vec<Vec<TurnSummary>> =
        state.legs.iter().map(|leg| project_leg(&state.rules, &ids, &leg.throws).turns).collect();

    match state.rules.game_type {
        GameType::Cricket => {
            let mut player_stats = BTreeMap::new();
            let mut cricket_stats = BTreeMap::new();
            for id in &ids {
                let (cricket, generic) = cricket_game_player(state, &projections, id);
                cricket_stats.insert(id.clone(), cricket);
                player_stats.insert(id.clone(), generic);
            }
            GameStatistics { player_stats, cricket_stats: Some(cricket_stats) }
        }
        GameType::ThreeOhOne | GameType::FiveOhOne => GameStatistics {
            player_stats: ids.iter().map(|id| (id.clone(), x01_game_player(state, &projections, id))).collect(),
            cricket_stats: None,
        },
    }
}
