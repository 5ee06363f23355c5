//! Projects a leg's throw log into scores.
//!
//! The log is the source of truth: bust rollback and undo both rebuild scores
//! from it rather than reversing individual darts.

use crate::cricket::{apply_cricket_throw, initial_cricket_scores};
use crate::model::{GameRules, GameType, LegScores, LegState, PlayerId, Throw, X01Score};
use crate::rules::{cricket_variant, start_score, DARTS_PER_TURN};
use crate::x01::{apply_x01_throw, initial_x01_score};

/// One visit to the oche: up to three consecutive darts by one player, cut
/// short by a bust.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnSummary {
    pub player_id: PlayerId,
    pub first_throw: usize,
    pub darts: u8,
    /// X01 only.
    pub start_remaining: Option<u32>,
    pub end_remaining: Option<u32>,
    pub bust: bool,
}

impl TurnSummary {
    pub fn throw_range(&self) -> std::ops::Range<usize> {
        self.first_throw..self.first_throw + self.darts as usize
    }

    /// Points taken off in X01; zero for a bust.
    pub fn scored(&self) -> u32 {
        match (self.start_remaining, self.end_remaining) {
            (Some(start), Some(end)) => start.saturating_sub(end),
            _ => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegProjection {
    pub scores: LegScores,
    /// Index of every dart within its turn.
    pub slots: Vec<u8>,
    pub turns: Vec<TurnSummary>,
    pub winner_id: Option<PlayerId>,
}

pub fn initial_scores(rules: &GameRules, player_ids: &[PlayerId]) -> LegScores {
    match rules.game_type {
        GameType::Cricket => LegScores::Cricket(initial_cricket_scores(player_ids)),
        GameType::ThreeOhOne | GameType::FiveOhOne => {
            let start = initial_x01_score(start_score(rules.game_type), rules);
            LegScores::X01(player_ids.iter().map(|id| (id.clone(), start.clone())).collect())
        }
    }
}

pub fn new_leg(leg_number: u32, rules: &GameRules, player_ids: &[PlayerId]) -> LegState {
    LegState { leg_number, winner_id: None, throws: Vec::new(), scores: initial_scores(rules, player_ids) }
}

/// A bust voids the turn: remaining and double-in status go back to the turn
/// start, the busting dart still counts as thrown.
pub fn rollback_bust(turn_start: &X01Score, current: &X01Score) -> X01Score {
    X01Score { darts_thrown: current.darts_thrown + 1, ..turn_start.clone() }
}

pub fn project_leg(rules: &GameRules, player_ids: &[PlayerId], throws: &[Throw]) -> LegProjection {
    let variant = cricket_variant(rules);
    let mut scores = initial_scores(rules, player_ids);
    let mut slots = Vec::with_capacity(throws.len());
    let mut turns: Vec<TurnSummary> = Vec::new();
    let mut turn_start: Option<X01Score> = None;
    let mut winner_id = None;

    for (index, throw) in throws.iter().enumerate() {
        let continues = turns
            .last()
            .is_some_and(|t| t.player_id == throw.player_id && t.darts < DARTS_PER_TURN && !t.bust);
        if !continues {
            turn_start = scores.x01(&throw.player_id).cloned();
            turns.push(TurnSummary {
                player_id: throw.player_id.clone(),
                first_throw: index,
                darts: 0,
                start_remaining: turn_start.as_ref().map(|s| s.remaining),
                end_remaining: turn_start.as_ref().map(|s| s.remaining),
                bust: false,
            });
        }
        let Some(turn) = turns.last_mut() else { continue };
        slots.push(turn.darts);
        turn.darts += 1;

        match &mut scores {
            LegScores::X01(map) => {
                let Some(current) = map.get(&throw.player_id).cloned() else { continue };
                let out = apply_x01_throw(&current, throw.segment.as_ref(), rules);
                let next = if out.bust {
                    turn.bust = true;
                    rollback_bust(turn_start.as_ref().unwrap_or(&current), &current)
                } else {
                    if out.won {
                        winner_id = Some(throw.player_id.clone());
                    }
                    out.score
                };
                turn.end_remaining = Some(next.remaining);
                map.insert(throw.player_id.clone(), next);
            }
            LegScores::Cricket(map) => {
                let out = apply_cricket_throw(map, &throw.player_id, throw.segment.as_ref(), variant, player_ids);
                if out.won {
                    winner_id = Some(throw.player_id.clone());
                }
                *map = out.scores;
            }
        }
    }

    LegProjection { scores, slots, turns, winner_id }
}
