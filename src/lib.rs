pub mod board;
pub mod bot;
pub mod checkout;
pub mod config;
pub mod cricket;
pub mod error;
pub mod model;
pub mod replay;
pub mod rng;
pub mod rules;
pub mod segment;
pub mod session;
pub mod stats;
pub mod x01;

pub use error::{EngineError, Result};
pub use model::*;
pub use segment::{Ring, Segment};

use chrono::Utc;
use cricket::apply_cricket_throw;
use replay::{new_leg, project_leg};
use rules::{cricket_variant, legs_needed, DARTS_PER_TURN};
use segment::format_segment;
use stats::{game_statistics, summarize_leg};
use tracing::{debug, info, instrument, warn};
use x01::apply_x01_throw;

#[instrument(skip(players), fields(game_type = ?rules.game_type, players = players.len()))]
pub fn start_game(rules: GameRules, players: Vec<Player>) -> Result<GameState> {
    rules.validate()?;
    config::validate_players(&players)?;
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id.clone()).collect();
    let state = GameState {
        id: format!("game_{}", uuid::Uuid::new_v4()),
        legs: vec![new_leg(1, &rules, &ids)],
        legs_won: ids.iter().map(|id| (id.clone(), 0)).collect(),
        rules,
        players,
        current_player_index: 0,
        current_throw_in_turn: 0,
        current_leg_index: 0,
        match_winner_id: None,
        started_at: Utc::now(),
        completed_at: None,
    };
    info!(game_id = %state.id, "game started");
    Ok(state)
}

fn advance_player(state: &mut GameState) {
    state.current_player_index = (state.current_player_index + 1) % state.players.len();
    state.current_throw_in_turn = 0;
}

/// Score one dart for the current player.
///
/// The third dart of a turn does not hand over to the next player; the caller
/// does that with [`next_turn`] once it has shown the dart. A bust hands over
/// immediately.
#[instrument(skip(state, throw), fields(
    game_id = %state.id,
    player = %throw.player_id,
    segment = %format_segment(throw.segment.as_ref())
))]
pub fn record_throw(state: &mut GameState, throw: Throw) -> ThrowOutcome {
    if state.is_match_over() || state.awaiting_next_leg() {
        warn!("throw ignored: leg already decided");
        return ThrowOutcome::Ignored;
    }
    if state.turn_complete() {
        warn!("throw ignored: turn already has three darts");
        return ThrowOutcome::Ignored;
    }
    if throw.player_id != state.current_player().id {
        warn!(current = %state.current_player().id, "throw ignored: not this player's turn");
        return ThrowOutcome::Ignored;
    }

    let ids = state.player_ids();
    let rules = state.rules.clone();
    let player_id = throw.player_id.clone();
    let leg_index = state.current_leg_index;
    let leg = &mut state.legs[leg_index];

    let won = match &mut leg.scores {
        LegScores::X01(scores) => {
            let Some(current) = scores.get(&player_id).cloned() else {
                return ThrowOutcome::Ignored;
            };
            let out = apply_x01_throw(&current, throw.segment.as_ref(), &rules);
            if out.bust {
                leg.throws.push(throw);
                leg.scores = project_leg(&rules, &ids, &leg.throws).scores;
                let score_before_bust = leg.scores.x01(&player_id).map_or(current.remaining, |s| s.remaining);
                info!(score_before_bust, "bust, turn voided");
                advance_player(state);
                return ThrowOutcome::Bust(BustInfo { player_id, score_before_bust });
            }
            scores.insert(player_id.clone(), out.score);
            out.won
        }
        LegScores::Cricket(scores) => {
            let out = apply_cricket_throw(scores, &player_id, throw.segment.as_ref(), cricket_variant(&rules), &ids);
            *scores = out.scores;
            out.won
        }
    };
    leg.throws.push(throw);

    if !won {
        state.current_throw_in_turn += 1;
        debug!(throw_in_turn = state.current_throw_in_turn, "dart scored");
        return ThrowOutcome::Scored;
    }

    leg.winner_id = Some(player_id.clone());
    let leg_stats = summarize_leg(leg, player_id.clone(), &ids, &rules);
    let wins = state.legs_won.entry(player_id.clone()).or_insert(0);
    *wins += 1;
    if *wins >= legs_needed(rules.best_of) {
        info!(winner = %player_id, legs = *wins, "match won");
        state.match_winner_id = Some(player_id.clone());
        state.completed_at = Some(Utc::now());
        return ThrowOutcome::MatchWon { winner_id: player_id };
    }
    info!(winner = %player_id, leg = leg_stats.leg_number, "leg won");
    ThrowOutcome::LegWon(leg_stats)
}

#[instrument(skip(state), fields(game_id = %state.id))]
pub fn next_turn(state: &mut GameState) {
    if state.is_match_over() || state.awaiting_next_leg() {
        warn!("next_turn ignored: leg already decided");
        return;
    }
    advance_player(state);
    debug!(player = %state.current_player().id, "next turn");
}

/// Take back the last dart of the current leg and rebuild every score from
/// the remaining log. The popped dart's thrower and slot become the current
/// position again.
///
/// While the thrower still holds the turn the slot steps back by one.
/// Otherwise it comes from the replayed turn split, which only knows turns
/// of up to three darts ended by a bust or a change of thrower. A visit cut
/// short by `next_turn` and followed by the same player's next visit reads
/// as one turn there, so undoing across such a boundary can land on a later
/// slot than the one the dart was thrown from.
#[instrument(skip(state), fields(game_id = %state.id))]
pub fn undo_last_throw(state: &mut GameState) -> Option<Throw> {
    if state.is_match_over() || state.current_leg().winner_id.is_some() {
        warn!("undo ignored: leg already decided");
        return None;
    }
    let ids = state.player_ids();
    let leg_index = state.current_leg_index;
    let leg = &mut state.legs[leg_index];
    let popped = leg.throws.pop()?;

    let projection = project_leg(&state.rules, &ids, &leg.throws);
    leg.scores = projection.scores;
    let slot = if state.current_player().id == popped.player_id && state.current_throw_in_turn > 0 {
        state.current_throw_in_turn - 1
    } else {
        projection
            .turns
            .last()
            .filter(|t| t.player_id == popped.player_id && t.darts < DARTS_PER_TURN && !t.bust)
            .map_or(0, |t| t.darts)
    };

    if let Some(index) = state.players.iter().position(|p| p.id == popped.player_id) {
        state.current_player_index = index;
    }
    state.current_throw_in_turn = slot;
    debug!(player = %popped.player_id, slot, "dart undone");
    Some(popped)
}

/// Open the next leg after a leg win. Returns `false` when there is no
/// decided leg to move on from.
#[instrument(skip(state), fields(game_id = %state.id))]
pub fn continue_leg(state: &mut GameState) -> bool {
    if !state.awaiting_next_leg() {
        warn!("continue_leg ignored: no finished leg pending");
        return false;
    }
    let ids = state.player_ids();
    let leg_number = state.legs.len() as u32 + 1;
    state.legs.push(new_leg(leg_number, &state.rules, &ids));
    state.current_leg_index = state.legs.len() - 1;
    state.current_player_index = 0;
    state.current_throw_in_turn = 0;
    info!(leg = leg_number, "leg started");
    true
}

/// Snapshot the game into a history record.
pub fn end_game(state: &GameState) -> GameHistory {
    GameHistory {
        id: state.id.clone(),
        game_type: state.rules.game_type,
        rules: state.rules.clone(),
        players: state.players.iter().map(|p| PlayerRef { id: p.id.clone(), name: p.name.clone() }).collect(),
        winner_id: state.match_winner_id.clone(),
        legs: state.legs.clone(),
        legs_won: state.legs_won.clone(),
        started_at: state.started_at,
        completed_at: state.completed_at.unwrap_or_else(Utc::now),
        statistics: game_statistics(state),
    }
}
