//! Caller-owned game session: the active game, a saved-for-later slot and
//! the transient notices a screen shows between darts.
//!
//! Every call without an active game is a no-op.

use crate::board::BoardGeometry;
use crate::bot::{self, AimVisualization};
use crate::config::AiSettings;
use crate::error::Result;
use crate::model::{BustInfo, GameHistory, GameRules, GameState, Player, PlayerId, Throw, ThrowOutcome};
use crate::rng::dart_rng;
use crate::stats::{game_statistics, leg_statistics, GameStatistics, LegStatistics};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Session {
    game: Option<GameState>,
    leg_winner: Option<LegStatistics>,
    bust: Option<BustInfo>,
    saved: Option<GameState>,
    ai_settings: AiSettings,
    seed: u64,
    ai_darts: u64,
}

impl Session {
    /// `seed` drives every simulated dart, so the same seed and inputs replay
    /// the same AI game.
    pub fn new(seed: u64) -> Self {
        Session { seed, ..Session::default() }
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    /// Set after a leg (not the match) is won, until `continue_leg`.
    pub fn leg_winner(&self) -> Option<&LegStatistics> {
        self.leg_winner.as_ref()
    }

    pub fn bust(&self) -> Option<&BustInfo> {
        self.bust.as_ref()
    }

    pub fn ai_settings(&self) -> &AiSettings {
        &self.ai_settings
    }

    pub fn set_ai_settings(&mut self, settings: AiSettings) -> Result<()> {
        settings.validate()?;
        self.ai_settings = settings;
        Ok(())
    }

    fn clear_notices(&mut self) {
        self.leg_winner = None;
        self.bust = None;
    }

    pub fn start_game(&mut self, rules: GameRules, players: Vec<Player>) -> Result<&GameState> {
        let state = crate::start_game(rules, players)?;
        self.clear_notices();
        Ok(self.game.insert(state))
    }

    pub fn record_throw(&mut self, throw: Throw) -> ThrowOutcome {
        let Some(game) = self.game.as_mut() else {
            warn!("record_throw without an active game");
            return ThrowOutcome::Ignored;
        };
        let outcome = crate::record_throw(game, throw);
        match &outcome {
            ThrowOutcome::Bust(info) => self.bust = Some(info.clone()),
            ThrowOutcome::LegWon(stats) => {
                self.leg_winner = Some(stats.clone());
                self.bust = None;
            }
            ThrowOutcome::MatchWon { .. } => self.leg_winner = None,
            ThrowOutcome::Scored | ThrowOutcome::Ignored => {}
        }
        outcome
    }

    pub fn undo_last_throw(&mut self) -> Option<Throw> {
        crate::undo_last_throw(self.game.as_mut()?)
    }

    pub fn next_turn(&mut self) {
        if let Some(game) = self.game.as_mut() {
            crate::next_turn(game);
            self.bust = None;
        }
    }

    /// Only moves on while a leg-winner notice is pending.
    pub fn continue_leg(&mut self) -> bool {
        if self.leg_winner.is_none() {
            return false;
        }
        let Some(game) = self.game.as_mut() else { return false };
        let moved = crate::continue_leg(game);
        if moved {
            self.leg_winner = None;
        }
        moved
    }

    pub fn clear_bust(&mut self) {
        self.bust = None;
    }

    /// Close the active game and hand back its history record.
    pub fn end_game(&mut self) -> Option<GameHistory> {
        let game = self.game.take()?;
        self.clear_notices();
        let history = crate::end_game(&game);
        info!(game_id = %history.id, winner = ?history.winner_id, "game ended");
        Some(history)
    }

    pub fn reset_game(&mut self) {
        self.game = None;
        self.clear_notices();
    }

    /// Park the active game. Replaces any game already parked.
    pub fn save_for_later(&mut self) {
        if let Some(game) = self.game.take() {
            debug!(game_id = %game.id, "game saved for later");
            self.saved = Some(game);
            self.clear_notices();
        }
    }

    /// Resume the parked game, restoring the leg-winner notice if it was
    /// parked between legs.
    pub fn load_saved_game(&mut self) -> Option<&GameState> {
        let game = self.saved.take()?;
        self.bust = None;
        self.leg_winner = if game.awaiting_next_leg() {
            leg_statistics(game.current_leg(), &game.players, &game.rules)
        } else {
            None
        };
        Some(self.game.insert(game))
    }

    pub fn clear_saved_game(&mut self) {
        self.saved = None;
    }

    pub fn has_saved_game(&self) -> bool {
        self.saved.is_some()
    }

    pub fn saved_game(&self) -> Option<&GameState> {
        self.saved.as_ref()
    }

    pub fn leg_statistics(&self, leg_index: usize) -> Option<LegStatistics> {
        let game = self.game.as_ref()?;
        leg_statistics(game.legs.get(leg_index)?, &game.players, &game.rules)
    }

    pub fn game_statistics(&self) -> Option<GameStatistics> {
        self.game.as_ref().map(game_statistics)
    }

    /// The AI player due to throw and their level, when one is. The host
    /// paces the darts; this only says whether another is owed.
    pub fn ai_to_throw(&self) -> Option<(PlayerId, u8)> {
        let game = self.game.as_ref()?;
        if game.is_match_over() || game.current_leg().winner_id.is_some() || game.turn_complete() {
            return None;
        }
        let player = game.current_player();
        if !player.is_ai() {
            return None;
        }
        Some((player.id.clone(), player.difficulty.unwrap_or(bot::DEFAULT_DIFFICULTY)))
    }

    /// Aim point and spread of the dart `play_ai_dart` will throw next. It
    /// draws from the same generator, so the shown target is the one used.
    pub fn ai_visualization<B: BoardGeometry + ?Sized>(&self, board: &B) -> Option<AimVisualization> {
        let (player_id, difficulty) = self.ai_to_throw()?;
        let game = self.game.as_ref()?;
        let mut rng = dart_rng(self.seed, self.ai_darts);
        bot::visualization_data(game, &player_id, difficulty, self.ai_settings.global_multiplier, board, &mut rng)
    }

    /// Simulate and record one dart for the AI player due to throw.
    pub fn play_ai_dart<B: BoardGeometry + ?Sized>(&mut self, board: &B) -> Option<(Throw, ThrowOutcome)> {
        let (player_id, difficulty) = self.ai_to_throw()?;
        let game = self.game.as_ref()?;
        let mut rng = dart_rng(self.seed, self.ai_darts);
        let throw = bot::simulate_throw(game, &player_id, difficulty, self.ai_settings.global_multiplier, board, &mut rng).ok()?;
        self.ai_darts += 1;
        let outcome = self.record_throw(throw.clone());
        Some((throw, outcome))
    }
}
