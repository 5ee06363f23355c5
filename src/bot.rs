//! Computer opponents: pick a target, aim at it, and miss by a
//! difficulty-dependent amount.

pub mod accuracy;
pub mod cricket;
pub mod x01;

use crate::board::BoardGeometry;
use crate::error::{EngineError, Result};
use crate::model::{GameState, GameType, Player, Throw};
use crate::segment::Segment;
use accuracy::{accuracy_radius, difficulty_description, expected_average, expected_mpr, sample_point_in_disc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use cricket::choose_cricket_target;
pub use x01::choose_x01_target;

pub const DEFAULT_DIFFICULTY: u8 = 5;

/// A player's own level wins over the one passed in.
pub fn effective_difficulty(state: &GameState, player_id: &str, difficulty: u8) -> u8 {
    state.player(player_id).and_then(|p| p.difficulty).unwrap_or(difficulty)
}

pub fn choose_target<R: Rng + ?Sized>(state: &GameState, player_id: &str, difficulty: u8, rng: &mut R) -> Segment {
    match state.rules.game_type {
        GameType::Cricket => choose_cricket_target(state, player_id, difficulty, rng),
        GameType::ThreeOhOne | GameType::FiveOhOne => choose_x01_target(state, player_id),
    }
}

/// Throw one dart for `player_id`. The result may land on a different
/// segment than the one aimed at, or off the board.
pub fn simulate_throw<B, R>(
    state: &GameState,
    player_id: &str,
    difficulty: u8,
    global_multiplier: f64,
    board: &B,
    rng: &mut R,
) -> Result<Throw>
where
    B: BoardGeometry + ?Sized,
    R: Rng + ?Sized,
{
    if state.player(player_id).is_none() {
        return Err(EngineError::UnknownPlayer(player_id.to_string()));
    }
    let level = effective_difficulty(state, player_id, difficulty);
    let target = choose_target(state, player_id, level, rng);
    let aim = board.segment_center(&target);
    let radius = accuracy_radius(level, global_multiplier);
    let hit = sample_point_in_disc(aim, radius, rng);
    let segment = board.segment_at(hit);
    debug!(player = player_id, level, %target, radius, hit = ?segment, "ai dart");

    let mut throw = Throw::new(segment, player_id);
    throw.coordinates = Some(hit);
    Ok(throw)
}

/// Where the AI is aiming and how wide it can stray, for drawing on the board.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct AimVisualization {
    pub target_x: f64,
    pub target_y: f64,
    pub accuracy_radius: f64,
}

pub fn visualization_data<B, R>(
    state: &GameState,
    player_id: &str,
    difficulty: u8,
    global_multiplier: f64,
    board: &B,
    rng: &mut R,
) -> Option<AimVisualization>
where
    B: BoardGeometry + ?Sized,
    R: Rng + ?Sized,
{
    state.player(player_id)?;
    let level = effective_difficulty(state, player_id, difficulty);
    let target = choose_target(state, player_id, level, rng);
    let aim = board.segment_center(&target);
    Some(AimVisualization { target_x: aim.x, target_y: aim.y, accuracy_radius: accuracy_radius(level, global_multiplier) })
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AiPlayerInfo {
    pub description: String,
    pub expected_average: u32,
    pub expected_mpr: f64,
}

pub fn ai_player_info(player: &Player) -> AiPlayerInfo {
    let level = player.difficulty.unwrap_or(DEFAULT_DIFFICULTY);
    AiPlayerInfo {
        description: difficulty_description(level).to_string(),
        expected_average: expected_average(level),
        expected_mpr: expected_mpr(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::StandardBoard;
    use crate::model::{GameRules, Point};
    use crate::segment::t;
    use rand::{rngs::StdRng, SeedableRng};

    fn game() -> GameState {
        let rules = GameRules::x01(GameType::FiveOhOne, false, true, 1);
        crate::start_game(rules, vec![Player::ai("cpu", "CPU", 10), Player::human("h", "H")]).unwrap()
    }

    #[test]
    fn own_difficulty_overrides_argument() {
        let g = game();
        assert_eq!(effective_difficulty(&g, "cpu", 2), 10);
        assert_eq!(effective_difficulty(&g, "h", 2), 2);
    }

    #[test]
    fn unknown_player_is_an_error() {
        let g = game();
        let mut rng = StdRng::seed_from_u64(1);
        let out = simulate_throw(&g, "ghost", 5, 1.0, &StandardBoard::default(), &mut rng);
        assert!(matches!(out, Err(EngineError::UnknownPlayer(id)) if id == "ghost"));
    }

    #[test]
    fn throw_lands_within_radius_of_aim() {
        let g = game();
        let board = StandardBoard::default();
        let aim = board.segment_center(&t(20));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let throw = simulate_throw(&g, "cpu", 1, 1.0, &board, &mut rng).unwrap();
            let hit = throw.coordinates.unwrap();
            assert!((hit.x - aim.x).hypot(hit.y - aim.y) <= accuracy_radius(10, 1.0) + 1e-9);
            assert_eq!(throw.player_id, "cpu");
            assert_eq!(throw.segment, board.segment_at(hit));
        }
    }

    #[test]
    fn seeded_throws_replay() {
        let g = game();
        let board = StandardBoard::default();
        let a = simulate_throw(&g, "cpu", 5, 1.0, &board, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = simulate_throw(&g, "cpu", 5, 1.0, &board, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.coordinates, b.coordinates);
        assert_eq!(a.segment, b.segment);
    }

    #[test]
    fn visualization_matches_target() {
        let g = game();
        let board = StandardBoard::default();
        let mut rng = StdRng::seed_from_u64(1);
        let v = visualization_data(&g, "cpu", 5, 2.0, &board, &mut rng).unwrap();
        assert_eq!(Point { x: v.target_x, y: v.target_y }, board.segment_center(&t(20)));
        assert!((v.accuracy_radius - 16.0).abs() < 1e-9);
        assert!(visualization_data(&g, "ghost", 5, 1.0, &board, &mut rng).is_none());
    }

    #[test]
    fn player_info_defaults_to_level_five() {
        let info = ai_player_info(&Player::human("h", "H"));
        assert_eq!(info.description, "Club Player");
        assert_eq!(info.expected_average, 32);
        let pro = ai_player_info(&Player::ai("cpu", "CPU", 10));
        assert_eq!(pro.description, "Professional");
    }
}
