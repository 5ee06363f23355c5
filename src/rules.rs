use crate::model::{CricketVariant, GameRules, GameType};

pub const CRICKET_NUMBERS: [u8; 7] = [20, 19, 18, 17, 16, 15, 25];
pub const DARTS_PER_TURN: u8 = 3;

#[inline] pub fn is_cricket_number(number: u8) -> bool { CRICKET_NUMBERS.contains(&number) }

pub fn start_score(game_type: GameType) -> u32 {
    match game_type { GameType::ThreeOhOne => 301, GameType::FiveOhOne | GameType::Cricket => 501 }
}

/// Legs a player must win to take a best-of-`best_of` match.
pub fn legs_needed(best_of: u32) -> u32 { best_of.div_ceil(2) }

pub fn cricket_variant(rules: &GameRules) -> CricketVariant { rules.cricket_variant.unwrap_or_default() }
