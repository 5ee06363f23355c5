//! Rule presets, player validation and AI settings.

use crate::error::{EngineError, Result};
use crate::model::{CricketVariant, GameRules, GameType, Player};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;
pub const MIN_GLOBAL_MULTIPLIER: f64 = 0.5;
pub const MAX_GLOBAL_MULTIPLIER: f64 = 2.0;

impl GameRules {
    /// 301 or 501. Passing `GameType::Cricket` yields cricket rules with the
    /// standard variant.
    pub fn x01(game_type: GameType, double_in: bool, double_out: bool, best_of: u32) -> Self {
        if game_type == GameType::Cricket {
            return GameRules::cricket(CricketVariant::Standard, best_of);
        }
        GameRules { game_type, double_in, double_out, cricket_variant: None, best_of }
    }

    pub fn cricket(variant: CricketVariant, best_of: u32) -> Self {
        GameRules {
            game_type: GameType::Cricket,
            double_in: false,
            double_out: false,
            cricket_variant: Some(variant),
            best_of,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.best_of == 0 || self.best_of % 2 == 0 {
            return Err(EngineError::InvalidBestOf(self.best_of));
        }
        Ok(())
    }
}

pub fn validate_difficulty(difficulty: u8) -> Result<()> {
    if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        Ok(())
    } else {
        Err(EngineError::InvalidDifficulty(difficulty))
    }
}

pub fn validate_players(players: &[Player]) -> Result<()> {
    if players.is_empty() {
        return Err(EngineError::NoPlayers);
    }
    let mut seen = HashSet::new();
    for p in players {
        if !seen.insert(p.id.as_str()) {
            return Err(EngineError::DuplicatePlayer(p.id.clone()));
        }
        if let Some(d) = p.difficulty {
            validate_difficulty(d)?;
        }
    }
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiSettings {
    /// Scales every AI accuracy radius; above 1.0 makes the AI sloppier.
    #[serde(alias = "globalMultiplier")]
    pub global_multiplier: f64,
    #[serde(alias = "showVisualization")]
    pub show_visualization: bool,
}

impl Default for AiSettings {
    fn default() -> Self {
        AiSettings { global_multiplier: 1.0, show_visualization: false }
    }
}

impl AiSettings {
    pub fn validate(&self) -> Result<()> {
        if (MIN_GLOBAL_MULTIPLIER..=MAX_GLOBAL_MULTIPLIER).contains(&self.global_multiplier) {
            Ok(())
        } else {
            Err(EngineError::InvalidMultiplier(self.global_multiplier))
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: AiSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }
}
