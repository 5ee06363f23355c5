use crate::segment::Ring;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("checkout score out of range: {0} (expected 2..=170)")]
    ScoreOutOfRange(u32),

    #[error("darts left out of range: {0} (expected 1..=3)")]
    DartsLeftOutOfRange(u8),

    #[error("invalid preferred double: {0} (expected 1..=20 or 25)")]
    InvalidPreferredDouble(u8),

    #[error("best-of must be an odd number >= 1, got {0}")]
    InvalidBestOf(u32),

    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("duplicate player id: {0}")]
    DuplicatePlayer(String),

    #[error("AI difficulty out of range: {0} (expected 1..=10)")]
    InvalidDifficulty(u8),

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    #[error("AI global multiplier out of range: {0} (expected 0.5..=2.0)")]
    InvalidMultiplier(f64),

    #[error("invalid segment notation: {0:?}")]
    InvalidSegment(String),

    #[error("no {ring:?} segment numbered {number}")]
    SegmentOutOfRange { number: u8, ring: Ring },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
