use crate::rules::CRICKET_NUMBERS;
use crate::segment::Segment;
use crate::stats::{GameStatistics, LegStatistics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type PlayerId = String;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameType {
    #[serde(rename = "301")]
    ThreeOhOne,
    #[serde(rename = "501")]
    FiveOhOne,
    #[serde(rename = "cricket")]
    Cricket,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CricketVariant {
    #[default]
    Standard,
    Cutthroat,
    NoScore,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameRules {
    pub game_type: GameType,
    pub double_in: bool,
    pub double_out: bool,
    pub cricket_variant: Option<CricketVariant>,
    pub best_of: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Human,
    Ai,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub kind: PlayerKind,
    pub difficulty: Option<u8>, // ai only
    pub color: String,
}

impl Player {
    pub fn human(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Player { id: id.into(), name: name.into(), kind: PlayerKind::Human, difficulty: None, color: "#1E88E5".into() }
    }

    pub fn ai(id: impl Into<PlayerId>, name: impl Into<String>, difficulty: u8) -> Self {
        Player { id: id.into(), name: name.into(), kind: PlayerKind::Ai, difficulty: Some(difficulty), color: "#E53935".into() }
    }

    pub fn is_ai(&self) -> bool {
        self.kind == PlayerKind::Ai
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One dart. `segment == None` is a miss.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Throw {
    pub segment: Option<Segment>,
    pub player_id: PlayerId,
    pub timestamp: DateTime<Utc>,
    pub coordinates: Option<Point>,
}

impl Throw {
    pub fn new(segment: Option<Segment>, player_id: impl Into<PlayerId>) -> Self {
        Throw { segment, player_id: player_id.into(), timestamp: Utc::now(), coordinates: None }
    }

    pub fn miss(player_id: impl Into<PlayerId>) -> Self {
        Throw::new(None, player_id)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct X01Score {
    pub remaining: u32,
    pub darts_thrown: u32,
    pub has_doubled_in: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CricketMark {
    pub number: u8,
    pub marks: u8, // 0..=3
}

impl CricketMark {
    pub fn closed(&self) -> bool {
        self.marks >= 3
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CricketScore {
    pub marks: Vec<CricketMark>,
    pub points: u32,
}

impl Default for CricketScore {
    fn default() -> Self {
        CricketScore {
            marks: CRICKET_NUMBERS.iter().map(|&number| CricketMark { number, marks: 0 }).collect(),
            points: 0,
        }
    }
}

impl CricketScore {
    pub fn mark(&self, number: u8) -> Option<&CricketMark> {
        self.marks.iter().find(|m| m.number == number)
    }

    pub fn is_closed(&self, number: u8) -> bool {
        self.mark(number).is_some_and(CricketMark::closed)
    }

    pub fn all_closed(&self) -> bool {
        self.marks.iter().all(CricketMark::closed)
    }

    pub fn closed_count(&self) -> usize {
        self.marks.iter().filter(|m| m.closed()).count()
    }
}

/// Per-player scores for one leg, tagged once by game family.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "scores", rename_all = "lowercase")]
pub enum LegScores {
    X01(BTreeMap<PlayerId, X01Score>),
    Cricket(BTreeMap<PlayerId, CricketScore>),
}

impl LegScores {
    pub fn x01(&self, player_id: &str) -> Option<&X01Score> {
        match self {
            LegScores::X01(scores) => scores.get(player_id),
            LegScores::Cricket(_) => None,
        }
    }

    pub fn cricket(&self, player_id: &str) -> Option<&CricketScore> {
        match self {
            LegScores::Cricket(scores) => scores.get(player_id),
            LegScores::X01(_) => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LegState {
    pub leg_number: u32,
    pub winner_id: Option<PlayerId>,
    pub throws: Vec<Throw>,
    pub scores: LegScores,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub id: String,
    pub rules: GameRules,
    pub players: Vec<Player>,
    pub current_player_index: usize,
    pub current_throw_in_turn: u8,
    pub legs: Vec<LegState>,
    pub current_leg_index: usize,
    pub legs_won: BTreeMap<PlayerId, u32>,
    pub match_winner_id: Option<PlayerId>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl GameState {
    pub fn current_leg(&self) -> &LegState {
        &self.legs[self.current_leg_index]
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    pub fn darts_left_in_turn(&self) -> u8 {
        3u8.saturating_sub(self.current_throw_in_turn)
    }

    /// Three darts are down and the caller has not advanced with `next_turn` yet.
    pub fn turn_complete(&self) -> bool {
        self.current_throw_in_turn >= 3
    }

    pub fn is_match_over(&self) -> bool {
        self.match_winner_id.is_some()
    }

    pub fn awaiting_next_leg(&self) -> bool {
        self.match_winner_id.is_none() && self.current_leg().winner_id.is_some()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameHistory {
    pub id: String,
    pub game_type: GameType,
    pub rules: GameRules,
    pub players: Vec<PlayerRef>,
    pub winner_id: Option<PlayerId>,
    pub legs: Vec<LegState>,
    pub legs_won: BTreeMap<PlayerId, u32>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub statistics: GameStatistics,
}

impl GameHistory {
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BustInfo {
    pub player_id: PlayerId,
    pub score_before_bust: u32,
}

/// What `record_throw` did with a dart.
#[derive(Clone, Debug, PartialEq)]
pub enum ThrowOutcome {
    Scored,
    Bust(BustInfo),
    LegWon(LegStatistics),
    MatchWon { winner_id: PlayerId },
    Ignored,
}
