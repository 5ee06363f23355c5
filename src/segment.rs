//! Dartboard segments: the value type every other module scores with.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const BULL_NUMBER: u8 = 25;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Ring {
    Single,
    Double,
    Triple,
    OuterBull,
    InnerBull,
}

impl Ring {
    pub const fn multiplier(self) -> u32 {
        match self {
            Ring::Single | Ring::OuterBull => 1,
            Ring::Double | Ring::InnerBull => 2,
            Ring::Triple => 3,
        }
    }

    pub const fn is_bull(self) -> bool {
        matches!(self, Ring::OuterBull | Ring::InnerBull)
    }

    /// Rings that may finish a double-out leg (and open a double-in one).
    pub const fn is_finisher(self) -> bool {
        matches!(self, Ring::Double | Ring::InnerBull)
    }

    /// Lower is easier to aim at when several rings give the same points.
    pub const fn setup_rank(self) -> u8 {
        match self {
            Ring::Single => 1,
            Ring::OuterBull => 2,
            Ring::Double => 3,
            Ring::Triple => 4,
            Ring::InnerBull => 5,
        }
    }
}

/// A scoring area on the board. Points and multiplier are always derived
/// from `(number, ring)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "RawSegment")]
pub struct Segment {
    number: u8,
    ring: Ring,
}

/// Wire shape of a segment before range checks.
#[derive(Deserialize)]
struct RawSegment {
    number: u8,
    ring: Ring,
}

impl TryFrom<RawSegment> for Segment {
    type Error = EngineError;

    fn try_from(raw: RawSegment) -> Result<Self, Self::Error> {
        Segment::checked(raw.number, raw.ring)
    }
}

pub const BULL: Segment = Segment::new(BULL_NUMBER, Ring::InnerBull);
pub const OUTER_BULL: Segment = Segment::new(BULL_NUMBER, Ring::OuterBull);

pub const fn s(number: u8) -> Segment {
    Segment::new(number, Ring::Single)
}

pub const fn d(number: u8) -> Segment {
    Segment::new(number, Ring::Double)
}

pub const fn t(number: u8) -> Segment {
    Segment::new(number, Ring::Triple)
}

impl Segment {
    /// Bull rings always carry number 25 regardless of the number passed.
    pub const fn new(number: u8, ring: Ring) -> Self {
        let number = if ring.is_bull() { BULL_NUMBER } else { number };
        Segment { number, ring }
    }

    /// Like `new`, but rejects numbers off the board. A single or double 25
    /// is the matching bull ring; there is no treble bull.
    pub fn checked(number: u8, ring: Ring) -> Result<Self, EngineError> {
        match (ring, number) {
            (Ring::OuterBull | Ring::InnerBull, _) => Ok(Segment::new(number, ring)),
            (Ring::Single, BULL_NUMBER) => Ok(OUTER_BULL),
            (Ring::Double, BULL_NUMBER) => Ok(BULL),
            (_, 1..=20) => Ok(Segment::new(number, ring)),
            _ => Err(EngineError::SegmentOutOfRange { number, ring }),
        }
    }

    pub const fn number(&self) -> u8 {
        self.number
    }

    pub const fn ring(&self) -> Ring {
        self.ring
    }

    pub const fn multiplier(&self) -> u32 {
        self.ring.multiplier()
    }

    pub const fn base_value(&self) -> u32 {
        if self.ring.is_bull() {
            BULL_NUMBER as u32
        } else {
            self.number as u32
        }
    }

    pub const fn points(&self) -> u32 {
        self.base_value() * self.multiplier()
    }

    pub const fn is_finisher(&self) -> bool {
        self.ring.is_finisher()
    }

    /// Compact notation used by checkout displays: `T20`, `D16`, `Bull`, `25`, `7`.
    pub fn checkout_label(&self) -> String {
        match self.ring {
            Ring::InnerBull => "Bull".to_string(),
            Ring::OuterBull => "25".to_string(),
            Ring::Double => format!("D{}", self.number),
            Ring::Triple => format!("T{}", self.number),
            Ring::Single => self.number.to_string(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ring {
            Ring::InnerBull => write!(f, "Bull (50)"),
            Ring::OuterBull => write!(f, "Bull (25)"),
            Ring::Double => write!(f, "D{}", self.number),
            Ring::Triple => write!(f, "T{}", self.number),
            Ring::Single => write!(f, "{}", self.number),
        }
    }
}

impl FromStr for Segment {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        let invalid = || EngineError::InvalidSegment(raw.to_string());
        if text.eq_ignore_ascii_case("bull") {
            return Ok(BULL);
        }
        let (ring, digits) = match text.chars().next() {
            Some('T') | Some('t') => (Ring::Triple, &text[1..]),
            Some('D') | Some('d') => (Ring::Double, &text[1..]),
            _ => (Ring::Single, text),
        };
        let number: u8 = digits.parse().map_err(|_| invalid())?;
        match (ring, number) {
            (Ring::Single, BULL_NUMBER) => Ok(OUTER_BULL),
            (Ring::Double, BULL_NUMBER) => Ok(BULL),
            (_, 1..=20) => Ok(Segment::new(number, ring)),
            _ => Err(invalid()),
        }
    }
}

pub fn create_segment(number: u8, ring: Ring) -> crate::error::Result<Segment> {
    Segment::checked(number, ring)
}

pub fn format_segment(segment: Option<&Segment>) -> String {
    match segment {
        Some(seg) => seg.to_string(),
        None => "Miss".to_string(),
    }
}

/// Every distinct scoring segment: both bulls, then single/double/triple for 1..=20.
pub fn all_segments() -> Vec<Segment> {
    let mut segments = Vec::with_capacity(62);
    segments.push(BULL);
    segments.push(OUTER_BULL);
    for number in 1..=20 {
        segments.push(s(number));
        segments.push(d(number));
        segments.push(t(number));
    }
    segments
}
