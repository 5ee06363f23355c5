//! X01 (301/501) dart scoring for a single player.

use crate::model::{GameRules, X01Score};
use crate::segment::Segment;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct X01Outcome {
    pub score: X01Score,
    pub bust: bool,
    pub won: bool,
}

pub fn initial_x01_score(start: u32, rules: &GameRules) -> X01Score {
    X01Score { remaining: start, darts_thrown: 0, has_doubled_in: !rules.double_in }
}

/// Would landing `target` from `remaining` be a bust?
pub fn would_bust(remaining: u32, target: &Segment, double_out: bool) -> bool {
    let Some(after) = remaining.checked_sub(target.points()) else {
        return true;
    };
    (double_out && after == 1) || (double_out && after == 0 && !target.is_finisher())
}

/// Apply one dart to one player's score.
///
/// On a bust the pre-throw score comes back untouched; rolling the whole turn
/// back is the state machine's job.
pub fn apply_x01_throw(score: &X01Score, segment: Option<&Segment>, rules: &GameRules) -> X01Outcome {
    let thrown = X01Score { darts_thrown: score.darts_thrown + 1, ..score.clone() };
    let Some(seg) = segment else {
        return X01Outcome { score: thrown, bust: false, won: false };
    };

    if rules.double_in && !score.has_doubled_in && !seg.is_finisher() {
        debug!(segment = %seg, "dart wasted before double-in");
        return X01Outcome { score: thrown, bust: false, won: false };
    }

    if would_bust(score.remaining, seg, rules.double_out) {
        debug!(segment = %seg, remaining = score.remaining, "bust");
        return X01Outcome { score: score.clone(), bust: true, won: false };
    }

    let remaining = score.remaining - seg.points();
    X01Outcome {
        score: X01Score { remaining, darts_thrown: score.darts_thrown + 1, has_doubled_in: true },
        bust: false,
        won: remaining == 0,
    }
}
