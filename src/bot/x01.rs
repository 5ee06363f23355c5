use crate::checkout::{compute_checkout, is_checkable, MAX_CHECKOUT, MIN_CHECKOUT};
use crate::model::GameState;
use crate::segment::{d, s, t, Segment};

const SETUP_TREBLES: [u8; 3] = [20, 19, 18];

/// Target for the next X01 dart. Every level aims the same way; skill only
/// shows in how far the dart strays.
pub fn choose_x01_target(state: &GameState, player_id: &str) -> Segment {
    let Some(score) = state.current_leg().scores.x01(player_id) else {
        return t(20);
    };
    let remaining = score.remaining;

    if state.rules.double_in && !score.has_doubled_in {
        return d(20);
    }

    if (MIN_CHECKOUT..=MAX_CHECKOUT).contains(&remaining) {
        let darts_left = state.darts_left_in_turn().max(1);
        if let Ok(path) = compute_checkout(remaining, None, darts_left) {
            if let Some(first) = path.darts.first().filter(|_| path.possible) {
                return *first;
            }
        }
    }

    if remaining > MAX_CHECKOUT {
        return t(20);
    }

    // odd and low: a single that leaves an even number
    if remaining < 40 && remaining % 2 == 1 && remaining > 2 {
        return s((remaining - 2).min(20) as u8);
    }

    for number in SETUP_TREBLES {
        let after = remaining.checked_sub(t(number).points());
        if after.is_some_and(|a| a > 1 && is_checkable(a, 3)) {
            return t(number);
        }
    }

    if remaining <= 60 {
        for number in (10..=20u8).rev() {
            let after = remaining.checked_sub(u32::from(number));
            if after.is_some_and(|a| (2..=40).contains(&a) && a % 2 == 0) {
                return s(number);
            }
        }
    }

    t(20)
}
