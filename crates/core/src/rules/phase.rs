//! Phase transitions and their side effects

use tracing::info;

use crate::models::{GameState, Phase};
use crate::night_order::{build_night_queue, is_first_night};

/// Apply the bookkeeping that comes with moving from `old` to `new`
///
/// The caller sets `state.phase`; this only updates what depends on it.
pub fn handle_phase_change(state: &mut GameState, new: Phase, old: Phase) {
    if new == old {
        return;
    }

    state.push_system_message(new.label());

    match new {
        Phase::Night => {
            state.round_info.night_count += 1;
            state.round_info.total_rounds += 1;
            let first = is_first_night(&state.seats);
            let queue = build_night_queue(&state.catalog(), &state.seats, first);
            state.night_queue = queue;
            state.night_current_index = if state.night_queue.is_empty() { -1 } else { 0 };
            state.voting = None;
            for seat in &mut state.seats {
                seat.clear_vote_flags();
            }
        }
        // Returning from a vote stays on the same day
        Phase::Day if !old.is_daytime() => {
            state.round_info.day_count += 1;
            state.executed_today = None;
        }
        _ => {}
    }

    info!(
        room = %state.room_id,
        from = %old,
        to = %new,
        day = state.round_info.day_count,
        night = state.round_info.night_count,
        "Phase changed"
    );
}

/// Move the night cursor one step; returns the role now acting
pub fn step_night(state: &mut GameState, forward: bool) -> Option<&str> {
    if state.night_queue.is_empty() {
        state.night_current_index = -1;
        return None;
    }

    let last = state.night_queue.len() as i32 - 1;
    state.night_current_index = if forward {
        (state.night_current_index + 1).min(last)
    } else {
        (state.night_current_index - 1).max(0)
    };

    state
        .night_queue
        .get(state.night_current_index as usize)
        .map(String::as_str)
}
