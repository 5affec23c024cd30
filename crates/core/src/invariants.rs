//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::{GameState, Phase, Seat};

/// Validate that a game state is internally consistent
pub fn assert_game_invariants(state: &GameState) {
    assert_seat_list_invariants(&state.seats, &state.room_id);

    // Cursor is -1 (dusk) or inside the queue
    debug_assert!(
        state.night_current_index >= -1
            && (state.night_current_index as i64) < state.night_queue.len().max(1) as i64,
        "Room {} night cursor {} out of range for queue of {}",
        state.room_id,
        state.night_current_index,
        state.night_queue.len()
    );
    debug_assert!(
        !state.night_queue.is_empty() || state.night_current_index == -1,
        "Room {} has an empty night queue but cursor {}",
        state.room_id,
        state.night_current_index
    );

    if let Some(voting) = &state.voting {
        let unique: HashSet<_> = voting.votes.iter().collect();
        debug_assert!(
            unique.len() == voting.votes.len(),
            "Room {} vote has duplicate voters: {:?}",
            state.room_id,
            voting.votes
        );
        debug_assert!(
            state.seat(voting.nominee_seat_id).is_some(),
            "Room {} vote nominates missing seat {}",
            state.room_id,
            voting.nominee_seat_id
        );
    }

    // Terminal flag and phase move together
    debug_assert!(
        state.game_over.is_over == (state.phase == Phase::GameOver),
        "Room {} game over flag {} disagrees with phase {}",
        state.room_id,
        state.game_over.is_over,
        state.phase
    );
    debug_assert!(
        state.game_over.is_over || state.game_over.winner.is_none(),
        "Room {} has a winner but the game is not over",
        state.room_id
    );
}

/// Validate that seats are uniquely numbered and role fields are set together
pub fn assert_seat_list_invariants(seats: &[Seat], room_id: &str) {
    let ids: HashSet<u32> = seats.iter().map(|s| s.id).collect();
    debug_assert!(
        ids.len() == seats.len(),
        "Room {} has duplicate seat ids",
        room_id
    );

    let users: Vec<&str> = seats.iter().filter_map(|s| s.user_id.as_deref()).collect();
    let unique_users: HashSet<&str> = users.iter().copied().collect();
    debug_assert!(
        unique_users.len() == users.len(),
        "Room {} seats the same user twice",
        room_id
    );

    for seat in seats {
        debug_assert!(
            seat.real_role_id.is_some() == seat.seen_role_id.is_some(),
            "Room {} seat {} has only one of real/seen role set",
            room_id,
            seat.id
        );
        debug_assert!(
            seat.role_id == seat.seen_role_id,
            "Room {} seat {} public role {:?} differs from seen role {:?}",
            room_id,
            seat.id,
            seat.role_id,
            seat.seen_role_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_is_valid() {
        assert_game_invariants(&GameState::new("ROOM01", "trouble_brewing"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate seat ids")]
    fn test_duplicate_seat_ids_detected() {
        let seats = vec![Seat::new(1), Seat::new(1)];
        assert_seat_list_invariants(&seats, "ROOM01");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "disagrees with phase")]
    fn test_game_over_without_phase_detected() {
        let mut state = GameState::new("ROOM01", "trouble_brewing");
        state.game_over.is_over = true;
        assert_game_invariants(&state);
    }
}
