//! Game rules
//!
//! Pure state transitions over a [`GameState`](crate::models::GameState).
//! Invalid references (unknown seat, unknown reminder) are silent no-ops;
//! rule violations come back as errors.

mod phase;
mod seats;
mod voting;
mod win;

pub use phase::{handle_phase_change, step_night};
pub use seats::{
    add_reminder, apply_role_to_seat, remove_reminder, set_seat_role, toggle_dead, toggle_status,
    DeathToggle,
};
pub use voting::{
    advance_clock_hand, close_vote, create_voting_state, eligible_voter_count,
    execution_candidate, lower_hand, next_living_seat, raise_hand, start_vote, use_ghost_vote,
    vote_passes, EXECUTION_VOTE_RATIO,
};
pub use win::{
    check_evil_win, check_game_over, check_good_win, WinContext, WinResult, DEMON_DEAD,
    EVIL_WIN_THRESHOLD, MAYOR_VICTORY, MAYOR_WIN_ALIVE_COUNT, SAINT_EXECUTED, TOO_FEW_ALIVE,
};
