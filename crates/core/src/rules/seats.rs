//! Seat mutations: roles, death, statuses and reminders

use tracing::{debug, info};

use crate::catalog::Team;
use crate::models::{GameState, InteractionKind, Reminder, Seat, SeatStatus};

/// Role a living Scarlet Woman holds
const SCARLET_WOMAN: &str = "scarlet_woman";

/// Give a seat a role, clearing any ability or status residue
pub fn apply_role_to_seat(seat: &mut Seat, role_id: &str) {
    seat.role_id = Some(role_id.to_string());
    seat.real_role_id = Some(role_id.to_string());
    seat.seen_role_id = Some(role_id.to_string());
    seat.has_used_ability = false;
    seat.statuses.clear();
}

/// Result of flipping a seat's life state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathToggle {
    pub seat_id: u32,
    pub is_dead: bool,
    /// Seat that inherited the demon role, if any
    pub successor: Option<u32>,
}

/// Flip a seat between alive and dead
///
/// Dying always grants a ghost vote; coming back does not take it away.
/// When a demon dies, a living Scarlet Woman becomes the demon. A non-zero
/// `scarlet_woman_min_alive` requires that many players alive before the death.
pub fn toggle_dead(
    state: &mut GameState,
    seat_id: u32,
    scarlet_woman_min_alive: usize,
) -> Option<DeathToggle> {
    let alive_before = state.alive_count();
    let catalog = state.catalog();
    let demon_role = state
        .seat(seat_id)
        .filter(|s| s.is_alive())
        .and_then(Seat::effective_role_id)
        .filter(|id| catalog.team_of(id) == Some(Team::Demon))
        .map(str::to_string);

    let Some(seat) = state.seat_mut(seat_id) else {
        debug!(seat = seat_id, "Seat not found, ignoring death toggle");
        return None;
    };
    seat.is_dead = !seat.is_dead;
    let is_dead = seat.is_dead;
    if is_dead {
        seat.has_ghost_vote = true;
    }

    state.log_interaction(
        if is_dead {
            InteractionKind::Death
        } else {
            InteractionKind::Revival
        },
        Some(seat_id),
        format!("Seat {} {}", seat_id, if is_dead { "died" } else { "revived" }),
    );

    let successor = match demon_role {
        Some(demon) if is_dead && alive_before >= scarlet_woman_min_alive => {
            promote_scarlet_woman(state, &demon)
        }
        _ => None,
    };

    Some(DeathToggle {
        seat_id,
        is_dead,
        successor,
    })
}

fn promote_scarlet_woman(state: &mut GameState, demon_role: &str) -> Option<u32> {
    let heir = state
        .seats
        .iter_mut()
        .find(|s| s.is_alive() && s.effective_role_id() == Some(SCARLET_WOMAN))?;

    heir.real_role_id = Some(demon_role.to_string());
    heir.seen_role_id = Some(demon_role.to_string());
    heir.role_id = Some(demon_role.to_string());
    let heir_id = heir.id;

    state.log_interaction(
        InteractionKind::DemonSuccession,
        Some(heir_id),
        format!("Seat {} became the {}", heir_id, demon_role),
    );
    info!(seat = heir_id, demon = demon_role, "Scarlet Woman inherited the demon");
    Some(heir_id)
}

/// Add the status if absent, remove it if present; returns whether it is now set
pub fn toggle_status(seat: &mut Seat, status: SeatStatus) -> bool {
    if seat.statuses.remove(&status) {
        false
    } else {
        seat.statuses.insert(status);
        true
    }
}

pub fn add_reminder(state: &mut GameState, reminder: Reminder) -> bool {
    match state.seat_mut(reminder.seat_id) {
        Some(seat) => {
            seat.reminders.push(reminder);
            true
        }
        None => {
            debug!(seat = reminder.seat_id, "Seat not found, dropping reminder");
            false
        }
    }
}

pub fn remove_reminder(state: &mut GameState, reminder_id: &str) -> bool {
    for seat in &mut state.seats {
        let before = seat.reminders.len();
        seat.reminders.retain(|r| r.id != reminder_id);
        if seat.reminders.len() != before {
            return true;
        }
    }
    debug!(reminder = reminder_id, "Reminder not found");
    false
}

/// Set a seat's role explicitly, logging the change
pub fn set_seat_role(state: &mut GameState, seat_id: u32, role_id: &str) -> bool {
    if state.catalog().role(role_id).is_none() {
        debug!(role = role_id, "Unknown role, ignoring");
        return false;
    }
    let Some(seat) = state.seat_mut(seat_id) else {
        debug!(seat = seat_id, "Seat not found, ignoring role change");
        return false;
    };
    apply_role_to_seat(seat, role_id);
    state.log_interaction(
        InteractionKind::RoleChanged,
        Some(seat_id),
        format!("Seat {} is now the {}", seat_id, role_id),
    );
    true
}
