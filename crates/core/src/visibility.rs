//! Per-viewer state filter and the storyteller's secret overlay
//!
//! [`filter_game_state_for_user`] projects what one participant is allowed to
//! see. It is pure and idempotent. It is not a security boundary on its own:
//! whatever serves state to clients must apply it on the server side.

use serde::{Deserialize, Serialize};

use crate::models::{GameState, InteractionLogEntry, NightActionRequest, Seat, StorytellerNote};

/// Read-only projection of `state` for one viewer
pub fn filter_game_state_for_user(
    state: &GameState,
    viewer_user_id: &str,
    is_storyteller: bool,
) -> GameState {
    if is_storyteller {
        return state.clone();
    }

    let mut view = state.clone();
    let own_seat_id = state.seat_of_user(viewer_user_id).map(|s| s.id);
    let sees_grimoire = own_seat_id
        .and_then(|id| state.seat(id))
        .filter(|_| state.roles_revealed)
        .and_then(Seat::self_view_role_id)
        .and_then(|id| state.catalog().role(id))
        .is_some_and(|role| role.sees_grimoire());

    for seat in &mut view.seats {
        if sees_grimoire {
            project_grimoire_seat(seat);
        } else if Some(seat.id) == own_seat_id {
            project_own_seat(seat, state.roles_revealed);
        } else {
            project_other_seat(seat);
        }
    }

    view.messages.retain(|m| m.visible_to(viewer_user_id));
    view.night_action_requests
        .retain(|r| Some(r.seat_id) == own_seat_id);
    view.storyteller_notes.clear();
    view.interaction_log.clear();
    view.night_queue.clear();
    view.night_current_index = -1;

    view
}

/// Grimoire sight: every seen role, never the truth
fn project_grimoire_seat(seat: &mut Seat) {
    seat.role_id = seat.seen_role_id.clone();
    seat.real_role_id = None;
}

fn project_own_seat(seat: &mut Seat, roles_revealed: bool) {
    let told = if roles_revealed {
        seat.self_view_role_id().map(str::to_string)
    } else {
        None
    };
    seat.role_id = told.clone();
    seat.seen_role_id = told;
    seat.real_role_id = None;
    seat.statuses.retain(|s| s.known_to_owner());
    seat.reminders.retain(|r| r.is_public());
}

fn project_other_seat(seat: &mut Seat) {
    seat.role_id = None;
    seat.real_role_id = None;
    seat.seen_role_id = None;
    seat.statuses.clear();
    seat.reminders.retain(|r| r.is_public());
    seat.has_used_ability = false;
}

/// Role fields of one seat, kept out of the public record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSecret {
    pub seat_id: u32,
    pub real_role_id: Option<String>,
    pub seen_role_id: Option<String>,
}

/// Storyteller-only data stored apart from the public state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretOverlay {
    pub seats: Vec<SeatSecret>,
    pub storyteller_notes: Vec<StorytellerNote>,
    pub night_action_requests: Vec<NightActionRequest>,
    pub interaction_log: Vec<InteractionLogEntry>,
}

/// Separate the secret parts of a full state from what may be stored publicly
pub fn split_secrets(state: &GameState) -> (GameState, SecretOverlay) {
    let mut public = state.clone();

    let seats = public
        .seats
        .iter_mut()
        .map(|seat| SeatSecret {
            seat_id: seat.id,
            real_role_id: seat.real_role_id.take(),
            seen_role_id: seat.seen_role_id.take(),
        })
        .collect();
    for seat in &mut public.seats {
        seat.role_id = None;
    }

    let overlay = SecretOverlay {
        seats,
        storyteller_notes: std::mem::take(&mut public.storyteller_notes),
        night_action_requests: std::mem::take(&mut public.night_action_requests),
        interaction_log: std::mem::take(&mut public.interaction_log),
    };
    (public, overlay)
}

/// Rebuild the full state from its public part and the overlay
pub fn merge_secrets(mut public: GameState, overlay: &SecretOverlay) -> GameState {
    for secret in &overlay.seats {
        if let Some(seat) = public.seat_mut(secret.seat_id) {
            seat.real_role_id = secret.real_role_id.clone();
            seat.seen_role_id = secret.seen_role_id.clone();
            seat.role_id = secret.seen_role_id.clone();
        }
    }
    public.storyteller_notes = overlay.storyteller_notes.clone();
    public.night_action_requests = overlay.night_action_requests.clone();
    public.interaction_log = overlay.interaction_log.clone();
    public
}
