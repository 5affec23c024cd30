//! Player operation vocabulary
//!
//! The narrow set of mutations a player client may request. The same values
//! are queued offline and replayed against the room store.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{ChatMessage, GameState, NightActionRequest};
use crate::rules;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerOperation {
    RaiseHand {
        seat_id: u32,
    },
    LowerHand {
        seat_id: u32,
    },
    NightAction {
        seat_id: u32,
        role_id: String,
        #[serde(default)]
        targets: Vec<u32>,
        #[serde(default)]
        note: Option<String>,
    },
    SendMessage {
        content: String,
        #[serde(default)]
        recipient_id: Option<String>,
    },
    UpdateReminder {
        reminder_id: String,
        text: String,
    },
}

impl PlayerOperation {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerOperation::RaiseHand { .. } => "raise_hand",
            PlayerOperation::LowerHand { .. } => "lower_hand",
            PlayerOperation::NightAction { .. } => "night_action",
            PlayerOperation::SendMessage { .. } => "send_message",
            PlayerOperation::UpdateReminder { .. } => "update_reminder",
        }
    }

    /// Seat the operation acts on, when it targets one directly
    pub fn seat_id(&self) -> Option<u32> {
        match self {
            PlayerOperation::RaiseHand { seat_id }
            | PlayerOperation::LowerHand { seat_id }
            | PlayerOperation::NightAction { seat_id, .. } => Some(*seat_id),
            PlayerOperation::SendMessage { .. } | PlayerOperation::UpdateReminder { .. } => None,
        }
    }
}

/// Apply a player operation on behalf of `actor`
///
/// Players may only act on their own seat; the storyteller may act on any.
/// Returns whether the state changed.
pub fn apply_player_operation(
    state: &mut GameState,
    actor: &str,
    is_storyteller: bool,
    op: &PlayerOperation,
) -> Result<bool> {
    if let Some(seat_id) = op.seat_id() {
        authorize_seat(state, actor, is_storyteller, seat_id, op)?;
    }

    let changed = match op {
        PlayerOperation::RaiseHand { seat_id } => rules::raise_hand(state, *seat_id),
        PlayerOperation::LowerHand { seat_id } => rules::lower_hand(state, *seat_id),
        PlayerOperation::NightAction {
            seat_id,
            role_id,
            targets,
            note,
        } => {
            if state.seat(*seat_id).is_none() {
                return Ok(false);
            }
            let night = state.round_info.night_count;
            state.night_action_requests.push(NightActionRequest::new(
                *seat_id,
                role_id.clone(),
                targets.clone(),
                note.clone(),
                night,
            ));
            true
        }
        PlayerOperation::SendMessage {
            content,
            recipient_id,
        } => {
            let sender_name = if is_storyteller {
                "Storyteller".to_string()
            } else {
                match state.seat_of_user(actor) {
                    Some(seat) => seat.user_name.clone(),
                    None => return Err(Error::Unauthorized(format!("{} is not seated", actor))),
                }
            };
            state.messages.push(ChatMessage::chat(
                actor.to_string(),
                sender_name,
                content.clone(),
                recipient_id.clone(),
            ));
            true
        }
        PlayerOperation::UpdateReminder { reminder_id, text } => {
            update_reminder(state, actor, is_storyteller, reminder_id, text)?
        }
    };
    Ok(changed)
}

fn authorize_seat(
    state: &GameState,
    actor: &str,
    is_storyteller: bool,
    seat_id: u32,
    op: &PlayerOperation,
) -> Result<()> {
    if is_storyteller {
        return Ok(());
    }
    match state.seat(seat_id) {
        // stale reference: let the operation no-op
        None => Ok(()),
        Some(seat) if seat.is_owned_by(actor) => Ok(()),
        Some(_) => {
            warn!(actor, seat = seat_id, op = op.name(), "Rejected operation on another seat");
            Err(Error::Unauthorized(format!(
                "{} may not {} for seat {}",
                actor,
                op.name(),
                seat_id
            )))
        }
    }
}

fn update_reminder(
    state: &mut GameState,
    actor: &str,
    is_storyteller: bool,
    reminder_id: &str,
    text: &str,
) -> Result<bool> {
    let Some(seat) = state
        .seats
        .iter_mut()
        .find(|s| s.reminders.iter().any(|r| r.id == reminder_id))
    else {
        return Ok(false);
    };
    if !is_storyteller && !seat.is_owned_by(actor) {
        return Err(Error::Unauthorized(format!(
            "{} may not edit reminders on seat {}",
            actor, seat.id
        )));
    }

    for reminder in seat.reminders.iter_mut().filter(|r| r.id == reminder_id) {
        reminder.text = text.to_string();
    }
    Ok(true)
}
