//! Storyteller notes and the interaction log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Private storyteller annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorytellerNote {
    pub id: String,
    pub seat_id: Option<u32>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl StorytellerNote {
    pub fn new(text: String, seat_id: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            seat_id,
            text,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    RoleAssigned,
    RoleChanged,
    Death,
    Revival,
    Execution,
    Nomination,
    VoteClosed,
    GhostVoteUsed,
    DemonSuccession,
    NightActionResolved,
    GameEnded,
}

/// Append-only record of what happened at the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionLogEntry {
    pub id: String,
    pub kind: InteractionKind,
    pub seat_id: Option<u32>,
    pub detail: String,
    pub day: u32,
    pub night: u32,
    pub timestamp: DateTime<Utc>,
}
