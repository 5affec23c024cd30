//! Night action requests submitted by players

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rng::generate_short_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NightActionStatus {
    Pending,
    Resolved,
    Dismissed,
}

/// A player's choice for their night ability, awaiting the storyteller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightActionRequest {
    pub id: String,
    pub seat_id: u32,
    pub role_id: String,
    pub targets: Vec<u32>,
    pub note: Option<String>,
    pub status: NightActionStatus,
    /// Storyteller's answer, delivered to the owning seat
    pub response: Option<String>,
    pub night: u32,
    pub created_at: DateTime<Utc>,
}

impl NightActionRequest {
    pub fn new(seat_id: u32, role_id: String, targets: Vec<u32>, note: Option<String>, night: u32) -> Self {
        Self {
            id: generate_short_id(),
            seat_id,
            role_id,
            targets,
            note,
            status: NightActionStatus::Pending,
            response: None,
            night,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == NightActionStatus::Pending
    }
}
