//! Seat model - one chair at the table

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reminder sources whose tokens are public knowledge at the table
const PUBLIC_REMINDER_SOURCES: &[&str] = &["public", "virgin", "slayer"];

/// Closed set of mechanical statuses a seat can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Poisoned,
    Drunk,
    Protected,
    Madness,
}

impl SeatStatus {
    /// Statuses the seat owner is told about
    pub fn known_to_owner(&self) -> bool {
        matches!(self, SeatStatus::Madness)
    }
}

/// A storyteller-placed annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub text: String,
    /// Role whose ability placed the token
    pub source_role: String,
    /// Seat the token refers to
    pub seat_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Reminder {
    pub fn new(text: impl Into<String>, source_role: impl Into<String>, seat_id: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            source_role: source_role.into(),
            seat_id,
            icon: None,
            color: None,
        }
    }

    pub fn is_public(&self) -> bool {
        PUBLIC_REMINDER_SOURCES.contains(&self.source_role.as_str())
    }
}

/// One occupied or vacant chair, indexed by seating position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: u32,
    /// Occupant, `None` for a vacant or virtual seat
    pub user_id: Option<String>,
    pub user_name: String,
    /// Public mirror of the role, set per viewer
    pub role_id: Option<String>,
    /// Ground truth, storyteller only
    pub real_role_id: Option<String>,
    /// What the occupant was told
    pub seen_role_id: Option<String>,
    pub is_dead: bool,
    pub has_ghost_vote: bool,
    pub reminders: Vec<Reminder>,
    pub statuses: BTreeSet<SeatStatus>,
    pub has_used_ability: bool,
    pub is_hand_raised: bool,
    pub is_nominated: bool,
    pub is_virtual: bool,
    pub vote_locked: bool,
}

impl Seat {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            user_id: None,
            user_name: String::new(),
            role_id: None,
            real_role_id: None,
            seen_role_id: None,
            is_dead: false,
            has_ghost_vote: true,
            reminders: Vec::new(),
            statuses: BTreeSet::new(),
            has_used_ability: false,
            is_hand_raised: false,
            is_nominated: false,
            is_virtual: false,
            vote_locked: false,
        }
    }

    /// The role that decides game mechanics: real role, falling back to the seen role
    pub fn effective_role_id(&self) -> Option<&str> {
        self.real_role_id
            .as_deref()
            .or(self.seen_role_id.as_deref())
    }

    /// The role the occupant believes they hold
    pub fn self_view_role_id(&self) -> Option<&str> {
        self.seen_role_id
            .as_deref()
            .or(self.real_role_id.as_deref())
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    pub fn is_occupied(&self) -> bool {
        self.user_id.is_some() || self.is_virtual
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }

    pub fn has_status(&self, status: SeatStatus) -> bool {
        self.statuses.contains(&status)
    }

    /// Poisoned or drunk: the ability silently malfunctions
    pub fn is_impaired(&self) -> bool {
        self.has_status(SeatStatus::Poisoned) || self.has_status(SeatStatus::Drunk)
    }

    pub fn has_role(&self) -> bool {
        self.effective_role_id().is_some()
    }

    /// Clear per-vote transient flags
    pub fn clear_vote_flags(&mut self) {
        self.is_hand_raised = false;
        self.is_nominated = false;
        self.vote_locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_seat_holds_ghost_vote() {
        let seat = Seat::new(3);
        assert!(seat.has_ghost_vote);
        assert!(seat.is_alive());
        assert!(!seat.is_occupied());
    }

    #[test]
    fn test_effective_role_prefers_real() {
        let mut seat = Seat::new(0);
        seat.seen_role_id = Some("washerwoman".into());
        assert_eq!(seat.effective_role_id(), Some("washerwoman"));

        seat.real_role_id = Some("drunk".into());
        assert_eq!(seat.effective_role_id(), Some("drunk"));
        assert_eq!(seat.self_view_role_id(), Some("washerwoman"));
    }

    #[test]
    fn test_impairment() {
        let mut seat = Seat::new(0);
        assert!(!seat.is_impaired());
        seat.statuses.insert(SeatStatus::Protected);
        assert!(!seat.is_impaired());
        seat.statuses.insert(SeatStatus::Drunk);
        assert!(seat.is_impaired());
    }

    #[test]
    fn test_reminder_visibility() {
        assert!(Reminder::new("No ability", "slayer", 1).is_public());
        assert!(!Reminder::new("Poisoned", "poisoner", 1).is_public());
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&SeatStatus::Poisoned).unwrap();
        assert_eq!(json, "\"POISONED\"");
    }
}
