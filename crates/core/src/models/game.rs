//! GameState - the authoritative snapshot for one room

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::log::{InteractionKind, InteractionLogEntry, StorytellerNote};
use super::message::ChatMessage;
use super::night_action::NightActionRequest;
use super::seat::Seat;
use super::voting::{DailyNomination, VoteRecord, VotingState};
use crate::catalog::{Alignment, Catalog, CustomRole, CustomScript};

/// Top-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Setup,
    Night,
    Day,
    Nomination,
    Voting,
    GameOver,
}

impl Phase {
    /// Announcement used for the phase-change system message
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Setup => "Setting up the game",
            Phase::Night => "Night falls",
            Phase::Day => "Dawn breaks",
            Phase::Nomination => "Nominations are open",
            Phase::Voting => "Voting has begun",
            Phase::GameOver => "The game is over",
        }
    }

    /// Phases that belong to the daytime
    pub fn is_daytime(&self) -> bool {
        matches!(self, Phase::Day | Phase::Nomination | Phase::Voting)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Setup => "SETUP",
            Phase::Night => "NIGHT",
            Phase::Day => "DAY",
            Phase::Nomination => "NOMINATION",
            Phase::Voting => "VOTING",
            Phase::GameOver => "GAME_OVER",
        };
        f.write_str(s)
    }
}

/// Sub-state of `Phase::Setup`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupPhase {
    Assigning,
    Ready,
    Started,
}

/// Monotonic round counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundInfo {
    pub day_count: u32,
    pub night_count: u32,
    pub nomination_count: u32,
    pub total_rounds: u32,
}

/// Terminal flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOver {
    pub is_over: bool,
    pub winner: Option<Alignment>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub room_id: String,
    /// Bumped on every committed mutation
    pub version: u64,
    pub storyteller_id: Option<String>,
    pub current_script_id: String,
    pub phase: Phase,
    pub setup_phase: SetupPhase,
    pub seats: Vec<Seat>,
    pub roles_revealed: bool,
    pub voting: Option<VotingState>,
    pub night_queue: Vec<String>,
    /// `-1` means dusk, the queue has not started
    pub night_current_index: i32,
    pub round_info: RoundInfo,
    pub game_over: GameOver,
    /// Seat executed during the current day, if any
    pub executed_today: Option<u32>,
    pub messages: Vec<ChatMessage>,
    pub night_action_requests: Vec<NightActionRequest>,
    pub storyteller_notes: Vec<StorytellerNote>,
    pub vote_history: Vec<VoteRecord>,
    pub daily_nominations: Vec<DailyNomination>,
    pub interaction_log: Vec<InteractionLogEntry>,
    pub custom_scripts: Vec<CustomScript>,
    pub custom_roles: Vec<CustomRole>,
}

impl GameState {
    /// A fresh room in SETUP with no seats
    pub fn new(room_id: impl Into<String>, script_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            version: 0,
            storyteller_id: None,
            current_script_id: script_id.into(),
            phase: Phase::Setup,
            setup_phase: SetupPhase::Assigning,
            seats: Vec::new(),
            roles_revealed: false,
            voting: None,
            night_queue: Vec::new(),
            night_current_index: -1,
            round_info: RoundInfo::default(),
            game_over: GameOver::default(),
            executed_today: None,
            messages: Vec::new(),
            night_action_requests: Vec::new(),
            storyteller_notes: Vec::new(),
            vote_history: Vec::new(),
            daily_nominations: Vec::new(),
            interaction_log: Vec::new(),
            custom_scripts: Vec::new(),
            custom_roles: Vec::new(),
        }
    }

    /// Built-in catalog extended with this room's custom roles and scripts
    pub fn catalog(&self) -> Catalog<'_> {
        Catalog::new(&self.custom_roles, &self.custom_scripts)
    }

    pub fn seat(&self, seat_id: u32) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == seat_id)
    }

    pub fn seat_mut(&mut self, seat_id: u32) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.id == seat_id)
    }

    pub fn seat_of_user(&self, user_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.is_owned_by(user_id))
    }

    pub fn is_storyteller(&self, user_id: &str) -> bool {
        self.storyteller_id.as_deref() == Some(user_id)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.is_storyteller(user_id) || self.seat_of_user(user_id).is_some()
    }

    pub fn alive_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_alive()).count()
    }

    pub fn has_started(&self) -> bool {
        self.setup_phase == SetupPhase::Started
    }

    pub fn push_system_message(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::system(content));
    }

    pub fn log_interaction(&mut self, kind: InteractionKind, seat_id: Option<u32>, detail: impl Into<String>) {
        let entry = InteractionLogEntry {
            id: Uuid::new_v4().to_string(),
            kind,
            seat_id,
            detail: detail.into(),
            day: self.round_info.day_count,
            night: self.round_info.night_count,
            timestamp: Utc::now(),
        };
        self.interaction_log.push(entry);
    }
}
