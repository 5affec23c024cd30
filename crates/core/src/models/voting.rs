//! Nomination and vote models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single active nomination/vote cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingState {
    pub nominator_seat_id: Option<u32>,
    pub nominee_seat_id: u32,
    /// Seat the clock hand currently points at
    pub clock_hand_seat_id: u32,
    /// Seats with a raised hand, in the order they were raised
    pub votes: Vec<u32>,
    pub is_open: bool,
}

/// Tally of a closed vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub nominator_seat_id: Option<u32>,
    pub nominee_seat_id: u32,
    pub votes: Vec<u32>,
    pub vote_count: usize,
    /// Seats eligible to vote when the tally was taken
    pub voter_count: usize,
    pub passed: bool,
    pub day: u32,
    pub timestamp: DateTime<Utc>,
}

/// One nomination made during a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyNomination {
    pub day: u32,
    pub nominator_seat_id: Option<u32>,
    pub nominee_seat_id: u32,
    pub timestamp: DateTime<Utc>,
}
