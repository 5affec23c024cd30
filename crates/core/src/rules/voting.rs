//! Nomination, hand-raising and vote tally

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{DailyNomination, GameState, InteractionKind, Seat, VoteRecord, VotingState};

/// A nomination passes with strictly more than this share of eligible voters
pub const EXECUTION_VOTE_RATIO: f64 = 0.5;

pub fn create_voting_state(nominee_seat_id: u32, nominator_seat_id: Option<u32>) -> VotingState {
    VotingState {
        nominator_seat_id,
        nominee_seat_id,
        clock_hand_seat_id: nominee_seat_id,
        votes: Vec::new(),
        is_open: true,
    }
}

/// Spend a dead seat's ghost vote; living seats keep theirs untouched
pub fn use_ghost_vote(seat: &mut Seat) -> bool {
    if seat.is_dead && seat.has_ghost_vote {
        seat.has_ghost_vote = false;
        true
    } else {
        false
    }
}

/// Living seats plus dead seats that raised an unspent ghost vote
pub fn eligible_voter_count(seats: &[Seat], votes: &[u32]) -> usize {
    seats
        .iter()
        .filter(|s| s.is_alive() || (s.has_ghost_vote && votes.contains(&s.id)))
        .count()
}

pub fn vote_passes(vote_count: usize, eligible: usize) -> bool {
    vote_count as f64 > eligible as f64 * EXECUTION_VOTE_RATIO
}

/// Open a nomination against `nominee_seat_id`
///
/// A seat may nominate once per day and be nominated once per day. An
/// unknown nominee is a no-op.
pub fn start_vote(
    state: &mut GameState,
    nominee_seat_id: u32,
    nominator_seat_id: Option<u32>,
) -> Result<bool> {
    if state.voting.as_ref().is_some_and(|v| v.is_open) {
        return Err(Error::InvalidOperation(
            "A vote is already in progress".to_string(),
        ));
    }
    if state.seat(nominee_seat_id).is_none() {
        debug!(seat = nominee_seat_id, "Nominee seat not found");
        return Ok(false);
    }

    let day = state.round_info.day_count;
    let today = || state.daily_nominations.iter().filter(move |n| n.day == day);
    if today().any(|n| n.nominee_seat_id == nominee_seat_id) {
        return Err(Error::InvalidOperation(format!(
            "Seat {} has already been nominated today",
            nominee_seat_id
        )));
    }
    if let Some(nominator) = nominator_seat_id {
        if today().any(|n| n.nominator_seat_id == Some(nominator)) {
            return Err(Error::InvalidOperation(format!(
                "Seat {} has already nominated today",
                nominator
            )));
        }
    }

    for seat in &mut state.seats {
        seat.clear_vote_flags();
    }
    if let Some(seat) = state.seat_mut(nominee_seat_id) {
        seat.is_nominated = true;
    }

    state.voting = Some(create_voting_state(nominee_seat_id, nominator_seat_id));
    state.round_info.nomination_count += 1;
    state.daily_nominations.push(DailyNomination {
        day,
        nominator_seat_id,
        nominee_seat_id,
        timestamp: Utc::now(),
    });
    state.log_interaction(
        InteractionKind::Nomination,
        Some(nominee_seat_id),
        match nominator_seat_id {
            Some(n) => format!("Seat {} nominated seat {}", n, nominee_seat_id),
            None => format!("Seat {} was nominated", nominee_seat_id),
        },
    );
    info!(nominee = nominee_seat_id, nominator = ?nominator_seat_id, "Nomination opened");
    Ok(true)
}

/// Add a seat's vote; dead seats need an unspent ghost vote
pub fn raise_hand(state: &mut GameState, seat_id: u32) -> bool {
    let can_vote = match state.seat(seat_id) {
        Some(seat) => seat.is_alive() || seat.has_ghost_vote,
        None => false,
    };
    let Some(voting) = state.voting.as_mut().filter(|v| v.is_open) else {
        return false;
    };
    if !can_vote || voting.votes.contains(&seat_id) {
        return false;
    }

    voting.votes.push(seat_id);
    if let Some(seat) = state.seat_mut(seat_id) {
        seat.is_hand_raised = true;
    }
    true
}

pub fn lower_hand(state: &mut GameState, seat_id: u32) -> bool {
    let Some(voting) = state.voting.as_mut().filter(|v| v.is_open) else {
        return false;
    };
    let before = voting.votes.len();
    voting.votes.retain(|id| *id != seat_id);
    if voting.votes.len() == before {
        return false;
    }

    if let Some(seat) = state.seat_mut(seat_id) {
        seat.is_hand_raised = false;
    }
    true
}

/// The next living seat after `from` in seating order, wrapping around
pub fn next_living_seat(seats: &[Seat], from: u32) -> Option<u32> {
    let start = seats.iter().position(|s| s.id == from)?;
    (1..=seats.len())
        .map(|offset| &seats[(start + offset) % seats.len()])
        .find(|s| s.is_alive())
        .map(|s| s.id)
}

pub fn advance_clock_hand(state: &mut GameState) -> Option<u32> {
    let current = state.voting.as_ref().filter(|v| v.is_open)?.clock_hand_seat_id;
    let next = next_living_seat(&state.seats, current)?;
    if let Some(voting) = state.voting.as_mut() {
        voting.clock_hand_seat_id = next;
    }
    Some(next)
}

/// Close the open vote and record its tally
///
/// Dead voters whose hands were counted spend their ghost vote. The closed
/// state stays in place until the next nomination or the end of the day.
pub fn close_vote(state: &mut GameState) -> Option<VoteRecord> {
    let voting = state.voting.as_ref().filter(|v| v.is_open)?.clone();

    let voter_count = eligible_voter_count(&state.seats, &voting.votes);
    let vote_count = voting.votes.len();
    let passed = vote_passes(vote_count, voter_count);

    for seat in state.seats.iter_mut().filter(|s| voting.votes.contains(&s.id)) {
        use_ghost_vote(seat);
    }
    for seat in &mut state.seats {
        seat.is_hand_raised = false;
        seat.vote_locked = false;
    }

    let record = VoteRecord {
        nominator_seat_id: voting.nominator_seat_id,
        nominee_seat_id: voting.nominee_seat_id,
        votes: voting.votes.clone(),
        vote_count,
        voter_count,
        passed,
        day: state.round_info.day_count,
        timestamp: Utc::now(),
    };
    state.vote_history.push(record.clone());

    if let Some(open) = state.voting.as_mut() {
        open.is_open = false;
    }

    state.log_interaction(
        InteractionKind::VoteClosed,
        Some(voting.nominee_seat_id),
        format!(
            "{} of {} votes for seat {}: {}",
            vote_count,
            voter_count,
            voting.nominee_seat_id,
            if passed { "passed" } else { "failed" }
        ),
    );
    info!(nominee = voting.nominee_seat_id, vote_count, voter_count, passed, "Vote closed");
    Some(record)
}

/// The nominee with the highest passing tally today; ties leave nobody
pub fn execution_candidate(state: &GameState) -> Option<u32> {
    let day = state.round_info.day_count;
    let mut best: Option<&VoteRecord> = None;
    let mut tied = false;

    for record in state.vote_history.iter().filter(|r| r.day == day && r.passed) {
        match best {
            Some(b) if record.vote_count == b.vote_count => tied = true,
            Some(b) if record.vote_count < b.vote_count => {}
            _ => {
                best = Some(record);
                tied = false;
            }
        }
    }

    if tied {
        None
    } else {
        best.map(|r| r.nominee_seat_id)
    }
}
