//! Derived read-only views over a game state

use serde::{Deserialize, Serialize};

use crate::catalog::Team;
use crate::models::{GameState, Phase, Seat, SetupPhase};
use crate::night_order::{is_first_night, wakes_tonight};
use crate::rules::eligible_voter_count;

pub use crate::rules::execution_candidate;

/// Live tally of the current vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingStats {
    pub nominee_seat_id: u32,
    pub vote_count: usize,
    pub eligible_voters: usize,
    /// Votes needed for the nomination to pass
    pub votes_needed: usize,
    pub will_pass: bool,
    pub is_open: bool,
}

pub fn voting_stats(state: &GameState) -> Option<VotingStats> {
    let voting = state.voting.as_ref()?;
    let eligible = eligible_voter_count(&state.seats, &voting.votes);
    let votes_needed = eligible / 2 + 1;
    Some(VotingStats {
        nominee_seat_id: voting.nominee_seat_id,
        vote_count: voting.votes.len(),
        eligible_voters: eligible,
        votes_needed,
        will_pass: voting.votes.len() >= votes_needed,
        is_open: voting.is_open,
    })
}

/// Role the night cursor points at
pub fn current_night_role(state: &GameState) -> Option<&str> {
    if state.phase != Phase::Night {
        return None;
    }
    usize::try_from(state.night_current_index)
        .ok()
        .and_then(|i| state.night_queue.get(i))
        .map(String::as_str)
}

pub fn alive_count(state: &GameState) -> usize {
    state.alive_count()
}

pub fn seat_for_user<'a>(state: &'a GameState, user_id: &str) -> Option<&'a Seat> {
    state.seat_of_user(user_id)
}

/// What a participant can do right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailableAction {
    AssignRoles,
    StartGame,
    AdvancePhase,
    NextNightStep,
    StartNomination,
    AdvanceClockHand,
    CloseVote,
    Execute,
    EndGame,
    ResetRoles,
    Nominate,
    RaiseHand,
    LowerHand,
    SubmitNightAction,
    UseAbility,
    SendMessage,
}

pub fn available_actions(state: &GameState, user_id: &str, is_storyteller: bool) -> Vec<AvailableAction> {
    if is_storyteller {
        storyteller_actions(state)
    } else {
        player_actions(state, user_id)
    }
}

fn storyteller_actions(state: &GameState) -> Vec<AvailableAction> {
    use AvailableAction::*;

    if state.game_over.is_over {
        return vec![ResetRoles, SendMessage];
    }

    let vote_open = state.voting.as_ref().is_some_and(|v| v.is_open);
    let mut actions = Vec::new();
    match state.phase {
        Phase::Setup => {
            actions.push(AssignRoles);
            if state.setup_phase == SetupPhase::Ready {
                actions.push(StartGame);
            }
        }
        Phase::Night => {
            actions.push(AdvancePhase);
            if !state.night_queue.is_empty() {
                actions.push(NextNightStep);
            }
        }
        Phase::Day | Phase::Nomination => {
            actions.push(AdvancePhase);
            actions.push(StartNomination);
            if state.executed_today.is_none() {
                actions.push(Execute);
            }
        }
        Phase::Voting => {
            if vote_open {
                actions.extend([AdvanceClockHand, CloseVote]);
            }
        }
        Phase::GameOver => {}
    }
    actions.extend([EndGame, SendMessage]);
    actions
}

fn player_actions(state: &GameState, user_id: &str) -> Vec<AvailableAction> {
    use AvailableAction::*;

    let mut actions = vec![SendMessage];
    let Some(seat) = state.seat_of_user(user_id) else {
        return actions;
    };
    if state.game_over.is_over || !state.has_started() {
        return actions;
    }

    match state.phase {
        Phase::Day | Phase::Nomination => {
            let day = state.round_info.day_count;
            let nominated_today = state
                .daily_nominations
                .iter()
                .any(|n| n.day == day && n.nominator_seat_id == Some(seat.id));
            if seat.is_alive() && !nominated_today {
                actions.push(Nominate);
            }
            if seat.is_alive() && !seat.has_used_ability {
                actions.push(UseAbility);
            }
        }
        Phase::Voting => {
            if let Some(voting) = state.voting.as_ref().filter(|v| v.is_open) {
                if voting.votes.contains(&seat.id) {
                    actions.push(LowerHand);
                } else if seat.is_alive() || seat.has_ghost_vote {
                    actions.push(RaiseHand);
                }
            }
        }
        Phase::Night => {
            // The queue is redacted in player views; decide from the catalog
            let catalog = state.catalog();
            let first = is_first_night(&state.seats);
            let wakes = seat.self_view_role_id().is_some_and(|role| {
                let evil = matches!(catalog.team_of(role), Some(Team::Demon) | Some(Team::Minion));
                (seat.is_alive() || evil) && wakes_tonight(&catalog, role, first)
            });
            if wakes {
                actions.push(SubmitNightAction);
            }
        }
        Phase::Setup | Phase::GameOver => {}
    }
    actions
}
