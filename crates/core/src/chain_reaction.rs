//! Chain-reaction detector
//!
//! Advisory only: looks at a death that is about to be applied and suggests
//! follow-up actions for the storyteller to confirm. Never mutates state.

use serde::{Deserialize, Serialize};

use crate::catalog::Alignment;
use crate::models::{GameState, Seat, SeatStatus};
use crate::rules::{check_game_over, WinContext, SAINT_EXECUTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    Death,
    Execution,
    NightKill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainReactionKind {
    GrandmotherLinked,
    MoonchildLinked,
    MonkProtection,
    SoldierProtection,
    SaintExecuted,
    GameEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SuggestedAction {
    MarkDead { seat_id: u32 },
    CancelKill { seat_id: u32 },
    EndGame { winner: Alignment, reason: String },
    Acknowledge,
}

/// Sorts high first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReactionEvent {
    #[serde(rename = "type")]
    pub kind: ChainReactionKind,
    pub title: String,
    pub message: String,
    pub affected_seat_ids: Vec<u32>,
    pub suggested_action: SuggestedAction,
    pub priority: Priority,
}

pub fn detect_chain_reactions(
    state: &GameState,
    trigger: TriggerType,
    affected_seat_id: u32,
) -> Vec<ChainReactionEvent> {
    let Some(target) = state.seat(affected_seat_id) else {
        return Vec::new();
    };

    let mut events = Vec::new();

    if matches!(trigger, TriggerType::Death | TriggerType::NightKill) {
        events.extend(grandmother_linkage(state, target));
        events.extend(moonchild_linkage(state, target));
    }
    if trigger == TriggerType::NightKill {
        events.extend(kill_protection(target));
    }
    events.extend(game_end_projection(state, trigger, affected_seat_id));

    events.sort_by_key(|e| e.priority);
    events
}

/// Living holders of `role` when a reminder from that role points at `target`
fn linked_holders<'a>(
    state: &'a GameState,
    role: &'a str,
    target: u32,
) -> impl Iterator<Item = &'a Seat> {
    let linked = state
        .seats
        .iter()
        .flat_map(|s| s.reminders.iter())
        .any(|r| r.source_role == role && r.seat_id == target);

    state.seats.iter().filter(move |s| {
        linked && s.is_alive() && s.id != target && s.effective_role_id() == Some(role)
    })
}

fn grandmother_linkage(state: &GameState, target: &Seat) -> Option<ChainReactionEvent> {
    let grandmother = linked_holders(state, "grandmother", target.id).next()?;
    Some(ChainReactionEvent {
        kind: ChainReactionKind::GrandmotherLinked,
        title: "Grandmother's grandchild died".to_string(),
        message: format!(
            "Seat {} was the Grandmother's grandchild. If the Demon killed them, the Grandmother (seat {}) dies too.",
            target.id, grandmother.id
        ),
        affected_seat_ids: vec![grandmother.id],
        suggested_action: SuggestedAction::MarkDead {
            seat_id: grandmother.id,
        },
        priority: Priority::High,
    })
}

fn moonchild_linkage(state: &GameState, target: &Seat) -> Option<ChainReactionEvent> {
    let moonchild = linked_holders(state, "moonchild", target.id).next()?;
    Some(ChainReactionEvent {
        kind: ChainReactionKind::MoonchildLinked,
        title: "Moonchild's choice died".to_string(),
        message: format!(
            "Seat {} was chosen by the Moonchild (seat {}).",
            target.id, moonchild.id
        ),
        affected_seat_ids: vec![moonchild.id],
        suggested_action: SuggestedAction::MarkDead {
            seat_id: moonchild.id,
        },
        priority: Priority::Medium,
    })
}

fn kill_protection(target: &Seat) -> Option<ChainReactionEvent> {
    let cancel = |kind, title: &str, message: String, priority| ChainReactionEvent {
        kind,
        title: title.to_string(),
        message,
        affected_seat_ids: vec![target.id],
        suggested_action: SuggestedAction::CancelKill { seat_id: target.id },
        priority,
    };

    if target.has_status(SeatStatus::Protected) {
        return Some(cancel(
            ChainReactionKind::MonkProtection,
            "Target is protected",
            format!("Seat {} is protected tonight; the kill should fail.", target.id),
            Priority::High,
        ));
    }
    if target.reminders.iter().any(|r| r.source_role == "monk") {
        return Some(cancel(
            ChainReactionKind::MonkProtection,
            "Monk reminder on target",
            format!("Seat {} carries a Monk reminder; check whether it is protected.", target.id),
            Priority::Medium,
        ));
    }
    if target.effective_role_id() == Some("soldier") && !target.is_impaired() {
        return Some(cancel(
            ChainReactionKind::SoldierProtection,
            "Target is the Soldier",
            format!("Seat {} is a sober, healthy Soldier and cannot be killed by the Demon.", target.id),
            Priority::High,
        ));
    }
    None
}

fn game_end_projection(
    state: &GameState,
    trigger: TriggerType,
    affected_seat_id: u32,
) -> Option<ChainReactionEvent> {
    let mut seats = state.seats.clone();
    for seat in seats.iter_mut().filter(|s| s.id == affected_seat_id) {
        seat.is_dead = true;
    }

    let context = (trigger == TriggerType::Execution).then(|| WinContext::execution(affected_seat_id));
    let result = check_game_over(&state.catalog(), &seats, context.as_ref())?;

    let kind = if result.reason == SAINT_EXECUTED {
        ChainReactionKind::SaintExecuted
    } else {
        ChainReactionKind::GameEnd
    };
    Some(ChainReactionEvent {
        kind,
        title: format!("{} wins", result.winner),
        message: result.reason.clone(),
        affected_seat_ids: vec![affected_seat_id],
        suggested_action: SuggestedAction::EndGame {
            winner: result.winner,
            reason: result.reason,
        },
        priority: Priority::High,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reminder;
    use crate::rules::apply_role_to_seat;

    fn state_with_roles(roles: &[&str]) -> GameState {
        let mut state = GameState::new("ROOM01", "trouble_brewing");
        for (i, role) in roles.iter().enumerate() {
            let mut seat = Seat::new(i as u32);
            apply_role_to_seat(&mut seat, role);
            state.seats.push(seat);
        }
        state
    }

    fn kinds(events: &[ChainReactionEvent]) -> Vec<ChainReactionKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_unknown_seat_yields_nothing() {
        let state = state_with_roles(&["chef", "imp"]);
        assert!(detect_chain_reactions(&state, TriggerType::Death, 7).is_empty());
    }

    #[test]
    fn test_grandmother_linkage() {
        let mut state = state_with_roles(&["grandmother", "chef", "imp", "empath", "monk", "saint"]);
        state.seats[0].reminders.push(Reminder::new("Grandchild", "grandmother", 1));
        let events = detect_chain_reactions(&state, TriggerType::NightKill, 1);
        assert_eq!(kinds(&events), vec![ChainReactionKind::GrandmotherLinked]);
        assert_eq!(
            events[0].suggested_action,
            SuggestedAction::MarkDead { seat_id: 0 }
        );
    }

    #[test]
    fn test_moonchild_linkage_is_medium() {
        let mut state = state_with_roles(&["moonchild", "chef", "imp", "empath", "monk", "saint"]);
        state.seats[1].reminders.push(Reminder::new("Chosen", "moonchild", 1));
        let events = detect_chain_reactions(&state, TriggerType::Death, 1);
        assert_eq!(kinds(&events), vec![ChainReactionKind::MoonchildLinked]);
        assert_eq!(events[0].priority, Priority::Medium);
    }

    #[test]
    fn test_monk_protection_priorities() {
        let mut state = state_with_roles(&["monk", "chef", "imp", "empath", "saint", "mayor"]);
        state.seats[1].statuses.insert(SeatStatus::Protected);
        let events = detect_chain_reactions(&state, TriggerType::NightKill, 1);
        assert_eq!(events[0].kind, ChainReactionKind::MonkProtection);
        assert_eq!(events[0].priority, Priority::High);

        state.seats[1].statuses.clear();
        state.seats[1].reminders.push(Reminder::new("Safe", "monk", 1));
        let events = detect_chain_reactions(&state, TriggerType::NightKill, 1);
        assert_eq!(events[0].priority, Priority::Medium);

        // Protection only matters for night kills
        let events = detect_chain_reactions(&state, TriggerType::Death, 1);
        assert!(events.is_empty());
    }

    #[test]
    fn test_saint_execution() {
        let state = state_with_roles(&["saint", "chef", "imp", "empath", "monk"]);
        let events = detect_chain_reactions(&state, TriggerType::Execution, 0);
        assert_eq!(kinds(&events), vec![ChainReactionKind::SaintExecuted]);
        assert_eq!(
            events[0].suggested_action,
            SuggestedAction::EndGame {
                winner: Alignment::Evil,
                reason: SAINT_EXECUTED.to_string()
            }
        );

        let events = detect_chain_reactions(&state, TriggerType::NightKill, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_demon_death_projects_good_win() {
        let state = state_with_roles(&["chef", "imp", "empath", "monk", "saint"]);
        let events = detect_chain_reactions(&state, TriggerType::Execution, 1);
        assert_eq!(kinds(&events), vec![ChainReactionKind::GameEnd]);
        assert!(matches!(
            events[0].suggested_action,
            SuggestedAction::EndGame { winner: Alignment::Good, .. }
        ));
    }

    #[test]
    fn test_sorted_by_priority() {
        let mut state = state_with_roles(&["moonchild", "chef", "imp", "grandmother", "monk"]);
        state.seats[0].reminders.push(Reminder::new("Chosen", "moonchild", 1));
        state.seats[3].reminders.push(Reminder::new("Grandchild", "grandmother", 1));
        let events = detect_chain_reactions(&state, TriggerType::NightKill, 1);
        let priorities: Vec<Priority> = events.iter().map(|e| e.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(events.first().map(|e| e.kind), Some(ChainReactionKind::GrandmotherLinked));
    }

    #[test]
    fn test_detector_does_not_mutate() {
        let state = state_with_roles(&["saint", "chef", "imp", "empath", "monk"]);
        let before = state.clone();
        detect_chain_reactions(&state, TriggerType::Execution, 0);
        assert_eq!(state, before);
    }
}
