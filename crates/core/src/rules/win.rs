//! Win-condition evaluator

use serde::{Deserialize, Serialize};

use crate::catalog::{Alignment, Catalog, Team};
use crate::models::{Seat, SeatStatus};

/// Evil wins once this many or fewer players are alive
pub const EVIL_WIN_THRESHOLD: usize = 2;

/// Living players needed for the Mayor's special victory
pub const MAYOR_WIN_ALIVE_COUNT: usize = 3;

pub const SAINT_EXECUTED: &str = "Saint executed";
pub const MAYOR_VICTORY: &str = "Mayor's special victory";
pub const DEMON_DEAD: &str = "All demons are dead";
pub const TOO_FEW_ALIVE: &str = "Only two players remain alive";

/// What happened in the cycle being evaluated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WinContext {
    pub execution_occurred: bool,
    pub executed_seat_id: Option<u32>,
}

impl WinContext {
    pub fn execution(seat_id: u32) -> Self {
        Self {
            execution_occurred: true,
            executed_seat_id: Some(seat_id),
        }
    }

    pub fn no_execution() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinResult {
    pub winner: Alignment,
    pub reason: String,
}

impl WinResult {
    fn new(winner: Alignment, reason: &str) -> Self {
        Self {
            winner,
            reason: reason.to_string(),
        }
    }
}

fn effective_team(catalog: &Catalog<'_>, seat: &Seat) -> Option<Team> {
    seat.effective_role_id().and_then(|id| catalog.team_of(id))
}

/// True when no living seat holds a demon
pub fn check_good_win(catalog: &Catalog<'_>, seats: &[Seat]) -> bool {
    !seats
        .iter()
        .filter(|s| s.is_alive())
        .any(|s| effective_team(catalog, s) == Some(Team::Demon))
}

/// True when too few players are left alive
pub fn check_evil_win(seats: &[Seat]) -> bool {
    seats.iter().filter(|s| s.is_alive()).count() <= EVIL_WIN_THRESHOLD
}

/// Evaluate every win condition in precedence order
///
/// The Saint and Mayor rules need to know whether an execution happened, so
/// they are only considered when a context is given.
pub fn check_game_over(
    catalog: &Catalog<'_>,
    seats: &[Seat],
    context: Option<&WinContext>,
) -> Option<WinResult> {
    if let Some(ctx) = context {
        if ctx.execution_occurred {
            let saint_executed = ctx
                .executed_seat_id
                .and_then(|id| seats.iter().find(|s| s.id == id))
                .and_then(Seat::effective_role_id)
                == Some("saint");
            if saint_executed {
                return Some(WinResult::new(Alignment::Evil, SAINT_EXECUTED));
            }
        } else if mayor_wins(seats) {
            return Some(WinResult::new(Alignment::Good, MAYOR_VICTORY));
        }
    }

    if check_good_win(catalog, seats) {
        return Some(WinResult::new(Alignment::Good, DEMON_DEAD));
    }
    if check_evil_win(seats) {
        return Some(WinResult::new(Alignment::Evil, TOO_FEW_ALIVE));
    }
    None
}

fn mayor_wins(seats: &[Seat]) -> bool {
    let alive: Vec<&Seat> = seats.iter().filter(|s| s.is_alive()).collect();
    alive.len() == MAYOR_WIN_ALIVE_COUNT
        && alive.iter().any(|s| {
            s.effective_role_id() == Some("mayor")
                && !s.has_status(SeatStatus::Poisoned)
                && !s.has_status(SeatStatus::Drunk)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(id: u32, role: &str) -> Seat {
        let mut seat = Seat::new(id);
        seat.real_role_id = Some(role.to_string());
        seat.seen_role_id = Some(role.to_string());
        seat
    }

    fn table(roles: &[&str]) -> Vec<Seat> {
        roles
            .iter()
            .enumerate()
            .map(|(i, r)| seat(i as u32, r))
            .collect()
    }

    #[test]
    fn test_saint_execution_is_evil_win() {
        let mut seats = table(&["saint", "imp", "chef", "empath", "monk", "soldier"]);
        seats[0].is_dead = true;
        let result = check_game_over(&Catalog::builtin(), &seats, Some(&WinContext::execution(0)));
        assert_eq!(result, Some(WinResult::new(Alignment::Evil, SAINT_EXECUTED)));
    }

    #[test]
    fn test_saint_night_death_does_not_trigger() {
        let mut seats = table(&["saint", "imp", "chef", "empath", "monk", "soldier"]);
        seats[0].is_dead = true;
        let result = check_game_over(&Catalog::builtin(), &seats, Some(&WinContext::no_execution()));
        assert_eq!(result, None);
    }

    #[test]
    fn test_saint_rule_beats_dead_demon() {
        let mut seats = table(&["saint", "imp", "chef", "empath"]);
        seats[0].is_dead = true;
        seats[1].is_dead = true;
        let result = check_game_over(&Catalog::builtin(), &seats, Some(&WinContext::execution(0)));
        assert_eq!(result.map(|r| r.winner), Some(Alignment::Evil));
    }

    #[test]
    fn test_mayor_special_victory() {
        let mut seats = table(&["mayor", "imp", "chef", "empath", "monk"]);
        seats[3].is_dead = true;
        seats[4].is_dead = true;
        let result = check_game_over(&Catalog::builtin(), &seats, Some(&WinContext::no_execution()));
        assert_eq!(result, Some(WinResult::new(Alignment::Good, MAYOR_VICTORY)));
    }

    #[test]
    fn test_impaired_mayor_has_no_special_victory() {
        for status in [SeatStatus::Poisoned, SeatStatus::Drunk] {
            let mut seats = table(&["mayor", "imp", "chef", "empath", "monk"]);
            seats[3].is_dead = true;
            seats[4].is_dead = true;
            seats[0].statuses.insert(status);
            let result =
                check_game_over(&Catalog::builtin(), &seats, Some(&WinContext::no_execution()));
            assert_eq!(result, None);
        }
    }

    #[test]
    fn test_mayor_needs_no_execution() {
        let mut seats = table(&["mayor", "imp", "chef", "empath", "monk"]);
        seats[3].is_dead = true;
        seats[4].is_dead = true;
        let result = check_game_over(&Catalog::builtin(), &seats, Some(&WinContext::execution(4)));
        assert_eq!(result, None);
        assert_eq!(check_game_over(&Catalog::builtin(), &seats, None), None);
    }

    #[test]
    fn test_demon_dead_is_good_win() {
        let mut seats = table(&["imp", "chef", "empath", "monk", "poisoner"]);
        seats[0].is_dead = true;
        assert!(check_good_win(&Catalog::builtin(), &seats));
        let result = check_game_over(&Catalog::builtin(), &seats, None);
        assert_eq!(result.map(|r| r.winner), Some(Alignment::Good));
    }

    #[test]
    fn test_two_alive_is_evil_win() {
        let mut seats = table(&["imp", "chef", "empath", "monk", "poisoner"]);
        for seat in &mut seats[2..] {
            seat.is_dead = true;
        }
        assert!(check_evil_win(&seats));
        let result = check_game_over(&Catalog::builtin(), &seats, None);
        assert_eq!(result.map(|r| r.winner), Some(Alignment::Evil));
    }

    #[test]
    fn test_effective_role_uses_real_role() {
        // Seen as a townsfolk, truly the demon
        let mut seats = table(&["chef", "empath", "monk", "poisoner"]);
        seats[0].real_role_id = Some("imp".into());
        assert!(!check_good_win(&Catalog::builtin(), &seats));
    }
}
