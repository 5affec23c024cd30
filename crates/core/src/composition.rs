//! Role composition and assignment
//!
//! The standard composition is a fixed table keyed by player count. Drawing
//! a setup shuffles each team's pool and takes exactly the required count,
//! so any recommended subset is itself shuffled before it is preferred.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Catalog, Jinx, RoleEntry, SetupModifier, Team};
use crate::error::{Error, Result};
use crate::models::{Seat, SeatStatus};
use crate::rng::{random_choice, shuffle};

pub const MIN_PLAYERS: usize = 5;

/// Number of characters of each team in a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub townsfolk: usize,
    pub outsider: usize,
    pub minion: usize,
    pub demon: usize,
}

impl Composition {
    const fn of(townsfolk: usize, outsider: usize, minion: usize, demon: usize) -> Self {
        Self {
            townsfolk,
            outsider,
            minion,
            demon,
        }
    }

    pub fn total(&self) -> usize {
        self.townsfolk + self.outsider + self.minion + self.demon
    }

    pub fn count(&self, team: Team) -> usize {
        match team {
            Team::Townsfolk => self.townsfolk,
            Team::Outsider => self.outsider,
            Team::Minion => self.minion,
            Team::Demon => self.demon,
            Team::Traveller => 0,
        }
    }

    /// Apply a character's setup change, keeping the total unchanged
    pub fn apply(&mut self, modifier: SetupModifier) {
        match modifier {
            SetupModifier::AdjustCounts {
                remove_townsfolk,
                add_outsiders,
            } => {
                let moved = (remove_townsfolk as usize).min(self.townsfolk);
                self.townsfolk -= moved;
                self.outsider += (add_outsiders as usize).min(moved);
            }
        }
    }
}

/// Standard composition for a player count
pub fn standard_composition(player_count: usize) -> Result<Composition> {
    let composition = match player_count {
        n if n < MIN_PLAYERS => {
            return Err(Error::Configuration(format!(
                "At least {} players are required, got {}",
                MIN_PLAYERS, n
            )))
        }
        5 => Composition::of(3, 0, 1, 1),
        6 => Composition::of(3, 1, 1, 1),
        7 => Composition::of(5, 0, 1, 1),
        8 => Composition::of(5, 1, 1, 1),
        9 => Composition::of(5, 2, 1, 1),
        10 => Composition::of(7, 0, 2, 1),
        11 => Composition::of(7, 1, 2, 1),
        12 => Composition::of(7, 2, 2, 1),
        13 => Composition::of(9, 0, 3, 1),
        14 => Composition::of(9, 1, 3, 1),
        15 => Composition::of(9, 2, 3, 1),
        n => Composition::of(n - 6, 2, 3, 1),
    };
    Ok(composition)
}

/// Roles a storyteller would like to see drawn, per team
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrategyHints {
    pub townsfolk: Vec<String>,
    pub outsider: Vec<String>,
    pub minion: Vec<String>,
    pub demon: Vec<String>,
}

impl StrategyHints {
    pub fn for_team(&self, team: Team) -> &[String] {
        match team {
            Team::Townsfolk => &self.townsfolk,
            Team::Outsider => &self.outsider,
            Team::Minion => &self.minion,
            Team::Demon => &self.demon,
            Team::Traveller => &[],
        }
    }
}

/// Draw a legal setup: a flat, shuffled list of exactly `player_count` role ids
pub fn generate_role_assignment(
    catalog: &Catalog<'_>,
    script_id: &str,
    player_count: usize,
    hints: Option<&StrategyHints>,
    attempts: usize,
) -> Result<Vec<String>> {
    let script = catalog
        .script(script_id)
        .ok_or_else(|| Error::ScriptNotFound(script_id.to_string()))?;
    let pool = catalog.role_pool(script_id)?;
    let base = standard_composition(player_count)?;

    for attempt in 1..=attempts.max(1) {
        let drawn = draw_once(&pool, base, hints)?;
        if let Some(jinx) = forbidden_pair(&drawn, script.jinxes) {
            debug!(
                attempt,
                role_a = %jinx.role_a,
                role_b = %jinx.role_b,
                "Drawn setup violates a jinx, re-drawing"
            );
            continue;
        }
        info!(script = script_id, player_count, "Generated role assignment");
        return Ok(shuffle(&drawn));
    }

    Err(Error::Configuration(format!(
        "Could not draw a setup for script '{}' without a forbidden jinx after {} attempts",
        script_id, attempts
    )))
}

fn draw_once(
    pool: &[RoleEntry<'_>],
    base: Composition,
    hints: Option<&StrategyHints>,
) -> Result<Vec<String>> {
    let mut composition = base;
    let mut drawn: Vec<String> = Vec::with_capacity(base.total());

    // Evil first: their setup modifiers change how many good roles are needed
    for team in [Team::Demon, Team::Minion, Team::Outsider, Team::Townsfolk] {
        if team == Team::Outsider {
            for id in &drawn {
                if let Some(modifier) = pool
                    .iter()
                    .find(|r| r.id() == id)
                    .and_then(|r| r.setup_modifier())
                {
                    composition.apply(modifier);
                }
            }
        }

        let picked = draw_team(pool, team, composition.count(team), hints)?;
        drawn.extend(picked);
    }

    Ok(drawn)
}

fn draw_team(
    pool: &[RoleEntry<'_>],
    team: Team,
    count: usize,
    hints: Option<&StrategyHints>,
) -> Result<Vec<String>> {
    let available: Vec<&str> = pool
        .iter()
        .filter(|r| r.team() == team)
        .map(|r| r.id())
        .collect();

    if available.len() < count {
        return Err(Error::Configuration(format!(
            "Need {} {:?} roles but the script only offers {}",
            count,
            team,
            available.len()
        )));
    }

    let recommended = hints.map(|h| h.for_team(team)).unwrap_or(&[]);
    let (preferred, rest): (Vec<&str>, Vec<&str>) = available
        .into_iter()
        .partition(|id| recommended.iter().any(|r| r == id));

    let mut ordered = shuffle(&preferred);
    ordered.extend(shuffle(&rest));

    Ok(ordered.into_iter().take(count).map(str::to_string).collect())
}

fn forbidden_pair<'j>(drawn: &[String], jinxes: &'j [Jinx]) -> Option<&'j Jinx> {
    jinxes.iter().filter(|j| j.setup_forbidden).find(|j| {
        drawn.iter().any(|id| *id == j.role_a) && drawn.iter().any(|id| *id == j.role_b)
    })
}

/// A role as stored on a seat: the truth and what the holder is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAssignment {
    pub real_role_id: String,
    pub seen_role_id: String,
}

/// Pick what each drawn role is shown as
///
/// Characters with a disguise (Drunk, Lunatic) are shown a random character
/// of the disguise team that the script offers and nobody else holds.
pub fn resolve_disguises(
    catalog: &Catalog<'_>,
    script_id: &str,
    roles: &[String],
) -> Result<Vec<SeatAssignment>> {
    let pool = catalog.role_pool(script_id)?;
    let mut shown: Vec<String> = Vec::new();

    roles
        .iter()
        .map(|real| {
            let disguise = catalog.role(real).and_then(|r| r.disguise());
            let seen = match disguise {
                None => real.clone(),
                Some(team) => {
                    let candidates: Vec<&str> = pool
                        .iter()
                        .filter(|r| r.team() == team)
                        .map(|r| r.id())
                        .filter(|id| !roles.iter().any(|r| r == id))
                        .filter(|id| !shown.iter().any(|s| s == id))
                        .collect();
                    let pick = random_choice(&candidates).ok_or_else(|| {
                        Error::Configuration(format!(
                            "No {:?} left to show the {}",
                            team, real
                        ))
                    })?;
                    shown.push(pick.to_string());
                    pick.to_string()
                }
            };
            Ok(SeatAssignment {
                real_role_id: real.clone(),
                seen_role_id: seen,
            })
        })
        .collect()
}

/// Write assignments onto seats in seating order
pub fn assign_to_seats(seats: &mut [Seat], assignments: &[SeatAssignment]) {
    for (seat, assignment) in seats.iter_mut().zip(assignments) {
        seat.real_role_id = Some(assignment.real_role_id.clone());
        seat.seen_role_id = Some(assignment.seen_role_id.clone());
        seat.role_id = Some(assignment.seen_role_id.clone());
        seat.statuses.clear();
        seat.has_used_ability = false;
        if assignment.real_role_id == "drunk" {
            seat.statuses.insert(SeatStatus::Drunk);
        }
    }
}
