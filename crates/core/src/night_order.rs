//! Night-order resolver
//!
//! Two fixed priority lists decide who wakes and when. A night's queue is
//! the matching list filtered to the characters actually in play, followed
//! by any custom characters flagged for that night.

use crate::catalog::{Catalog, Role, RoleEntry, Team};
use crate::models::Seat;

/// Wake order for the first night
pub const FIRST_NIGHT_ORDER: &[&str] = &[
    "lunatic",
    "sailor",
    "poisoner",
    "courtier",
    "godfather",
    "devils_advocate",
    "pukka",
    "washerwoman",
    "librarian",
    "investigator",
    "chef",
    "empath",
    "fortune_teller",
    "butler",
    "grandmother",
    "spy",
    "chambermaid",
];

/// Wake order for every later night
pub const OTHER_NIGHT_ORDER: &[&str] = &[
    "sailor",
    "poisoner",
    "courtier",
    "innkeeper",
    "gambler",
    "monk",
    "devils_advocate",
    "scarlet_woman",
    "lunatic",
    "exorcist",
    "imp",
    "zombuul",
    "pukka",
    "shabaloth",
    "po",
    "assassin",
    "godfather",
    "gossip",
    "professor",
    "tinker",
    "moonchild",
    "grandmother",
    "ravenkeeper",
    "empath",
    "fortune_teller",
    "undertaker",
    "butler",
    "spy",
    "chambermaid",
];

pub fn reference_order(is_first_night: bool) -> &'static [&'static str] {
    if is_first_night {
        FIRST_NIGHT_ORDER
    } else {
        OTHER_NIGHT_ORDER
    }
}

/// True when nobody has died yet
pub fn is_first_night(seats: &[Seat]) -> bool {
    seats.iter().all(|s| !s.is_dead)
}

/// Ordered role ids that wake tonight
///
/// Built-in characters follow the reference order. Custom characters that
/// wake tonight follow, in import order.
/// Demons and minions are queued while any seat holds them, dead or alive.
/// Everyone else is queued only while a living seat holds the role.
pub fn build_night_queue(catalog: &Catalog<'_>, seats: &[Seat], is_first_night: bool) -> Vec<String> {
    let builtin = reference_order(is_first_night).iter().copied();
    let custom = catalog
        .custom_roles()
        .iter()
        .filter(|role| Role::from_id(&role.id).is_none())
        .filter(|role| RoleEntry::Custom(role).night().wakes(is_first_night))
        .map(|role| role.id.as_str());

    builtin
        .chain(custom)
        .filter(|id| is_in_play(catalog, seats, id))
        .map(str::to_string)
        .collect()
}

/// Whether a character is woken on the given kind of night
///
/// Depends only on the catalog, so it holds on filtered views too.
pub fn wakes_tonight(catalog: &Catalog<'_>, role_id: &str, is_first_night: bool) -> bool {
    catalog
        .role(role_id)
        .is_some_and(|entry| entry.night().wakes(is_first_night))
}

fn is_in_play(catalog: &Catalog<'_>, seats: &[Seat], role_id: &str) -> bool {
    let always_wakes = matches!(catalog.team_of(role_id), Some(Team::Demon) | Some(Team::Minion));

    seats
        .iter()
        .filter(|seat| always_wakes || !seat.is_dead)
        .any(|seat| seat_holds(seat, role_id))
}

fn seat_holds(seat: &Seat, role_id: &str) -> bool {
    [&seat.real_role_id, &seat.seen_role_id, &seat.role_id]
        .into_iter()
        .any(|id| id.as_deref() == Some(role_id))
}
