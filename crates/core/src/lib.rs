//! Grimoire Core Library
//!
//! The Blood on the Clocktower state engine: role catalog, setup
//! composition, night order, the phase and voting state machine, win
//! conditions, chain-reaction hints and per-viewer filtering.
//!
//! Everything here is synchronous and performs no I/O. Persistence and
//! broadcast sit behind the [`SyncSink`] a [`Table`] is built with.

pub mod catalog;
pub mod chain_reaction;
pub mod composition;
pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod night_order;
pub mod operations;
pub mod rng;
pub mod rules;
pub mod selectors;
pub mod table;
pub mod visibility;

pub use catalog::{Alignment, Catalog, CustomRole, CustomScript, Role, Team};
pub use chain_reaction::{detect_chain_reactions, ChainReactionEvent, Priority, SuggestedAction, TriggerType};
pub use composition::{generate_role_assignment, standard_composition, Composition, StrategyHints};
pub use config::RulesConfig;
pub use error::{Error, Result};
pub use models::*;
pub use night_order::{build_night_queue, is_first_night, wakes_tonight};
pub use operations::{apply_player_operation, PlayerOperation};
pub use table::{NoopSync, SyncSink, Table};
pub use visibility::{filter_game_state_for_user, merge_secrets, split_secrets, SecretOverlay};
