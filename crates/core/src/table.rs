//! Table - the copy-on-write owner of one room's game state
//!
//! Every mutation clones the current snapshot, applies the change, bumps the
//! version, checks invariants and swaps the shared pointer before handing
//! the new snapshot to the injected [`SyncSink`]. Readers holding an older
//! `Arc<GameState>` never observe a half-applied change.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{self, Alignment};
use crate::chain_reaction::{detect_chain_reactions, ChainReactionEvent, TriggerType};
use crate::composition::{assign_to_seats, generate_role_assignment, resolve_disguises, StrategyHints};
use crate::config::RulesConfig;
use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{
    GameOver, GameState, InteractionKind, NightActionStatus, Phase, Reminder, RoundInfo, Seat,
    SeatStatus, SetupPhase, StorytellerNote, VoteRecord,
};
use crate::operations::{apply_player_operation, PlayerOperation};
use crate::rules::{self, DeathToggle, WinContext, WinResult};
use crate::visibility::filter_game_state_for_user;

/// Receives every committed snapshot
///
/// Implementations persist and broadcast. They may be called more often
/// than strictly necessary and must tolerate repeats.
pub trait SyncSink: Send + Sync {
    fn sync(&self, snapshot: Arc<GameState>);
}

/// Sink that drops snapshots, for local-only tables
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSync;

impl SyncSink for NoopSync {
    fn sync(&self, _snapshot: Arc<GameState>) {}
}

pub struct Table {
    state: Arc<GameState>,
    config: RulesConfig,
    sink: Box<dyn SyncSink>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("room_id", &self.state.room_id)
            .field("version", &self.state.version)
            .field("phase", &self.state.phase)
            .finish()
    }
}

impl Table {
    /// Open a fresh room in SETUP with no seats
    pub fn create(
        room_id: impl Into<String>,
        storyteller_id: impl Into<String>,
        config: RulesConfig,
        sink: Box<dyn SyncSink>,
    ) -> Self {
        let mut state = GameState::new(room_id, config.default_script.clone());
        state.storyteller_id = Some(storyteller_id.into());
        info!(room = %state.room_id, script = %state.current_script_id, "Created table");
        Self {
            state: Arc::new(state),
            config,
            sink,
        }
    }

    /// Resume from an existing snapshot
    pub fn from_state(state: GameState, config: RulesConfig, sink: Box<dyn SyncSink>) -> Self {
        invariants::assert_game_invariants(&state);
        Self {
            state: Arc::new(state),
            config,
            sink,
        }
    }

    /// Current snapshot
    pub fn state(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// What `user_id` is allowed to see
    pub fn view_for(&self, user_id: &str) -> GameState {
        filter_game_state_for_user(&self.state, user_id, self.state.is_storyteller(user_id))
    }

    pub fn chain_reactions(&self, trigger: TriggerType, seat_id: u32) -> Vec<ChainReactionEvent> {
        detect_chain_reactions(&self.state, trigger, seat_id)
    }

    fn commit<T>(&mut self, mutate: impl FnOnce(&mut GameState, &RulesConfig) -> Result<T>) -> Result<T> {
        let mut next = (*self.state).clone();
        let out = mutate(&mut next, &self.config)?;
        next.version += 1;
        invariants::assert_game_invariants(&next);
        self.state = Arc::new(next);
        self.sink.sync(Arc::clone(&self.state));
        Ok(out)
    }

    // Seating

    pub fn set_seat_count(&mut self, count: usize) -> Result<()> {
        self.commit(|state, config| {
            ensure_setup(state)?;
            if count > config.max_seats {
                return Err(Error::Configuration(format!(
                    "A table holds at most {} seats, asked for {}",
                    config.max_seats, count
                )));
            }
            if count < state.seats.len() {
                state.seats.truncate(count);
            } else {
                let start = state.seats.len() as u32;
                state.seats.extend((start..count as u32).map(Seat::new));
            }
            Ok(())
        })
    }

    /// Seat a user, moving them if they already sit elsewhere
    pub fn join_seat(&mut self, seat_id: u32, user_id: &str, user_name: &str) -> Result<bool> {
        self.commit(|state, _| {
            match state.seat(seat_id) {
                None => {
                    debug!(seat = seat_id, "Seat not found, ignoring join");
                    return Ok(false);
                }
                Some(seat) if seat.is_occupied() && !seat.is_owned_by(user_id) => {
                    return Err(Error::InvalidOperation(format!("Seat {} is taken", seat_id)));
                }
                Some(_) => {}
            }

            for seat in state.seats.iter_mut().filter(|s| s.is_owned_by(user_id)) {
                seat.user_id = None;
                seat.user_name.clear();
            }
            if let Some(seat) = state.seat_mut(seat_id) {
                seat.user_id = Some(user_id.to_string());
                seat.user_name = user_name.to_string();
                seat.is_virtual = false;
            }
            info!(seat = seat_id, user = user_id, "Player took a seat");
            Ok(true)
        })
    }

    pub fn leave_seat(&mut self, user_id: &str) -> Result<bool> {
        self.commit(|state, _| {
            let mut left = false;
            for seat in state.seats.iter_mut().filter(|s| s.is_owned_by(user_id)) {
                seat.user_id = None;
                seat.user_name.clear();
                left = true;
            }
            Ok(left)
        })
    }

    /// Fill the first vacant seat with a virtual player, adding a seat if needed
    pub fn add_virtual_player(&mut self, name: &str) -> Result<u32> {
        self.commit(|state, config| {
            ensure_setup(state)?;
            let seat_id = match state.seats.iter().find(|s| !s.is_occupied()) {
                Some(seat) => seat.id,
                None => {
                    if state.seats.len() >= config.max_seats {
                        return Err(Error::Configuration(format!(
                            "A table holds at most {} seats",
                            config.max_seats
                        )));
                    }
                    let id = state.seats.iter().map(|s| s.id + 1).max().unwrap_or(0);
                    state.seats.push(Seat::new(id));
                    id
                }
            };
            if let Some(seat) = state.seat_mut(seat_id) {
                seat.is_virtual = true;
                seat.user_name = name.to_string();
            }
            Ok(seat_id)
        })
    }

    // Scripts and roles

    pub fn set_script(&mut self, script_id: &str) -> Result<()> {
        self.commit(|state, _| {
            ensure_setup(state)?;
            let id = state
                .catalog()
                .script(script_id)
                .map(|s| s.id.to_string())
                .ok_or_else(|| Error::ScriptNotFound(script_id.to_string()))?;
            state.current_script_id = id;
            Ok(())
        })
    }

    /// Add a user-authored script; nothing changes when the import is malformed
    pub fn import_custom_script(&mut self, json: &str) -> Result<String> {
        let import = catalog::import_custom_script(json)?;
        self.commit(move |state, _| {
            let script_id = import.script.id.clone();
            for role in import.custom_roles {
                state.custom_roles.retain(|r| r.id != role.id);
                state.custom_roles.push(role);
            }
            state.custom_scripts.retain(|s| s.id != script_id);
            state.custom_scripts.push(import.script);
            info!(script = %script_id, "Imported custom script");
            Ok(script_id)
        })
    }

    /// Draw roles for every seat and hand them out in seating order
    pub fn assign_roles(&mut self, hints: Option<&StrategyHints>) -> Result<()> {
        self.commit(|state, config| {
            ensure_setup(state)?;
            let catalog = state.catalog();
            let roles = generate_role_assignment(
                &catalog,
                &state.current_script_id,
                state.seats.len(),
                hints,
                config.assignment_attempts,
            )?;
            let assignments = resolve_disguises(&catalog, &state.current_script_id, &roles)?;

            assign_to_seats(&mut state.seats, &assignments);
            state.setup_phase = SetupPhase::Ready;
            for assignment in &assignments {
                let seat_id = state
                    .seats
                    .iter()
                    .find(|s| s.real_role_id.as_deref() == Some(assignment.real_role_id.as_str()))
                    .map(|s| s.id);
                let detail = if assignment.real_role_id == assignment.seen_role_id {
                    format!("Assigned {}", assignment.real_role_id)
                } else {
                    format!(
                        "Assigned {} shown as {}",
                        assignment.real_role_id, assignment.seen_role_id
                    )
                };
                state.log_interaction(InteractionKind::RoleAssigned, seat_id, detail);
            }
            info!(room = %state.room_id, players = state.seats.len(), "Assigned roles");
            Ok(())
        })
    }

    /// Clear roles and return to SETUP for a new game
    pub fn reset_roles(&mut self) -> Result<()> {
        self.commit(|state, _| {
            for seat in &mut state.seats {
                seat.role_id = None;
                seat.real_role_id = None;
                seat.seen_role_id = None;
                seat.is_dead = false;
                seat.has_ghost_vote = true;
                seat.reminders.clear();
                seat.statuses.clear();
                seat.has_used_ability = false;
                seat.clear_vote_flags();
            }
            let old = state.phase;
            state.phase = Phase::Setup;
            state.setup_phase = SetupPhase::Assigning;
            state.roles_revealed = false;
            state.voting = None;
            state.night_queue.clear();
            state.night_current_index = -1;
            state.round_info = RoundInfo::default();
            state.game_over = GameOver::default();
            state.executed_today = None;
            state.vote_history.clear();
            state.daily_nominations.clear();
            state.night_action_requests.clear();
            rules::handle_phase_change(state, Phase::Setup, old);
            Ok(())
        })
    }

    pub fn start_game(&mut self) -> Result<()> {
        self.commit(|state, _| {
            ensure_not_over(state)?;
            if state.setup_phase != SetupPhase::Ready {
                return Err(Error::InvalidOperation(
                    "Roles must be assigned before the game starts".to_string(),
                ));
            }
            state.setup_phase = SetupPhase::Started;
            state.roles_revealed = true;
            let old = state.phase;
            state.phase = Phase::Night;
            rules::handle_phase_change(state, Phase::Night, old);
            info!(room = %state.room_id, "Game started");
            Ok(())
        })
    }

    // Phases

    pub fn set_phase(&mut self, phase: Phase) -> Result<()> {
        self.commit(|state, _| {
            ensure_not_over(state)?;
            if phase == Phase::GameOver {
                return Err(Error::InvalidOperation(
                    "Use end_game to finish a game".to_string(),
                ));
            }
            if phase == Phase::Setup && state.has_started() {
                return Err(Error::InvalidOperation(
                    "The game is in progress; use reset_roles to return to setup".to_string(),
                ));
            }
            if phase != Phase::Setup && !state.has_started() {
                return Err(Error::InvalidOperation(
                    "The game has not started".to_string(),
                ));
            }

            let old = state.phase;
            if old.is_daytime() && phase == Phase::Night {
                let context = WinContext {
                    execution_occurred: state.executed_today.is_some(),
                    executed_seat_id: state.executed_today,
                };
                let result = rules::check_game_over(&state.catalog(), &state.seats, Some(&context));
                if let Some(result) = result {
                    finish(state, result);
                    return Ok(());
                }
            }

            state.phase = phase;
            rules::handle_phase_change(state, phase, old);
            Ok(())
        })
    }

    pub fn next_night_step(&mut self) -> Result<Option<String>> {
        self.step_night(true)
    }

    pub fn previous_night_step(&mut self) -> Result<Option<String>> {
        self.step_night(false)
    }

    fn step_night(&mut self, forward: bool) -> Result<Option<String>> {
        self.commit(|state, _| {
            ensure_not_over(state)?;
            if state.phase != Phase::Night {
                return Err(Error::InvalidOperation("It is not night".to_string()));
            }
            Ok(rules::step_night(state, forward).map(str::to_string))
        })
    }

    // Nominations and votes

    pub fn start_vote(&mut self, nominee_seat_id: u32, nominator_seat_id: Option<u32>) -> Result<bool> {
        self.commit(|state, _| {
            ensure_not_over(state)?;
            if !state.phase.is_daytime() {
                return Err(Error::InvalidOperation(
                    "Nominations happen during the day".to_string(),
                ));
            }
            let opened = rules::start_vote(state, nominee_seat_id, nominator_seat_id)?;
            if opened {
                let old = state.phase;
                state.phase = Phase::Voting;
                rules::handle_phase_change(state, Phase::Voting, old);
            }
            Ok(opened)
        })
    }

    pub fn raise_hand(&mut self, seat_id: u32) -> Result<bool> {
        self.commit(|state, _| Ok(rules::raise_hand(state, seat_id)))
    }

    pub fn lower_hand(&mut self, seat_id: u32) -> Result<bool> {
        self.commit(|state, _| Ok(rules::lower_hand(state, seat_id)))
    }

    pub fn advance_clock_hand(&mut self) -> Result<Option<u32>> {
        self.commit(|state, _| Ok(rules::advance_clock_hand(state)))
    }

    /// Tally the open vote; execution is a separate storyteller decision
    pub fn close_vote(&mut self) -> Result<Option<VoteRecord>> {
        self.commit(|state, _| {
            ensure_not_over(state)?;
            let record = rules::close_vote(state);
            if record.is_some() && state.phase == Phase::Voting {
                state.phase = Phase::Day;
                rules::handle_phase_change(state, Phase::Day, Phase::Voting);
            }
            Ok(record)
        })
    }

    /// Execute a seat for today
    pub fn execute(&mut self, seat_id: u32) -> Result<bool> {
        self.commit(|state, config| {
            ensure_not_over(state)?;
            if !state.phase.is_daytime() {
                return Err(Error::InvalidOperation("Executions happen during the day".to_string()));
            }
            if let Some(executed) = state.executed_today {
                return Err(Error::InvalidOperation(format!(
                    "Seat {} was already executed today",
                    executed
                )));
            }
            let Some(seat) = state.seat(seat_id) else {
                debug!(seat = seat_id, "Seat not found, ignoring execution");
                return Ok(false);
            };

            if seat.is_alive() {
                rules::toggle_dead(state, seat_id, config.scarlet_woman_min_alive);
            }
            state.executed_today = Some(seat_id);
            state.log_interaction(
                InteractionKind::Execution,
                Some(seat_id),
                format!("Seat {} was executed", seat_id),
            );
            state.push_system_message(format!("Seat {} has been executed", seat_id));
            info!(seat = seat_id, "Executed");

            let result = rules::check_game_over(
                &state.catalog(),
                &state.seats,
                Some(&WinContext::execution(seat_id)),
            );
            if let Some(result) = result {
                finish(state, result);
            }
            Ok(true)
        })
    }

    // Seats

    /// Flip a seat's life state; a started game ends when a win condition fires
    pub fn toggle_dead(&mut self, seat_id: u32) -> Result<Option<DeathToggle>> {
        self.commit(|state, config| {
            let outcome = rules::toggle_dead(state, seat_id, config.scarlet_woman_min_alive);
            if outcome.is_some() && state.has_started() && !state.game_over.is_over {
                let result = rules::check_game_over(&state.catalog(), &state.seats, None);
                if let Some(result) = result {
                    finish(state, result);
                }
            }
            Ok(outcome)
        })
    }

    pub fn use_ghost_vote(&mut self, seat_id: u32) -> Result<bool> {
        self.commit(|state, _| {
            let used = state.seat_mut(seat_id).map(rules::use_ghost_vote).unwrap_or(false);
            if used {
                state.log_interaction(
                    InteractionKind::GhostVoteUsed,
                    Some(seat_id),
                    format!("Seat {} spent their ghost vote", seat_id),
                );
            }
            Ok(used)
        })
    }

    pub fn set_seat_role(&mut self, seat_id: u32, role_id: &str) -> Result<bool> {
        self.commit(|state, _| Ok(rules::set_seat_role(state, seat_id, role_id)))
    }

    /// Returns whether the status is now set, `None` for an unknown seat
    pub fn toggle_status(&mut self, seat_id: u32, status: SeatStatus) -> Result<Option<bool>> {
        self.commit(|state, _| {
            Ok(state
                .seat_mut(seat_id)
                .map(|seat| rules::toggle_status(seat, status)))
        })
    }

    pub fn add_reminder(&mut self, reminder: Reminder) -> Result<bool> {
        self.commit(|state, _| Ok(rules::add_reminder(state, reminder)))
    }

    pub fn remove_reminder(&mut self, reminder_id: &str) -> Result<bool> {
        self.commit(|state, _| Ok(rules::remove_reminder(state, reminder_id)))
    }

    pub fn mark_ability_used(&mut self, seat_id: u32) -> Result<bool> {
        self.commit(|state, _| {
            Ok(match state.seat_mut(seat_id) {
                Some(seat) => {
                    seat.has_used_ability = true;
                    true
                }
                None => false,
            })
        })
    }

    // Messages, night actions, notes

    pub fn send_message(&mut self, sender_id: &str, content: &str, recipient_id: Option<&str>) -> Result<bool> {
        self.apply_operation(
            sender_id,
            &PlayerOperation::SendMessage {
                content: content.to_string(),
                recipient_id: recipient_id.map(str::to_string),
            },
        )
    }

    pub fn add_system_message(&mut self, content: &str) -> Result<()> {
        self.commit(|state, _| {
            state.push_system_message(content);
            Ok(())
        })
    }

    pub fn submit_night_action(
        &mut self,
        actor: &str,
        seat_id: u32,
        role_id: &str,
        targets: Vec<u32>,
        note: Option<String>,
    ) -> Result<bool> {
        self.apply_operation(
            actor,
            &PlayerOperation::NightAction {
                seat_id,
                role_id: role_id.to_string(),
                targets,
                note,
            },
        )
    }

    /// Answer or dismiss a pending night action
    pub fn resolve_night_action(
        &mut self,
        request_id: &str,
        response: Option<String>,
        dismiss: bool,
    ) -> Result<bool> {
        self.commit(|state, _| {
            let Some(request) = state
                .night_action_requests
                .iter_mut()
                .find(|r| r.id == request_id && r.is_pending())
            else {
                debug!(request = request_id, "Pending night action not found");
                return Ok(false);
            };
            request.status = if dismiss {
                NightActionStatus::Dismissed
            } else {
                NightActionStatus::Resolved
            };
            request.response = response;
            let seat_id = request.seat_id;
            let detail = format!("Night action {} for seat {} {:?}", request_id, seat_id, request.status);
            state.log_interaction(InteractionKind::NightActionResolved, Some(seat_id), detail);
            Ok(true)
        })
    }

    pub fn add_storyteller_note(&mut self, text: &str, seat_id: Option<u32>) -> Result<String> {
        self.commit(|state, _| {
            let note = StorytellerNote::new(text.to_string(), seat_id);
            let id = note.id.clone();
            state.storyteller_notes.push(note);
            Ok(id)
        })
    }

    /// Declare the game over
    pub fn end_game(&mut self, winner: Alignment, reason: &str) -> Result<()> {
        self.commit(|state, _| {
            ensure_not_over(state)?;
            finish(
                state,
                WinResult {
                    winner,
                    reason: reason.to_string(),
                },
            );
            Ok(())
        })
    }

    /// Apply a player operation on behalf of `actor`
    pub fn apply_operation(&mut self, actor: &str, op: &PlayerOperation) -> Result<bool> {
        let is_storyteller = self.state.is_storyteller(actor);
        let result = self.commit(|state, _| apply_player_operation(state, actor, is_storyteller, op));
        if let Err(err) = &result {
            warn!(actor, op = op.name(), error = %err, "Operation rejected");
        }
        result
    }
}

fn ensure_not_over(state: &GameState) -> Result<()> {
    if state.game_over.is_over {
        return Err(Error::GameOver(state.game_over.reason.clone()));
    }
    Ok(())
}

fn ensure_setup(state: &GameState) -> Result<()> {
    if state.phase != Phase::Setup {
        return Err(Error::InvalidOperation(format!(
            "Only possible during setup, the game is in {}",
            state.phase
        )));
    }
    Ok(())
}

fn finish(state: &mut GameState, result: WinResult) {
    let old = state.phase;
    state.game_over = GameOver {
        is_over: true,
        winner: Some(result.winner),
        reason: result.reason.clone(),
    };
    state.phase = Phase::GameOver;
    rules::handle_phase_change(state, Phase::GameOver, old);
    state.push_system_message(format!("{} wins: {}", result.winner, result.reason));
    state.log_interaction(InteractionKind::GameEnded, None, result.reason.clone());
    info!(room = %state.room_id, winner = %result.winner, reason = %result.reason, "Game over");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<u64>>);

    impl SyncSink for Arc<Recorder> {
        fn sync(&self, snapshot: Arc<GameState>) {
            self.0.lock().unwrap().push(snapshot.version);
        }
    }

    fn table_with_roles(roles: &[&str]) -> Table {
        let mut table = Table::create("ROOM01", "st", RulesConfig::default(), Box::new(NoopSync));
        table.set_seat_count(roles.len()).unwrap();
        for (i, role) in roles.iter().enumerate() {
            table.join_seat(i as u32, &format!("u{i}"), &format!("Player {i}")).unwrap();
            table.set_seat_role(i as u32, role).unwrap();
        }
        table.commit(|state, _| {
            state.setup_phase = SetupPhase::Ready;
            Ok(())
        })
        .unwrap();
        table.start_game().unwrap();
        table
    }

    #[test]
    fn test_commit_bumps_version_and_syncs() {
        let recorder = Arc::new(Recorder::default());
        let mut table = Table::create("ROOM01", "st", RulesConfig::default(), Box::new(Arc::clone(&recorder)));
        let before = table.state();
        table.set_seat_count(5).unwrap();
        table.add_system_message("hello").unwrap();

        assert_eq!(before.version, 0);
        assert!(before.seats.is_empty());
        assert_eq!(table.state().version, 2);
        assert_eq!(*recorder.0.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_failed_mutation_changes_nothing() {
        let mut table = Table::create("ROOM01", "st", RulesConfig::default(), Box::new(NoopSync));
        let before = table.state();
        assert!(matches!(table.set_seat_count(99), Err(Error::Configuration(_))));
        assert!(Arc::ptr_eq(&before, &table.state()));
    }

    #[test]
    fn test_set_script_accepts_aliases() {
        let mut table = Table::create("ROOM01", "st", RulesConfig::default(), Box::new(NoopSync));
        table.set_script("bmr").unwrap();
        assert_eq!(table.state().current_script_id, "bad_moon_rising");
        assert!(matches!(table.set_script("nope"), Err(Error::ScriptNotFound(_))));
    }

    #[test]
    fn test_assign_roles_needs_enough_seats() {
        let mut table = Table::create("ROOM01", "st", RulesConfig::default(), Box::new(NoopSync));
        table.set_seat_count(3).unwrap();
        assert!(matches!(table.assign_roles(None), Err(Error::Configuration(_))));
        assert_eq!(table.state().setup_phase, SetupPhase::Assigning);
    }

    #[test]
    fn test_start_requires_assignment() {
        let mut table = Table::create("ROOM01", "st", RulesConfig::default(), Box::new(NoopSync));
        table.set_seat_count(5).unwrap();
        assert!(matches!(table.start_game(), Err(Error::InvalidOperation(_))));
        table.assign_roles(None).unwrap();
        table.start_game().unwrap();
        let state = table.state();
        assert_eq!(state.phase, Phase::Night);
        assert_eq!(state.round_info.night_count, 1);
        assert!(state.roles_revealed);
    }

    #[test]
    fn test_executing_the_saint_ends_the_game() {
        let mut table = table_with_roles(&["saint", "imp", "chef", "empath", "monk"]);
        table.set_phase(Phase::Day).unwrap();
        table.execute(0).unwrap();
        let state = table.state();
        assert!(state.game_over.is_over);
        assert_eq!(state.game_over.winner, Some(Alignment::Evil));
        assert_eq!(state.phase, Phase::GameOver);
        assert!(matches!(table.set_phase(Phase::Night), Err(Error::GameOver(_))));
    }

    #[test]
    fn test_mayor_wins_at_dusk_without_execution() {
        let mut table = table_with_roles(&["mayor", "imp", "chef", "empath", "monk"]);
        table.set_phase(Phase::Day).unwrap();
        table.toggle_dead(3).unwrap();
        table.toggle_dead(4).unwrap();
        assert!(!table.state().game_over.is_over);

        table.set_phase(Phase::Night).unwrap();
        let state = table.state();
        assert_eq!(state.game_over.winner, Some(Alignment::Good));
        assert_eq!(state.game_over.reason, rules::MAYOR_VICTORY);
    }

    #[test]
    fn test_killing_the_demon_ends_the_game() {
        let mut table = table_with_roles(&["imp", "chef", "empath", "monk", "saint"]);
        table.toggle_dead(0).unwrap();
        assert_eq!(table.state().game_over.winner, Some(Alignment::Good));
    }

    #[test]
    fn test_scarlet_woman_keeps_the_game_going() {
        let mut table = table_with_roles(&["imp", "scarlet_woman", "chef", "empath", "monk"]);
        let outcome = table.toggle_dead(0).unwrap().unwrap();
        assert_eq!(outcome.successor, Some(1));
        assert!(!table.state().game_over.is_over);
    }

    #[test]
    fn test_scarlet_woman_inherits_with_four_alive() {
        let mut table = table_with_roles(&["imp", "scarlet_woman", "chef", "empath"]);
        let outcome = table.toggle_dead(0).unwrap().unwrap();
        assert_eq!(outcome.successor, Some(1));
        let state = table.state();
        assert_eq!(state.seats[1].real_role_id.as_deref(), Some("imp"));
        assert!(!state.game_over.is_over);
    }

    #[test]
    fn test_setup_phase_rejected_mid_game() {
        let mut table = table_with_roles(&["imp", "chef", "empath", "monk", "saint"]);
        table.set_phase(Phase::Day).unwrap();
        let before = table.state();
        assert!(matches!(table.set_phase(Phase::Setup), Err(Error::InvalidOperation(_))));
        assert!(Arc::ptr_eq(&before, &table.state()));
        assert!(matches!(table.assign_roles(None), Err(Error::InvalidOperation(_))));

        table.reset_roles().unwrap();
        assert_eq!(table.state().phase, Phase::Setup);
        assert_eq!(table.state().setup_phase, SetupPhase::Assigning);
    }

    #[test]
    fn test_one_execution_per_day() {
        let mut table = table_with_roles(&["imp", "chef", "empath", "monk", "saint", "soldier"]);
        table.set_phase(Phase::Day).unwrap();
        assert!(table.execute(2).unwrap());
        assert!(matches!(table.execute(3), Err(Error::InvalidOperation(_))));
        table.set_phase(Phase::Night).unwrap();
        table.set_phase(Phase::Day).unwrap();
        assert!(table.execute(3).unwrap());
    }

    #[test]
    fn test_vote_cycle_returns_to_day() {
        let mut table = table_with_roles(&["imp", "chef", "empath", "monk", "saint"]);
        table.set_phase(Phase::Day).unwrap();
        table.start_vote(2, Some(1)).unwrap();
        assert_eq!(table.state().phase, Phase::Voting);
        for seat in [0, 1, 3] {
            table.raise_hand(seat).unwrap();
        }
        let record = table.close_vote().unwrap().unwrap();
        assert!(record.passed);
        let state = table.state();
        assert_eq!(state.phase, Phase::Day);
        assert_eq!(state.round_info.day_count, 1);
        assert_eq!(crate::selectors::execution_candidate(&state), Some(2));
    }

    #[test]
    fn test_reset_reopens_after_game_over() {
        let mut table = table_with_roles(&["imp", "chef", "empath", "monk", "saint"]);
        table.end_game(Alignment::Good, "Storyteller call").unwrap();
        assert!(matches!(table.end_game(Alignment::Evil, "again"), Err(Error::GameOver(_))));

        table.reset_roles().unwrap();
        let state = table.state();
        assert_eq!(state.phase, Phase::Setup);
        assert!(!state.game_over.is_over);
        assert!(state.seats.iter().all(|s| s.real_role_id.is_none() && !s.is_dead));
        assert_eq!(state.round_info, RoundInfo::default());
    }

    #[test]
    fn test_night_steps() {
        let mut table = table_with_roles(&["poisoner", "imp", "chef", "empath", "monk"]);
        let state = table.state();
        assert_eq!(state.night_queue, vec!["poisoner", "chef", "empath"]);
        assert_eq!(table.next_night_step().unwrap().as_deref(), Some("chef"));
        assert_eq!(table.previous_night_step().unwrap().as_deref(), Some("poisoner"));
    }

    #[test]
    fn test_resolve_night_action() {
        let mut table = table_with_roles(&["monk", "imp", "chef", "empath", "saint"]);
        table.submit_night_action("u0", 0, "monk", vec![2], None).unwrap();
        let id = table.state().night_action_requests[0].id.clone();
        assert!(table.resolve_night_action(&id, Some("Protected".into()), false).unwrap());
        assert!(!table.resolve_night_action(&id, None, true).unwrap());

        let view = table.view_for("u0");
        assert_eq!(view.night_action_requests[0].response.as_deref(), Some("Protected"));
        assert!(table.view_for("u2").night_action_requests.is_empty());
    }

    #[test]
    fn test_join_seat_moves_player() {
        let mut table = Table::create("ROOM01", "st", RulesConfig::default(), Box::new(NoopSync));
        table.set_seat_count(3).unwrap();
        table.join_seat(0, "u1", "Ann").unwrap();
        table.join_seat(2, "u1", "Ann").unwrap();
        let state = table.state();
        assert!(state.seats[0].user_id.is_none());
        assert_eq!(state.seat_of_user("u1").map(|s| s.id), Some(2));

        assert!(matches!(table.join_seat(2, "u2", "Bob"), Err(Error::InvalidOperation(_))));
        assert!(!table.join_seat(7, "u2", "Bob").unwrap());
    }

    #[test]
    fn test_import_custom_script() {
        let mut table = Table::create("ROOM01", "st", RulesConfig::default(), Box::new(NoopSync));
        let json = r#"[{"id":"_meta","name":"Quiet Village"},"chef","empath","investigator","librarian","imp","poisoner",{"id":"hermit","name":"Hermit","team":"outsider"}]"#;
        let id = table.import_custom_script(json).unwrap();
        table.set_script(&id).unwrap();
        let state = table.state();
        assert_eq!(state.current_script_id, id);
        assert_eq!(state.custom_roles.len(), 1);

        let before = table.state();
        assert!(table.import_custom_script("[1]").is_err());
        assert!(Arc::ptr_eq(&before, &table.state()));
    }
}
