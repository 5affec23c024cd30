//! In-memory room store and the authoritative visibility boundary
//!
//! Each room is stored as a public game state plus a separate secret
//! overlay. Callers never receive the overlay unless they are the room's
//! storyteller; everyone else gets a filtered view.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use grimoire_core::rng::generate_room_code;
use grimoire_core::{
    apply_player_operation, filter_game_state_for_user, merge_secrets, split_secrets, GameState,
    PlayerOperation, RulesConfig, SecretOverlay,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};

/// Attempts at finding an unused room code before giving up
const MAX_CODE_ATTEMPTS: usize = 64;

/// Capacity of the update broadcast channel
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// One stored room
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub code: String,
    pub storyteller_id: String,
    pub public_state: GameState,
    pub secrets: SecretOverlay,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl RoomRecord {
    fn full_state(&self) -> GameState {
        merge_secrets(self.public_state.clone(), &self.secrets)
    }

    fn store(&mut self, mut state: GameState) -> u64 {
        self.version += 1;
        state.version = self.version;
        let (public, secrets) = split_secrets(&state);
        self.public_state = public;
        self.secrets = secrets;
        self.updated_at = Utc::now();
        self.version
    }
}

/// Notification that a room changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomUpdate {
    pub code: String,
    pub version: u64,
}

/// Shared handle to every room; cheap to clone
#[derive(Clone)]
pub struct RoomStore {
    rooms: Arc<RwLock<HashMap<String, RoomRecord>>>,
    updates: broadcast::Sender<RoomUpdate>,
    config: RulesConfig,
}

impl RoomStore {
    pub fn new(config: RulesConfig) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            updates,
            config,
        }
    }

    /// Create an empty room owned by `storyteller_id`; returns its code
    #[instrument(skip(self))]
    pub async fn create_room(&self, storyteller_id: &str) -> Result<String> {
        let mut rooms = self.rooms.write().await;

        let code = (0..MAX_CODE_ATTEMPTS)
            .map(|_| generate_room_code(self.config.room_code_length))
            .find(|code| !rooms.contains_key(code))
            .ok_or_else(|| Error::Transport("no free room code available".to_string()))?;

        let mut state = GameState::new(code.clone(), self.config.default_script.clone());
        state.storyteller_id = Some(storyteller_id.to_string());
        let (public_state, secrets) = split_secrets(&state);

        rooms.insert(
            code.clone(),
            RoomRecord {
                code: code.clone(),
                storyteller_id: storyteller_id.to_string(),
                public_state,
                secrets,
                version: 0,
                updated_at: Utc::now(),
            },
        );
        info!(room = %code, "Room created");
        Ok(code)
    }

    /// Store a full snapshot from the room's storyteller and notify subscribers
    ///
    /// Last write wins: the store does not merge concurrent writers.
    #[instrument(skip(self, state), fields(version = state.version))]
    pub async fn publish(&self, code: &str, publisher: &str, state: &GameState) -> Result<u64> {
        let version = {
            let mut rooms = self.rooms.write().await;
            let record = rooms
                .get_mut(code)
                .ok_or_else(|| Error::RoomNotFound(code.to_string()))?;
            if record.storyteller_id != publisher {
                warn!(room = code, publisher, "Rejected publish from non-storyteller");
                return Err(Error::Unauthorized(format!(
                    "{} is not the storyteller of room {}",
                    publisher, code
                )));
            }
            record.store(state.clone())
        };

        self.notify(code, version);
        debug!(room = code, version, "Published snapshot");
        Ok(version)
    }

    /// Listen for changes to one room
    pub fn subscribe(&self, code: &str) -> RoomSubscription {
        RoomSubscription {
            code: code.to_string(),
            rx: self.updates.subscribe(),
        }
    }

    /// The state `caller` is allowed to see
    ///
    /// Non-members are refused outright rather than given a filtered view.
    #[instrument(skip(self))]
    pub async fn fetch_state(&self, code: &str, caller: &str) -> Result<GameState> {
        let rooms = self.rooms.read().await;
        let record = rooms
            .get(code)
            .ok_or_else(|| Error::RoomNotFound(code.to_string()))?;

        let full = record.full_state();
        if !full.is_member(caller) {
            warn!(room = code, caller, "Rejected state fetch from non-member");
            return Err(Error::Unauthorized(format!(
                "{} is not a member of room {}",
                caller, code
            )));
        }
        let is_storyteller = record.storyteller_id == caller;
        Ok(filter_game_state_for_user(&full, caller, is_storyteller))
    }

    /// The secret overlay, for the storyteller only
    #[instrument(skip(self))]
    pub async fn fetch_secrets(&self, code: &str, caller: &str) -> Result<SecretOverlay> {
        let rooms = self.rooms.read().await;
        let record = rooms
            .get(code)
            .ok_or_else(|| Error::RoomNotFound(code.to_string()))?;
        if record.storyteller_id != caller {
            warn!(room = code, caller, "Rejected secrets fetch");
            return Err(Error::Unauthorized(format!(
                "only the storyteller may read secrets of room {}",
                code
            )));
        }
        Ok(record.secrets.clone())
    }

    /// Apply a player operation server-side; returns the new room version
    #[instrument(skip(self, op), fields(op = op.name()))]
    pub async fn apply_operation(&self, code: &str, caller: &str, op: &PlayerOperation) -> Result<u64> {
        let version = {
            let mut rooms = self.rooms.write().await;
            let record = rooms
                .get_mut(code)
                .ok_or_else(|| Error::RoomNotFound(code.to_string()))?;

            let mut full = record.full_state();
            if !full.is_member(caller) {
                return Err(Error::Unauthorized(format!(
                    "{} is not a member of room {}",
                    caller, code
                )));
            }
            let is_storyteller = record.storyteller_id == caller;
            if !apply_player_operation(&mut full, caller, is_storyteller, op)? {
                debug!(room = code, "Operation changed nothing");
                return Ok(record.version);
            }
            record.store(full)
        };

        self.notify(code, version);
        Ok(version)
    }

    /// Serialized room record, secrets included, for persistence
    pub async fn export_room(&self, code: &str) -> Result<String> {
        let rooms = self.rooms.read().await;
        let record = rooms
            .get(code)
            .ok_or_else(|| Error::RoomNotFound(code.to_string()))?;
        Ok(serde_json::to_string(record)?)
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    fn notify(&self, code: &str, version: u64) {
        // No subscribers is fine
        let _ = self.updates.send(RoomUpdate {
            code: code.to_string(),
            version,
        });
    }
}

/// Stream of updates for a single room
pub struct RoomSubscription {
    code: String,
    rx: broadcast::Receiver<RoomUpdate>,
}

impl RoomSubscription {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Next update for this room; `None` once the store is gone
    ///
    /// A lagging subscriber skips to the newest updates; each update
    /// carries the version, so missed intermediate ones are harmless.
    pub async fn next(&mut self) -> Option<RoomUpdate> {
        loop {
            match self.rx.recv().await {
                Ok(update) if update.code == self.code => return Some(update),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(room = %self.code, skipped, "Subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
