//! Grimoire Sync Library
//!
//! Keeps rooms in an authoritative store that splits public state from
//! storyteller secrets, pushes table snapshots into it, and queues player
//! operations while a client is offline.

pub mod error;
pub mod offline_queue;
pub mod room_store;
pub mod room_sync;

pub use error::{Error, Result};
pub use offline_queue::{FlushReport, OfflineQueue, QueuedOperation, StoreTransport, SubmitOutcome, Transport};
pub use room_store::{RoomRecord, RoomStore, RoomSubscription, RoomUpdate};
pub use room_sync::RoomSync;
