//! Bridge from a local [`Table`](grimoire_core::Table) to the room store
//!
//! `SyncSink::sync` is called synchronously on every commit. Snapshots are
//! pushed onto a channel and a background task publishes them, skipping
//! any that were superseded while it was busy.

use std::sync::Arc;

use grimoire_core::{GameState, SyncSink};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::room_store::RoomStore;

/// Sink that forwards committed snapshots to a [`RoomStore`]
#[derive(Debug, Clone)]
pub struct RoomSync {
    tx: mpsc::UnboundedSender<Arc<GameState>>,
}

impl RoomSync {
    /// Start the publishing task for `code`, writing as `publisher`
    ///
    /// The task ends once every `RoomSync` clone has been dropped and the
    /// remaining snapshots are flushed.
    pub fn spawn(store: RoomStore, code: impl Into<String>, publisher: impl Into<String>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Arc<GameState>>();
        let code = code.into();
        let publisher = publisher.into();

        let handle = tokio::spawn(async move {
            info!(room = %code, "Room sync started");
            while let Some(mut snapshot) = rx.recv().await {
                let mut skipped = 0usize;
                while let Ok(newer) = rx.try_recv() {
                    snapshot = newer;
                    skipped += 1;
                }
                if skipped > 0 {
                    debug!(room = %code, skipped, "Coalesced snapshots");
                }

                if let Err(e) = store.publish(&code, &publisher, &snapshot).await {
                    error!(room = %code, "Failed to publish snapshot: {}", e);
                }
            }
            info!(room = %code, "Room sync stopped");
        });

        (Self { tx }, handle)
    }
}

impl SyncSink for RoomSync {
    fn sync(&self, snapshot: Arc<GameState>) {
        if self.tx.send(snapshot).is_err() {
            error!("Room sync task is gone; snapshot dropped");
        }
    }
}
