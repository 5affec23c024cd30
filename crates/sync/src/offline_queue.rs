//! Offline queue for player operations
//!
//! While the client is offline, or the transport fails with a retryable
//! error, operations are held in submission order and replayed by
//! [`OfflineQueue::flush`]. Rejections (unauthorized, invalid) are never
//! retried.

use std::collections::VecDeque;
use std::future::Future;

use chrono::{DateTime, Utc};
use grimoire_core::PlayerOperation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::room_store::RoomStore;

/// Default number of delivery attempts before an operation is dropped
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// A player operation waiting for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedOperation {
    pub id: Uuid,
    pub room_code: String,
    pub actor: String,
    pub op: PlayerOperation,
    pub attempts: u32,
    pub queued_at: DateTime<Utc>,
}

impl QueuedOperation {
    pub fn new(room_code: impl Into<String>, actor: impl Into<String>, op: PlayerOperation) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_code: room_code.into(),
            actor: actor.into(),
            op,
            attempts: 0,
            queued_at: Utc::now(),
        }
    }
}

/// Delivers one operation to the authority
pub trait Transport {
    fn send(&self, op: &QueuedOperation) -> impl Future<Output = Result<()>> + Send;
}

/// Transport that applies operations directly to an in-process store
#[derive(Clone)]
pub struct StoreTransport {
    store: RoomStore,
}

impl StoreTransport {
    pub fn new(store: RoomStore) -> Self {
        Self { store }
    }
}

impl Transport for StoreTransport {
    fn send(&self, op: &QueuedOperation) -> impl Future<Output = Result<()>> + Send {
        let store = self.store.clone();
        let op = op.clone();
        async move {
            store.apply_operation(&op.room_code, &op.actor, &op.op).await?;
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Queued,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub sent: usize,
    pub dropped: usize,
    pub remaining: usize,
}

pub struct OfflineQueue<T: Transport> {
    transport: T,
    pending: VecDeque<QueuedOperation>,
    online: bool,
    max_attempts: u32,
}

impl<T: Transport> OfflineQueue<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            pending: VecDeque::new(),
            online: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn set_online(&mut self, online: bool) {
        if self.online != online {
            info!(online, pending = self.pending.len(), "Connectivity changed");
        }
        self.online = online;
    }

    /// Send now if possible, otherwise queue
    ///
    /// Anything already queued goes first so ordering is preserved.
    /// A non-retryable rejection is returned to the caller and not queued.
    pub async fn submit(&mut self, op: QueuedOperation) -> Result<SubmitOutcome> {
        if !self.online || !self.pending.is_empty() {
            debug!(id = %op.id, "Operation queued");
            self.pending.push_back(op);
            return Ok(SubmitOutcome::Queued);
        }

        match self.transport.send(&op).await {
            Ok(()) => Ok(SubmitOutcome::Sent),
            Err(e) if e.is_retryable() => {
                warn!(id = %op.id, "Send failed, queued for retry: {}", e);
                let mut op = op;
                op.attempts += 1;
                self.pending.push_back(op);
                Ok(SubmitOutcome::Queued)
            }
            Err(e) => Err(e),
        }
    }

    /// Replay queued operations in order
    ///
    /// Stops at the first retryable failure that still has attempts left.
    /// Rejected operations, and those out of attempts, are dropped.
    pub async fn flush(&mut self) -> FlushReport {
        let mut report = FlushReport::default();
        if !self.online {
            report.remaining = self.pending.len();
            return report;
        }

        while let Some(mut op) = self.pending.pop_front() {
            match self.transport.send(&op).await {
                Ok(()) => report.sent += 1,
                Err(e) if e.is_retryable() => {
                    op.attempts += 1;
                    if op.attempts >= self.max_attempts {
                        warn!(id = %op.id, attempts = op.attempts, "Dropping operation: {}", e);
                        report.dropped += 1;
                        continue;
                    }
                    debug!(id = %op.id, attempts = op.attempts, "Flush paused: {}", e);
                    self.pending.push_front(op);
                    break;
                }
                Err(e) => {
                    warn!(id = %op.id, "Dropping rejected operation: {}", e);
                    report.dropped += 1;
                }
            }
        }

        report.remaining = self.pending.len();
        if report.sent > 0 || report.dropped > 0 {
            info!(sent = report.sent, dropped = report.dropped, remaining = report.remaining, "Queue flushed");
        }
        report
    }

    pub fn pending(&self) -> impl Iterator<Item = &QueuedOperation> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Mutex;

    /// Scripted transport: pops one result per send, succeeds when empty
    #[derive(Default)]
    struct MockTransport {
        results: Mutex<VecDeque<Result<()>>>,
        delivered: Mutex<Vec<Uuid>>,
    }

    impl MockTransport {
        fn with_results(results: Vec<Result<()>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                delivered: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for MockTransport {
        fn send(&self, op: &QueuedOperation) -> impl Future<Output = Result<()>> + Send {
            let result = self.results.lock().unwrap().pop_front().unwrap_or(Ok(()));
            if result.is_ok() {
                self.delivered.lock().unwrap().push(op.id);
            }
            async move { result }
        }
    }

    fn op(seat_id: u32) -> QueuedOperation {
        QueuedOperation::new("ROOM01", "alice", PlayerOperation::RaiseHand { seat_id })
    }

    #[tokio::test]
    async fn test_submit_online_sends_immediately() {
        let mut queue = OfflineQueue::new(MockTransport::default());
        let outcome = queue.submit(op(0)).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Sent);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_offline_submissions_replay_in_order() {
        let mut queue = OfflineQueue::new(MockTransport::default());
        queue.set_online(false);

        let ops = [op(0), op(1), op(2)];
        let ids: Vec<Uuid> = ops.iter().map(|o| o.id).collect();
        for o in ops {
            assert_eq!(queue.submit(o).await.unwrap(), SubmitOutcome::Queued);
        }
        assert_eq!(queue.len(), 3);

        // still offline: nothing moves
        assert_eq!(queue.flush().await.remaining, 3);

        queue.set_online(true);
        let report = queue.flush().await;
        assert_eq!(report, FlushReport { sent: 3, dropped: 0, remaining: 0 });
        assert_eq!(*queue.transport.delivered.lock().unwrap(), ids);
    }

    #[tokio::test]
    async fn test_retryable_failure_is_queued() {
        let transport = MockTransport::with_results(vec![Err(Error::Transport("timeout".into()))]);
        let mut queue = OfflineQueue::new(transport);

        assert_eq!(queue.submit(op(0)).await.unwrap(), SubmitOutcome::Queued);
        assert_eq!(queue.pending().next().map(|o| o.attempts), Some(1));

        let report = queue.flush().await;
        assert_eq!(report.sent, 1);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_rejection_is_not_queued() {
        let transport = MockTransport::with_results(vec![Err(Error::Unauthorized("not yours".into()))]);
        let mut queue = OfflineQueue::new(transport);

        let result = queue.submit(op(0)).await;
        assert!(matches!(result, Err(Error::Unauthorized(_))));
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_flush_stops_on_retryable_failure() {
        let transport = MockTransport::with_results(vec![
            Ok(()),
            Err(Error::Transport("down".into())),
        ]);
        let mut queue = OfflineQueue::new(transport);
        queue.set_online(false);
        for seat in 0..3 {
            queue.submit(op(seat)).await.unwrap();
        }
        queue.set_online(true);

        let report = queue.flush().await;
        assert_eq!(report, FlushReport { sent: 1, dropped: 0, remaining: 2 });
        assert_eq!(queue.pending().next().map(|o| o.attempts), Some(1));
    }

    #[tokio::test]
    async fn test_flush_drops_exhausted_and_rejected() {
        let transport = MockTransport::with_results(vec![
            Err(Error::Transport("down".into())),
            Err(Error::RoomNotFound("ROOM01".into())),
        ]);
        let mut queue = OfflineQueue::new(transport).with_max_attempts(1);
        queue.set_online(false);
        for seat in 0..3 {
            queue.submit(op(seat)).await.unwrap();
        }
        queue.set_online(true);

        let report = queue.flush().await;
        assert_eq!(report, FlushReport { sent: 1, dropped: 2, remaining: 0 });
    }
}
