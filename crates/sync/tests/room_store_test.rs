//! Room store boundary, table publishing and offline replay

use std::time::Duration;

use grimoire_core::{NoopSync, Phase, PlayerOperation, RulesConfig, Table};
use grimoire_sync::{
    Error, OfflineQueue, QueuedOperation, RoomStore, RoomSync, StoreTransport, SubmitOutcome,
};

const STORYTELLER: &str = "storyteller";

/// Store with one started five-player room published by the storyteller
async fn started_room() -> (RoomStore, String, Table) {
    let store = RoomStore::new(RulesConfig::default());
    let code = store.create_room(STORYTELLER).await.unwrap();

    let mut table = Table::create(&code, STORYTELLER, RulesConfig::default(), Box::new(NoopSync));
    table.set_seat_count(2).unwrap();
    table.join_seat(0, "alice", "Alice").unwrap();
    table.join_seat(1, "bob", "Bob").unwrap();
    for name in ["Cora", "Dan", "Eve"] {
        table.add_virtual_player(name).unwrap();
    }
    table.assign_roles(None).unwrap();
    table.start_game().unwrap();
    table.set_phase(Phase::Day).unwrap();
    table.start_vote(2, None).unwrap();

    store.publish(&code, STORYTELLER, &table.state()).await.unwrap();
    (store, code, table)
}

#[tokio::test]
async fn test_create_room_uses_configured_code_length() {
    let store = RoomStore::new(RulesConfig::default());
    let code = store.create_room(STORYTELLER).await.unwrap();
    assert_eq!(code.len(), RulesConfig::default().room_code_length);
    assert_eq!(store.room_count().await, 1);

    let state = store.fetch_state(&code, STORYTELLER).await.unwrap();
    assert_eq!(state.room_id, code);
    assert_eq!(state.phase, Phase::Setup);
}

#[tokio::test]
async fn test_unknown_room() {
    let store = RoomStore::new(RulesConfig::default());
    let result = store.fetch_state("NOPE00", STORYTELLER).await;
    assert!(matches!(result, Err(Error::RoomNotFound(_))));
}

#[tokio::test]
async fn test_only_storyteller_publishes() {
    let (store, code, table) = started_room().await;
    let result = store.publish(&code, "alice", &table.state()).await;
    assert!(matches!(result, Err(Error::Unauthorized(_))));
}

#[tokio::test]
async fn test_non_member_is_refused() {
    let (store, code, _table) = started_room().await;
    let result = store.fetch_state(&code, "mallory").await;
    assert!(matches!(result, Err(Error::Unauthorized(_))));
}

#[tokio::test]
async fn test_secrets_stay_with_storyteller() {
    let (store, code, table) = started_room().await;

    assert!(matches!(
        store.fetch_secrets(&code, "alice").await,
        Err(Error::Unauthorized(_))
    ));

    let secrets = store.fetch_secrets(&code, STORYTELLER).await.unwrap();
    assert_eq!(secrets.seats.len(), 5);

    let full = store.fetch_state(&code, STORYTELLER).await.unwrap();
    let original = table.state();
    for (stored, seat) in full.seats.iter().zip(original.seats.iter()) {
        assert_eq!(stored.real_role_id, seat.real_role_id);
        assert_eq!(stored.seen_role_id, seat.seen_role_id);
    }

    let bob = store.fetch_state(&code, "bob").await.unwrap();
    assert!(bob.seats.iter().all(|s| s.real_role_id.is_none()));
    assert!(bob.storyteller_notes.is_empty());
    assert!(bob.interaction_log.is_empty());
}

#[tokio::test]
async fn test_player_operation_checks_seat_ownership() {
    let (store, code, _table) = started_room().await;

    let version = store
        .apply_operation(&code, "alice", &PlayerOperation::RaiseHand { seat_id: 0 })
        .await
        .unwrap();
    assert_eq!(version, 2);

    let state = store.fetch_state(&code, STORYTELLER).await.unwrap();
    assert_eq!(state.voting.as_ref().map(|v| v.votes.clone()), Some(vec![0]));

    let result = store
        .apply_operation(&code, "alice", &PlayerOperation::RaiseHand { seat_id: 1 })
        .await;
    assert!(matches!(result, Err(Error::Core(_))));
}

#[tokio::test]
async fn test_room_sync_publishes_latest_snapshot() {
    let store = RoomStore::new(RulesConfig::default());
    let code = store.create_room(STORYTELLER).await.unwrap();
    let mut updates = store.subscribe(&code);

    let (sink, handle) = RoomSync::spawn(store.clone(), code.clone(), STORYTELLER);
    let mut table = Table::create(&code, STORYTELLER, RulesConfig::default(), Box::new(sink));
    table.set_seat_count(5).unwrap();
    table.join_seat(3, "alice", "Alice").unwrap();
    drop(table);
    handle.await.unwrap();

    let update = tokio::time::timeout(Duration::from_secs(1), updates.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(update.code, code);

    let alice = store.fetch_state(&code, "alice").await.unwrap();
    assert_eq!(alice.seats.len(), 5);
    assert_eq!(alice.seats[3].user_id.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_offline_operations_replay_against_store() {
    let (store, code, _table) = started_room().await;
    let mut queue = OfflineQueue::new(StoreTransport::new(store.clone()));

    queue.set_online(false);
    let raise = QueuedOperation::new(&code, "bob", PlayerOperation::RaiseHand { seat_id: 1 });
    let stolen = QueuedOperation::new(&code, "bob", PlayerOperation::RaiseHand { seat_id: 0 });
    assert_eq!(queue.submit(raise).await.unwrap(), SubmitOutcome::Queued);
    assert_eq!(queue.submit(stolen).await.unwrap(), SubmitOutcome::Queued);

    queue.set_online(true);
    let report = queue.flush().await;
    assert_eq!(report.sent, 1);
    assert_eq!(report.dropped, 1);
    assert!(queue.is_empty());

    let state = store.fetch_state(&code, STORYTELLER).await.unwrap();
    assert_eq!(state.voting.as_ref().map(|v| v.votes.clone()), Some(vec![1]));
}
