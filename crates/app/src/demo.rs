//! Scripted table session
//!
//! Seats the configured players, runs setup, a first night, a day with a
//! nomination and vote, and the following night, then prints what each
//! participant is allowed to see.

use grimoire_core::{Phase, PlayerOperation, Table, TriggerType};
use grimoire_sync::{OfflineQueue, QueuedOperation, RoomStore, RoomSync, StoreTransport};
use tracing::info;

use crate::config::AppConfig;
use crate::error::{Error, Result};

const STORYTELLER: &str = "storyteller";

/// Players seated by user id; the rest sit as virtual players
const JOINED_PLAYERS: usize = 2;

pub async fn run(config: &AppConfig) -> Result<()> {
    let store = RoomStore::new(config.rules.clone());
    let code = store.create_room(STORYTELLER).await?;

    let (sink, sync_task) = RoomSync::spawn(store.clone(), code.clone(), STORYTELLER);
    let mut table = Table::create(&code, STORYTELLER, config.rules.clone(), Box::new(sink));

    let joined: Vec<String> = config
        .player_names
        .iter()
        .take(JOINED_PLAYERS)
        .map(|name| name.to_lowercase())
        .collect();

    table.set_seat_count(joined.len())?;
    for ((seat_id, user_id), name) in (0u32..).zip(&joined).zip(&config.player_names) {
        table.join_seat(seat_id, user_id, name)?;
    }
    for name in config.player_names.iter().skip(JOINED_PLAYERS) {
        table.add_virtual_player(name)?;
    }

    table.assign_roles(None)?;
    table.start_game()?;
    // The cursor starts on the first role and stops at the last
    let steps = table.state().night_queue.len().saturating_sub(1);
    for _ in 0..steps {
        if let Some(role) = table.next_night_step()? {
            info!(role = %role, "Night step");
        }
    }

    table.set_phase(Phase::Day)?;
    if !table.start_vote(2, Some(1))? {
        return Err(Error::Config("nominee seat is missing".to_string()));
    }
    for seat_id in [0, 1, 3] {
        table.raise_hand(seat_id)?;
    }
    if let Some(record) = table.close_vote()? {
        info!(
            nominee = record.nominee_seat_id,
            votes = record.vote_count,
            passed = record.passed,
            "Vote closed"
        );
    }

    for event in table.chain_reactions(TriggerType::NightKill, 2) {
        info!(title = %event.title, priority = ?event.priority, "Chain reaction");
    }
    table.set_phase(Phase::Night)?;

    drop(table);
    sync_task.await?;

    // A player chats while offline and catches up on reconnect
    if let Some(user_id) = joined.first() {
        let mut queue = OfflineQueue::new(StoreTransport::new(store.clone()));
        queue.set_online(false);
        queue
            .submit(QueuedOperation::new(
                &code,
                user_id,
                PlayerOperation::SendMessage {
                    content: "Good morning, town".to_string(),
                    recipient_id: None,
                },
            ))
            .await?;
        queue.set_online(true);
        let report = queue.flush().await;
        info!(sent = report.sent, dropped = report.dropped, "Offline queue replayed");
    }

    for viewer in std::iter::once(STORYTELLER).chain(joined.iter().map(String::as_str)) {
        let view = store.fetch_state(&code, viewer).await?;
        println!("=== {} ===", viewer);
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    Ok(())
}
