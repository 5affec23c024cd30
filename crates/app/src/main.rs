//! Grimoire - headless Blood on the Clocktower table driver
//!
//! Runs a scripted session through the room store and prints each
//! participant's view of the final state.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod demo;
mod error;

use config::AppConfig;

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    tracing::info!(players = config.player_names.len(), "Starting Grimoire");

    if let Err(e) = demo::run(&config).await {
        tracing::error!("Session failed: {}", e);
        std::process::exit(1);
    }
}
