//! Driver configuration

use std::path::Path;

use grimoire_core::composition::MIN_PLAYERS;
use grimoire_core::RulesConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "GRIMOIRE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Fallback `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Player names, in seating order; the first two join as users
    pub player_names: Vec<String>,
    pub rules: RulesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            player_names: ["Alice", "Bob", "Cora", "Dan", "Eve"]
                .into_iter()
                .map(String::from)
                .collect(),
            rules: RulesConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from `GRIMOIRE_CONFIG` if set, otherwise defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.player_names.len() < MIN_PLAYERS {
            return Err(Error::Config(format!(
                "at least {} player names are needed, got {}",
                MIN_PLAYERS,
                self.player_names.len()
            )));
        }
        if self.player_names.len() > self.rules.max_seats {
            return Err(Error::Config(format!(
                "{} players exceed max_seats {}",
                self.player_names.len(),
                self.rules.max_seats
            )));
        }
        Ok(())
    }
}
