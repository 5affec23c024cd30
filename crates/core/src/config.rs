//! Table rules configuration
//!
//! Knobs that vary between tables. Rules that define the game itself
//! (vote ratio, evil win threshold) are constants in `rules`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for a table, loadable from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Minimum living players (before the death) for the Scarlet Woman to inherit; 0 means always
    pub scarlet_woman_min_alive: usize,
    /// How many times assignment re-draws to avoid forbidden jinx pairs
    pub assignment_attempts: usize,
    /// Upper bound on seats at one table
    pub max_seats: usize,
    /// Length of generated room codes
    pub room_code_length: usize,
    /// Script selected for a freshly created room
    pub default_script: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            scarlet_woman_min_alive: 0,
            assignment_attempts: 32,
            max_seats: 20,
            room_code_length: 6,
            default_script: "trouble_brewing".to_string(),
        }
    }
}

impl RulesConfig {
    /// Parse a config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded rules config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = RulesConfig::from_toml("").unwrap();
        assert_eq!(config, RulesConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = RulesConfig::from_toml(
            r#"
scarlet_woman_min_alive = 5
default_script = "bad_moon_rising"
"#,
        )
        .unwrap();
        assert_eq!(config.scarlet_woman_min_alive, 5);
        assert_eq!(config.default_script, "bad_moon_rising");
        assert_eq!(config.max_seats, 20);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = RulesConfig::from_toml("vote_ratio = 0.7");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rules.toml");
        fs::write(&path, "room_code_length = 4\n").unwrap();

        let config = RulesConfig::load(&path).unwrap();
        assert_eq!(config.room_code_length, 4);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = RulesConfig::load(&temp.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
