// ⚙️ Configuration - file locations and arena timings
//
// Everything has a default, so a missing --config flag or a partial JSON
// file both work.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timestamped game journal
    pub journal_path: PathBuf,

    /// Character save file; the inventory goes to `<save_path>_inventory`
    pub save_path: PathBuf,

    /// GameManager roster file used by the persistence demo
    pub roster_path: PathBuf,

    /// Access-control users and resources
    pub users_path: PathBuf,
    pub resources_path: PathBuf,

    pub arena: ArenaConfig,

    /// Fixed seed for reproducible fights; None = entropy
    pub rng_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            journal_path: PathBuf::from("game_log.txt"),
            save_path: PathBuf::from("savegame.txt"),
            roster_path: PathBuf::from("game_save.txt"),
            users_path: PathBuf::from("users.csv"),
            resources_path: PathBuf::from("resources.csv"),
            arena: ArenaConfig::default(),
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub spawn_interval_ms: u64,
    pub poll_interval_ms: u64,
    pub round_pause_ms: u64,
    /// Stop after this many battles even if the hero survives
    pub max_battles: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            spawn_interval_ms: 3000,
            poll_interval_ms: 1000,
            round_pause_ms: 1000,
            max_battles: 10,
        }
    }
}

impl ArenaConfig {
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn round_pause(&self) -> Duration {
        Duration::from_millis(self.round_pause_ms)
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("when loading config file at {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("when parsing config file at {:?}", path))
    }

    /// Load from `path` if given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Inventory file that accompanies the character save
    pub fn inventory_path(&self) -> PathBuf {
        inventory_path_for(&self.save_path)
    }
}

pub fn inventory_path_for(save_path: &Path) -> PathBuf {
    let mut name = save_path.as_os_str().to_os_string();
    name.push("_inventory");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.journal_path, PathBuf::from("game_log.txt"));
        assert_eq!(config.save_path, PathBuf::from("savegame.txt"));
        assert_eq!(config.arena.max_battles, 10);
        assert_eq!(config.arena.spawn_interval(), Duration::from_secs(3));
        assert!(config.rng_seed.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rng_seed": 7, "arena": {{"max_battles": 2}}}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.arena.max_battles, 2);
        assert_eq!(config.arena.poll_interval_ms, 1000);
        assert_eq!(config.users_path, PathBuf::from("users.csv"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = Config::load("/definitely/not/here.json").unwrap_err();
        assert!(format!("{:#}", err).contains("when loading config file"));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = Config::load_or_default(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_inventory_path() {
        let config = Config::default();
        assert_eq!(config.inventory_path(), PathBuf::from("savegame.txt_inventory"));
    }
}
