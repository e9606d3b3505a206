//! Configuration management for the camp engine.
//!
//! Camp uses TOML for human-readable configuration:
//!
//! ```toml
//! [storage]
//! data_dir = "./data"
//!
//! [camp]
//! fire_cost = 300
//! fire_minutes = 60
//! quest_refresh_cost = 2000
//! attendance_reward = 300
//! leaderboard_size = 10
//! ```
//!
//! Every field has a serde default matching the deployed economy, so an
//! empty file (or a missing one passed to [`Config::create_default`]) yields
//! a working setup. Values are validated on load; a bad config is a startup
//! error, never a silent fallback.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub camp: CampConfig,
}

/// Snapshot location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Economy knobs for the policy composites in the operations layer. The
/// defaults are the canonical deployed values; the contracts in
/// `camp::ledger` / `camp::tent` do not read these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampConfig {
    /// Coin cost of lighting a tent fire.
    #[serde(default = "default_fire_cost")]
    pub fire_cost: u64,
    /// Burn time granted by a fresh fire, in minutes.
    #[serde(default = "default_fire_minutes")]
    pub fire_minutes: i64,
    /// Coin fee for voluntarily rerolling a user's daily quests.
    #[serde(default = "default_quest_refresh_cost")]
    pub quest_refresh_cost: u64,
    /// Coins paid to every member when a tent completes daily attendance.
    #[serde(default = "default_attendance_reward")]
    pub attendance_reward: u64,
    /// Rows shown by the balance and tent leaderboards.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

impl Default for CampConfig {
    fn default() -> Self {
        Self {
            fire_cost: default_fire_cost(),
            fire_minutes: default_fire_minutes(),
            quest_refresh_cost: default_quest_refresh_cost(),
            attendance_reward: default_attendance_reward(),
            leaderboard_size: default_leaderboard_size(),
        }
    }
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_fire_cost() -> u64 {
    300
}

fn default_fire_minutes() -> i64 {
    60
}

fn default_quest_refresh_cost() -> u64 {
    2000
}

fn default_attendance_reward() -> u64 {
    300
}

fn default_leaderboard_size() -> usize {
    10
}

impl Config {
    /// Load and validate configuration from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| anyhow!("cannot read config {}: {}", path.display(), e))?;
        let config: Config =
            toml::from_str(&raw).map_err(|e| anyhow!("invalid config {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Write a default configuration file; refuses to overwrite.
    pub fn create_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(anyhow!("config {} already exists", path.display()));
        }
        let config = Config::default();
        let raw = toml::to_string_pretty(&config)?;
        fs::write(path, raw)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        if self.camp.fire_minutes <= 0 {
            return Err(anyhow!("camp.fire_minutes must be positive"));
        }
        if self.camp.leaderboard_size == 0 {
            return Err(anyhow!("camp.leaderboard_size must be positive"));
        }
        Ok(())
    }
}
