//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the Matrix connection, the weather service, command handling
//! and the mood engine's schedule and presentation assets.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    pub mood: MoodConfig,
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads and parses the YAML configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("{} ({})", crate::strings::logs::CONFIG_READ_ERROR, path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context(crate::strings::logs::CONFIG_PARSE_ERROR)
    }
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub homeserver: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: default_weather_endpoint(),
            city: default_city(),
            api_key: None,
            api_key_env: default_api_key_env(),
        }
    }
}

impl WeatherConfig {
    /// Explicit key first, then the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty()))
    }
}

fn default_weather_endpoint() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_city() -> String {
    "Berlin".to_string()
}

fn default_api_key_env() -> String {
    "OPENWEATHER_API_KEY".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CommandsConfig {
    #[serde(default = "default_prefix")]
    pub prefix: char,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> char {
    '$'
}

/// Settings of the mood engine.
#[derive(Debug, Deserialize, Clone)]
pub struct MoodConfig {
    /// Room whose joined members form the community roster.
    pub community_room: String,
    /// Rooms treated as voice channels (e.g. call rooms).
    #[serde(default)]
    pub voice_rooms: Vec<String>,
    /// Mood name -> `mxc://` avatar URI.
    #[serde(default)]
    pub avatars: HashMap<String, String>,
    #[serde(default = "default_history_file")]
    pub history_file: String,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

fn default_history_file() -> String {
    "data/mood_history.jsonl".to_string()
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScheduleConfig {
    #[serde(default = "default_daily_secs")]
    pub daily_secs: u64,
    #[serde(default = "default_weather_secs")]
    pub weather_secs: u64,
    #[serde(default = "default_recompute_secs")]
    pub recompute_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_secs: default_daily_secs(),
            weather_secs: default_weather_secs(),
            recompute_secs: default_recompute_secs(),
        }
    }
}

impl ScheduleConfig {
    pub fn daily(&self) -> Duration {
        Duration::from_secs(self.daily_secs.max(1))
    }

    pub fn weather(&self) -> Duration {
        Duration::from_secs(self.weather_secs.max(1))
    }

    pub fn recompute(&self) -> Duration {
        Duration::from_secs(self.recompute_secs.max(1))
    }
}

fn default_daily_secs() -> u64 {
    24 * 60 * 60
}
fn default_weather_secs() -> u64 {
    8 * 60 * 60
}
fn default_recompute_secs() -> u64 {
    60
}

/// System-level settings for the bot.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct SystemConfig {
    /// Users allowed to run `sudo` commands.
    #[serde(default)]
    pub admin: Vec<String>,
    /// The single user allowed to run `owner` commands.
    #[serde(default)]
    pub owner: Option<String>,
}

impl SystemConfig {
    pub fn is_admin(&self, user: &str) -> bool {
        self.admin.iter().any(|a| a == user) || self.is_owner(user)
    }

    pub fn is_owner(&self, user: &str) -> bool {
        self.owner.as_deref() == Some(user)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            file: default_log_file(),
            filter: None,
        }
    }
}

fn default_log_dir() -> String {
    "data".to_string()
}
fn default_log_file() -> String {
    "session.log".to_string()
}
