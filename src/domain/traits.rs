//! # Domain Traits
//!
//! Abstract interfaces for the collaborators of the bot's core (chat, weather, roster,
//! presentation, history, time). Allows for pluggable implementations in the
//! Infrastructure layer and in-memory fakes in tests.

use crate::domain::types::{Mood, MoodRecord, RosterSnapshot, WeatherReport};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Abstract interface for a Chat Provider (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Source of current weather conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self) -> Result<WeatherReport>;
}

/// Snapshot of the community's members with presence and voice state.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    async fn snapshot(&self) -> Result<RosterSnapshot>;
}

/// Applies a mood to the bot's visible status (status text and avatar).
#[async_trait]
pub trait PresentationSink: Send + Sync {
    async fn present(&self, mood: Mood) -> Result<()>;
}

/// Append-only mood history.
#[async_trait]
pub trait MoodSink: Send + Sync {
    async fn record(&self, record: &MoodRecord) -> Result<()>;
}

/// Wall-clock time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
