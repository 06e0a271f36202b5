//! # Domain Types
//!
//! Common data structures and enums used across the application logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete mood presented by the bot, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mood {
    Sad,
    Meh,
    Happy,
    Ecstatic,
}

impl Mood {
    #[cfg(test)]
    pub const ALL: [Mood; 4] = [Mood::Sad, Mood::Meh, Mood::Happy, Mood::Ecstatic];

    /// Bands a combined score. Upper edges are inclusive; negative and NaN scores are `Sad`.
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() || score <= 0.25 {
            Mood::Sad
        } else if score <= 0.50 {
            Mood::Meh
        } else if score <= 0.75 {
            Mood::Happy
        } else {
            Mood::Ecstatic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Sad => "Sad",
            Mood::Meh => "Meh",
            Mood::Happy => "Happy",
            Mood::Ecstatic => "Ecstatic",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current weather, as delivered by a weather provider.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherReport {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percent.
    pub humidity: f64,
    /// Metres per second.
    pub wind_speed: f64,
    /// Percent.
    pub cloud_cover: f64,
    /// Millimetres in the last hour; `None` when the provider omits it.
    pub rain_1h: Option<f64>,
    pub snow_1h: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberStatus {
    pub user_id: String,
    pub online: bool,
    pub in_voice: bool,
}

/// Point-in-time view of the community's members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterSnapshot {
    pub members: Vec<MemberStatus>,
}

impl RosterSnapshot {
    /// Fraction of members not offline; `0.0` for an empty roster.
    pub fn presence_ratio(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        let online = self.members.iter().filter(|m| m.online).count();
        online as f64 / self.members.len() as f64
    }

    pub fn voice_active(&self) -> bool {
        self.members.iter().any(|m| m.in_voice)
    }

    pub fn find(&self, user_id: &str) -> Option<&MemberStatus> {
        self.members.iter().find(|m| m.user_id == user_id)
    }
}

/// One derived mood with the contributions that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodReading {
    pub mood: Mood,
    pub score: f64,
    pub daily_baseline: f64,
    pub weather_score: f64,
    pub presence_ratio: f64,
    pub voice_active: bool,
    pub messages_last_minute: usize,
    pub normalizer: f64,
}

/// An entry of the append-only mood history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodRecord {
    pub at: DateTime<Utc>,
    pub mood: Mood,
    pub score: f64,
}

/// How the owner asked the process to stop. A supervisor tells them apart by exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitRequest {
    Shutdown,
    Restart,
    Update,
}

impl ExitRequest {
    pub fn exit_code(self) -> i32 {
        match self {
            ExitRequest::Shutdown => 0,
            ExitRequest::Restart => 1,
            ExitRequest::Update => 2,
        }
    }
}
