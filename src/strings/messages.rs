//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.

use crate::domain::types::{MemberStatus, Mood, MoodReading};

pub const AUTH_DENIED: &str = "🚫 **Authorization Denied**.";
// Markdown source: `\\` renders one backslash, `\_` a literal underscore.
pub const UNKNOWN_COMMAND: &str = "Unknown command ¯\\\\\\_(ツ)\\_/¯";
pub const NO_COMMANDS: &str = "Unknown command ¯\\\\\\_(ツ)\\_/¯, and no commands are configured.";
pub const PONG: &str = "pong";
pub const WHOIS_USAGE: &str = "Usage: `sudo whois <user>`";
pub const SHUTTING_DOWN: &str = "I am shutting down now";
pub const RESTARTING: &str = "I am restarting now";
pub const UPDATING: &str = "I am updating now";

pub fn did_you_mean(prefix: char, suggestions: &[&str]) -> String {
    let list = suggestions
        .iter()
        .map(|s| format!("{prefix}{s}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{UNKNOWN_COMMAND}, but did you mean:\n{list}")
}

pub fn mood_report(reading: &MoodReading, displayed: Option<Mood>) -> String {
    let shown = displayed.map(|m| m.to_string()).unwrap_or_else(|| "nothing yet".to_string());
    format!(
        "**Mood**: {} ({:.3})\n**Displayed**: {}\n**Daily**: {:.3}\n**Weather**: {:.3}\n**Presence**: {:.0}%\n**Voice**: {}\n**Messages (1 min)**: {}",
        reading.mood,
        reading.score,
        shown,
        reading.daily_baseline,
        reading.weather_score,
        reading.presence_ratio * 100.0,
        if reading.voice_active { "yes" } else { "no" },
        reading.messages_last_minute,
    )
}

pub fn weather_report(score: f64) -> String {
    format!("**Weather score**: {score:.3}")
}

pub fn whois_found(member: &MemberStatus) -> String {
    format!(
        "{} => {}{}",
        member.user_id,
        if member.online { "online" } else { "offline" },
        if member.in_voice { ", in voice" } else { "" },
    )
}

pub fn whois_missing(user: &str) -> String {
    format!("User {user} couldn't be found.")
}

pub fn refresh_done(mood: Mood, weather_ok: bool) -> String {
    if weather_ok {
        format!("Signals refreshed, mood is now **{mood}**.")
    } else {
        format!("Signals refreshed (weather unavailable, kept previous score), mood is now **{mood}**.")
    }
}

pub fn uptime(days: i64, hours: i64, minutes: i64) -> String {
    format!("Up for {days}d {hours}h {minutes}m.")
}
