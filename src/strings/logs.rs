//! # Log Templates
//!
//! Formats for the bot's tracing output.

use crate::application::mood::scheduler::Schedule;
use crate::domain::types::{Mood, WeatherReport};

pub const STARTING: &str = "Starting moodring...";
pub const CONFIG_READ_ERROR: &str = "Failed to read config.yaml";
pub const CONFIG_PARSE_ERROR: &str = "Failed to parse YAML";
pub const LOGIN_SUCCESS: &str = "Logged in successfully!";
pub const SYNC_LOOP_START: &str = "Starting sync loop...";
pub const SHUTDOWN: &str = "Shutting down...";
pub const MOOD_BOOTSTRAP: &str = "Bootstrapping mood engine";

pub fn config_loaded(user: &str) -> String {
    format!("Loaded configuration for user: {user}")
}

pub fn sync_loop_fail(err: &str) -> String {
    format!("Sync loop failed: {err}")
}

pub fn exit_code(code: i32) -> String {
    format!("Exiting with code {code} for the supervisor")
}

pub fn shutdown_fail(err: &str) -> String {
    format!("Unable to listen for shutdown signal: {err}")
}

pub fn invite_received(room_id: &str) -> String {
    format!("💌 Received invite for room {room_id:?}")
}

pub fn join_invite_fail(err: &str) -> String {
    format!("Failed to join room after invite: {err}")
}

pub fn received_message(sender: &str, body: &str) -> String {
    format!("Received message from {sender}: \n{body}")
}

pub fn route_failed(err: &str) -> String {
    format!("Failed to route message: {err}")
}

pub fn daily_baseline(value: f64) -> String {
    format!("Daily baseline redrawn: {value:.3}")
}

pub fn weather_score(score: f64, report: &WeatherReport) -> String {
    format!(
        "Weather score {score:.3} (temp {:.1}°C, humidity {:.0}%, wind {:.1} m/s, clouds {:.0}%, rain {:.1} mm, snow {:.1} mm)",
        report.temperature,
        report.humidity,
        report.wind_speed,
        report.cloud_cover,
        report.rain_1h.unwrap_or(0.0),
        report.snow_1h.unwrap_or(0.0),
    )
}

pub fn weather_fetch_failed(err: &str, kept: f64) -> String {
    format!("Weather fetch failed, keeping score {kept:.3}: {err}")
}

pub fn roster_failed(err: &str) -> String {
    format!("Roster snapshot failed, assuming empty roster: {err}")
}

pub fn mood_unchanged(mood: Mood, score: f64) -> String {
    format!("Mood unchanged: {mood} ({score:.3})")
}

pub fn mood_changed(from: Option<Mood>, to: Mood, score: f64) -> String {
    match from {
        Some(from) => format!("Mood changed {from} -> {to} ({score:.3})"),
        None => format!("Mood set to {to} ({score:.3})"),
    }
}

pub fn mood_history_failed(err: &str) -> String {
    format!("Failed to record mood history: {err}")
}

pub fn mood_present_failed(mood: Mood, err: &str) -> String {
    format!("Failed to present mood {mood}: {err}")
}

pub fn avatar_missing(mood: Mood) -> String {
    format!("No avatar configured for mood {mood}, keeping current avatar")
}

pub fn scheduler_started(schedule: &Schedule) -> String {
    format!(
        "Mood timers started (daily {}s, weather {}s, recompute {}s)",
        schedule.daily.as_secs(),
        schedule.weather.as_secs(),
        schedule.recompute.as_secs()
    )
}

pub fn dispatch(command: &str, args: &str, sender: &str) -> String {
    format!("Router dispatching cmd='{command}' args='{args}' sender='{sender}'")
}
