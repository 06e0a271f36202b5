//! # Mood Commands
//!
//! Handles `mood`, `weather` and `sudo refresh`.

use crate::application::mood::MoodEngine;
use crate::domain::config::AppConfig;
use crate::domain::traits::ChatProvider;
use crate::interface::commands::admin::require_admin;
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_mood(engine: &MoodEngine, chat: &impl ChatProvider) -> Result<()> {
    let reading = engine.reading().await;
    let displayed = engine.displayed();
    chat.send_message(&messages::mood_report(&reading, displayed))
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

pub async fn handle_weather(engine: &MoodEngine, chat: &impl ChatProvider) -> Result<()> {
    let score = engine.weather_score().await;
    chat.send_message(&messages::weather_report(score))
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

/// Runs the daily and weather refreshes immediately and reapplies the mood.
pub async fn handle_refresh(
    config: &AppConfig,
    engine: &MoodEngine,
    chat: &impl ChatProvider,
    sender: &str,
) -> Result<()> {
    if !require_admin(config, chat, sender).await? {
        return Ok(());
    }
    engine.refresh_daily().await;
    let weather_ok = engine.refresh_weather().await.is_ok();
    engine.apply_current_mood().await;
    let mood = engine.reading().await.mood;
    chat.send_message(&messages::refresh_done(mood, weather_ok))
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
