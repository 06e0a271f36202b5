//! # Miscellaneous Commands
//!
//! Handles `ping`, `owner uptime` and the owner's `shutdown`, `restart` and `update`.

use crate::domain::config::AppConfig;
use crate::domain::traits::ChatProvider;
use crate::domain::types::ExitRequest;
use crate::interface::commands::admin::require_owner;
use crate::strings::messages;
use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

pub async fn handle_ping(chat: &impl ChatProvider) -> Result<()> {
    chat.send_message(messages::PONG).await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

pub async fn handle_uptime(
    config: &AppConfig,
    chat: &impl ChatProvider,
    sender: &str,
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<()> {
    if !require_owner(config, chat, sender).await? {
        return Ok(());
    }
    let elapsed = now - started_at;
    let msg = messages::uptime(
        elapsed.num_days(),
        elapsed.num_hours() % 24,
        elapsed.num_minutes() % 60,
    );
    chat.send_message(&msg).await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

/// Asks the main loop to stop; it exits with the request's code.
pub async fn handle_exit(
    config: &AppConfig,
    chat: &impl ChatProvider,
    sender: &str,
    request: ExitRequest,
    shutdown: &watch::Sender<Option<ExitRequest>>,
) -> Result<()> {
    if !require_owner(config, chat, sender).await? {
        return Ok(());
    }
    let farewell = match request {
        ExitRequest::Shutdown => messages::SHUTTING_DOWN,
        ExitRequest::Restart => messages::RESTARTING,
        ExitRequest::Update => messages::UPDATING,
    };
    let _ = chat.send_message(farewell).await;
    tracing::info!("{:?} requested by {}", request, sender);
    shutdown.send_replace(Some(request));
    Ok(())
}
