//! # Admin Commands
//!
//! Handles `sudo whois` and the permission checks shared by `sudo` and `owner` commands.

use crate::domain::config::AppConfig;
use crate::domain::traits::{ChatProvider, RosterProvider};
use crate::strings::messages;
use anyhow::Result;

/// Replies with a denial and returns `false` if `sender` is not an admin.
pub async fn require_admin(config: &AppConfig, chat: &impl ChatProvider, sender: &str) -> Result<bool> {
    if config.system.is_admin(sender) {
        return Ok(true);
    }
    tracing::warn!("Denied admin command for {}", sender);
    chat.send_message(messages::AUTH_DENIED).await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(false)
}

pub async fn require_owner(config: &AppConfig, chat: &impl ChatProvider, sender: &str) -> Result<bool> {
    if config.system.is_owner(sender) {
        return Ok(true);
    }
    tracing::warn!("Denied owner command for {}", sender);
    chat.send_message(messages::AUTH_DENIED).await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(false)
}

pub async fn handle_whois(
    config: &AppConfig,
    roster: &dyn RosterProvider,
    chat: &impl ChatProvider,
    sender: &str,
    args: &str,
) -> Result<()> {
    if !require_admin(config, chat, sender).await? {
        return Ok(());
    }
    let Some(user) = args.split_whitespace().next() else {
        chat.send_message(messages::WHOIS_USAGE).await.map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    };

    let snapshot = roster.snapshot().await?;
    let msg = match snapshot.find(user) {
        Some(member) => messages::whois_found(member),
        None => messages::whois_missing(user),
    };
    chat.send_message(&msg).await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
