//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! Every message counts towards the mood engine's activity window. Messages starting with
//! the configured prefix are looked up in the command catalog; invocations that match
//! nothing are answered with the closest known commands.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;

use crate::application::catalog::CommandCatalog;
use crate::application::mood::MoodEngine;
use crate::application::resolver::CommandResolver;
use crate::domain::config::AppConfig;
use crate::domain::traits::{ChatProvider, Clock, RosterProvider};
use crate::domain::types::ExitRequest;
use crate::interface::commands::{self, CommandKind};
use crate::strings::{logs, messages};

pub struct CommandRouter {
    config: AppConfig,
    catalog: Arc<CommandCatalog>,
    resolver: Arc<CommandResolver>,
    engine: Arc<MoodEngine>,
    roster: Arc<dyn RosterProvider>,
    clock: Arc<dyn Clock>,
    started_at: DateTime<Utc>,
    shutdown: watch::Sender<Option<ExitRequest>>,
}

impl CommandRouter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: AppConfig,
        catalog: Arc<CommandCatalog>,
        resolver: Arc<CommandResolver>,
        engine: Arc<MoodEngine>,
        roster: Arc<dyn RosterProvider>,
        clock: Arc<dyn Clock>,
        started_at: DateTime<Utc>,
        shutdown: watch::Sender<Option<ExitRequest>>,
    ) -> Self {
        Self {
            config,
            catalog,
            resolver,
            engine,
            roster,
            clock,
            started_at,
            shutdown,
        }
    }

    /// Handles one inbound message sent by `sender` at `sent_at`.
    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str, sent_at: DateTime<Utc>) -> Result<()>
    where
        C: ChatProvider,
    {
        self.engine.record_message(sent_at).await;

        let prefix = self.config.commands.prefix;
        let msg = message.trim();
        let Some(invocation) = msg.strip_prefix(prefix) else {
            return Ok(());
        };

        let Some((spec, args)) = self.catalog.lookup(invocation) else {
            return self.suggest(chat, msg).await;
        };
        tracing::info!("{}", logs::dispatch(&spec.signature(), args, sender));

        match spec.kind {
            CommandKind::Help => commands::help::handle_help(prefix, &self.catalog, chat).await?,
            CommandKind::Ping => commands::misc::handle_ping(chat).await?,
            CommandKind::Mood => commands::mood::handle_mood(&self.engine, chat).await?,
            CommandKind::Weather => commands::mood::handle_weather(&self.engine, chat).await?,
            CommandKind::WhoIs => {
                commands::admin::handle_whois(&self.config, self.roster.as_ref(), chat, sender, args).await?
            }
            CommandKind::Refresh => {
                commands::mood::handle_refresh(&self.config, &self.engine, chat, sender).await?
            }
            CommandKind::Uptime => {
                commands::misc::handle_uptime(&self.config, chat, sender, self.started_at, self.clock.now())
                    .await?
            }
            CommandKind::Shutdown => self.exit(chat, sender, ExitRequest::Shutdown).await?,
            CommandKind::Restart => self.exit(chat, sender, ExitRequest::Restart).await?,
            CommandKind::Update => self.exit(chat, sender, ExitRequest::Update).await?,
        }
        Ok(())
    }

    async fn exit<C: ChatProvider>(&self, chat: &C, sender: &str, request: ExitRequest) -> Result<()> {
        commands::misc::handle_exit(&self.config, chat, sender, request, &self.shutdown).await
    }

    /// Replies to an unknown invocation with the closest registered commands.
    async fn suggest<C: ChatProvider>(&self, chat: &C, raw: &str) -> Result<()> {
        let reply = match self.resolver.resolve(raw) {
            Some(suggestions) => {
                tracing::info!(
                    "Unknown command '{}', suggesting {:?} (distance {})",
                    raw,
                    suggestions.signatures,
                    suggestions.distance
                );
                messages::did_you_mean(self.config.commands.prefix, &suggestions.signatures)
            }
            None => messages::NO_COMMANDS.to_string(),
        };
        chat.send_message(&reply).await.map_err(|e| anyhow::anyhow!(e))?;
        Ok(())
    }
}
