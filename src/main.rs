//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: Configuration, Types and Traits
//! - Infrastructure: Matrix, OpenWeatherMap, Mood history
//! - Application: Command catalog/resolver/router, Mood engine and scheduler
//! - Interface: Command Handlers
//!

#![recursion_limit = "256"]

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::{
        presence::PresenceEvent,
        room::member::{MembershipState, StrippedRoomMemberEvent},
        room::message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

use crate::application::catalog::CommandCatalog;
use crate::application::mood::scheduler::Schedule;
use crate::application::mood::{MoodEngine, MoodScheduler};
use crate::application::resolver::CommandResolver;
use crate::application::router::CommandRouter;
use crate::domain::config::AppConfig;
use crate::domain::traits::{Clock, RosterProvider, SystemClock};
use crate::domain::types::ExitRequest;
use crate::infrastructure::history::JsonlMoodHistory;
use crate::infrastructure::matrix::{MatrixPresentation, MatrixRoster, MatrixService, PresenceTracker};
use crate::infrastructure::weather::OpenWeatherClient;
use crate::interface::commands::COMMANDS;
use crate::strings::logs;

#[derive(Parser, Debug)]
#[command(version, about = "A Matrix community bot with a weather- and activity-driven mood")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let log_dir = std::path::Path::new(&config.logging.dir);
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Clear previous session log
    let log_path = log_dir.join(&config.logging.file);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, &config.logging.file);
    let (non_blocking, log_guard) = tracing_appender::non_blocking(file_appender);

    let default_filter = config.logging.filter.clone().unwrap_or_else(|| {
        "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn".to_string()
    });
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("{}", logs::STARTING);
    tracing::info!("{}", logs::config_loaded(&config.services.matrix.username));

    // 3. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(
            &config.services.matrix.username,
            &config.services.matrix.password,
        )
        .send()
        .await?;

    tracing::info!("{}", logs::LOGIN_SUCCESS);

    let presence = PresenceTracker::default();
    let presence_handle = presence.clone();
    client.add_event_handler(move |ev: PresenceEvent| {
        let presence = presence_handle.clone();
        async move {
            presence.update(ev.sender, ev.content.presence);
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("{}", logs::invite_received(room.room_id().as_str()));
            if let Err(e) = room.join().await {
                tracing::error!("{}", logs::join_invite_fail(&e.to_string()));
            }
        }
    });

    // Populate rooms, members and presence before the first mood is derived
    let initial = client
        .sync_once(SyncSettings::default())
        .await
        .context("Initial sync failed")?;

    // 4. Mood Engine
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let roster: Arc<dyn RosterProvider> = Arc::new(MatrixRoster::new(
        client.clone(),
        &config.mood.community_room,
        &config.mood.voice_rooms,
        presence,
    )?);
    let engine = Arc::new(
        MoodEngine::new(
            Arc::new(OpenWeatherClient::new(&config.services.weather)),
            roster.clone(),
            Arc::new(MatrixPresentation::new(client.clone(), &config.mood.avatars)),
            Arc::new(JsonlMoodHistory::new(&config.mood.history_file)),
        )
        .with_clock(clock.clone()),
    );
    let scheduler =
        MoodScheduler::start(engine.clone(), Schedule::from(&config.mood.schedule)).await;

    // 5. Command Routing
    let catalog = CommandCatalog::new(COMMANDS);
    let resolver = CommandResolver::new(catalog.signatures());
    let (shutdown_tx, mut shutdown_rx) = watch::channel(None);
    let start_time = clock.now();
    let router = Arc::new(CommandRouter::new(
        config.clone(),
        Arc::new(catalog),
        Arc::new(resolver),
        engine.clone(),
        roster,
        clock,
        start_time,
        shutdown_tx,
    ));

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = router.clone();
        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };
            // Ignore events older than start_time
            let sent_at = DateTime::<Utc>::from_timestamp_millis(i64::from(ev.origin_server_ts().get()))
                .unwrap_or_else(Utc::now);
            if sent_at < start_time {
                return;
            }
            if original_msg.sender == room.own_user_id() {
                return;
            }
            let MessageType::Text(text_content) = &original_msg.content.msgtype else {
                return;
            };

            let body = &text_content.body;
            tracing::debug!("{}", logs::received_message(original_msg.sender.as_str(), body));

            let chat = MatrixService::new(room);
            if let Err(e) = router
                .route(&chat, body, original_msg.sender.as_str(), sent_at)
                .await
            {
                tracing::error!("{}", logs::route_failed(&e.to_string()));
            }
        }
    });

    // 6. Sync Loop
    tracing::info!("{}", logs::SYNC_LOOP_START);
    let sync_client = client.clone();
    let settings = SyncSettings::default().token(initial.next_batch);
    let mut sync_handle = tokio::spawn(async move { sync_client.sync(settings).await });

    let mut exit = None;
    tokio::select! {
        res = &mut sync_handle => {
            match res {
                Ok(Err(e)) => tracing::error!("{}", logs::sync_loop_fail(&e.to_string())),
                Err(e) => tracing::error!("{}", logs::sync_loop_fail(&e.to_string())),
                Ok(Ok(())) => {}
            }
        }
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                tracing::error!("{}", logs::shutdown_fail(&e.to_string()));
            }
        }
        res = shutdown_rx.wait_for(|request| request.is_some()) => {
            exit = res.ok().and_then(|request| *request);
        }
    }

    tracing::info!("{}", logs::SHUTDOWN);
    scheduler.shutdown();
    sync_handle.abort();

    let code = exit.map_or(0, ExitRequest::exit_code);
    if code != 0 {
        tracing::info!("{}", logs::exit_code(code));
        drop(log_guard);
        std::process::exit(code);
    }
    Ok(())
}
