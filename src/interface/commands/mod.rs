//! # Command Handlers
//!
//! Contains the handler functions for each supported command and the table that
//! registers them. These handlers are invoked by the Router.

pub mod admin;
pub mod help;
pub mod misc;
pub mod mood;

use crate::application::catalog::CommandSpec;

/// Which handler a registered command dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Help,
    Ping,
    Mood,
    Weather,
    WhoIs,
    Refresh,
    Uptime,
    Shutdown,
    Restart,
    Update,
}

/// Every registered command, in the order used for help output and suggestion ties.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        groups: &[],
        name: "help",
        usage: "",
        summary: "Show this help",
        kind: CommandKind::Help,
    },
    CommandSpec {
        groups: &[],
        name: "ping",
        usage: "",
        summary: "Check that the bot is alive",
        kind: CommandKind::Ping,
    },
    CommandSpec {
        groups: &[],
        name: "mood",
        usage: "",
        summary: "Show the current mood and what drives it",
        kind: CommandKind::Mood,
    },
    CommandSpec {
        groups: &[],
        name: "weather",
        usage: "",
        summary: "Show the current weather score",
        kind: CommandKind::Weather,
    },
    CommandSpec {
        groups: &["sudo"],
        name: "whois",
        usage: "<user>",
        summary: "Look up a community member's presence (admin)",
        kind: CommandKind::WhoIs,
    },
    CommandSpec {
        groups: &["sudo"],
        name: "refresh",
        usage: "",
        summary: "Redraw the baseline, refetch weather and reapply the mood (admin)",
        kind: CommandKind::Refresh,
    },
    CommandSpec {
        groups: &["owner"],
        name: "uptime",
        usage: "",
        summary: "Show how long the bot has been running (owner)",
        kind: CommandKind::Uptime,
    },
    CommandSpec {
        groups: &["owner"],
        name: "shutdown",
        usage: "",
        summary: "Stop the bot (owner)",
        kind: CommandKind::Shutdown,
    },
    CommandSpec {
        groups: &["owner"],
        name: "restart",
        usage: "",
        summary: "Exit with code 1 so the supervisor restarts the bot (owner)",
        kind: CommandKind::Restart,
    },
    CommandSpec {
        groups: &["owner"],
        name: "update",
        usage: "",
        summary: "Exit with code 2 so the supervisor updates and restarts the bot (owner)",
        kind: CommandKind::Update,
    },
];
