//! # Help Command
//!
//! Handles the `help` command.
//! Lists every registered command with its usage.

use crate::application::catalog::CommandCatalog;
use crate::domain::traits::ChatProvider;
use anyhow::Result;

pub async fn handle_help(prefix: char, catalog: &CommandCatalog, chat: &impl ChatProvider) -> Result<()> {
    let specs: Vec<_> = catalog.specs().copied().collect();
    let text = crate::strings::help::command_list(prefix, &specs);
    chat.send_message(&text).await.map(|_| ()).map_err(|e| anyhow::anyhow!(e))
}
