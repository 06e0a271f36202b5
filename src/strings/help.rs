//! # Help Text
//!
//! Help messages for bot commands.
//! Displayed to the user via the `help` command.

use crate::application::catalog::CommandSpec;

pub const HEADER: &str = "**🌦️ moodring Help**\n";

/// One line per registered command, e.g. `* $sudo whois <user>: Look up a member`.
pub fn command_list(prefix: char, specs: &[CommandSpec]) -> String {
    let mut out = String::from(HEADER);
    out.push_str(&format!("Use: {prefix}command _args_\n\n"));
    for spec in specs {
        let usage = if spec.usage.is_empty() {
            spec.signature()
        } else {
            format!("{} {}", spec.signature(), spec.usage)
        };
        out.push_str(&format!("* {prefix}{usage}: {}\n", spec.summary));
    }
    out
}
