//! # Command Catalog
//!
//! The static table of registered commands and their fully qualified signatures
//! (group path followed by the command name, space separated).
//! Built once at startup from `interface::commands::COMMANDS`.

use crate::interface::commands::CommandKind;

/// A registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Group labels, outer to inner.
    pub groups: &'static [&'static str],
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub kind: CommandKind,
}

impl CommandSpec {
    pub fn signature(&self) -> String {
        let mut parts: Vec<&str> = self.groups.to_vec();
        parts.push(self.name);
        parts.join(" ")
    }
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    signature: String,
    spec: CommandSpec,
}

#[derive(Debug, Clone, Default)]
pub struct CommandCatalog {
    entries: Vec<CatalogEntry>,
}

impl CommandCatalog {
    pub fn new(specs: &[CommandSpec]) -> Self {
        Self {
            entries: specs
                .iter()
                .map(|spec| CatalogEntry {
                    signature: spec.signature(),
                    spec: *spec,
                })
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Signatures in registration order.
    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.signature.as_str())
    }

    pub fn specs(&self) -> impl Iterator<Item = &CommandSpec> {
        self.entries.iter().map(|e| &e.spec)
    }

    /// Finds the longest signature whose words equal the leading words of `invocation`.
    /// Returns the command and the remaining argument text.
    pub fn lookup<'a>(&self, invocation: &'a str) -> Option<(&CommandSpec, &'a str)> {
        let words: Vec<&str> = invocation.split_whitespace().collect();
        let mut best: Option<(&CommandSpec, usize)> = None;

        for entry in &self.entries {
            let sig_words: Vec<&str> = entry.signature.split(' ').collect();
            if sig_words.len() > words.len() || sig_words[..] != words[..sig_words.len()] {
                continue;
            }
            if best.is_none_or(|(_, len)| sig_words.len() > len) {
                best = Some((&entry.spec, sig_words.len()));
            }
        }

        best.map(|(spec, consumed)| (spec, remainder_after_words(invocation, consumed)))
    }
}

/// Text following the first `count` whitespace-separated words.
fn remainder_after_words(text: &str, count: usize) -> &str {
    let mut rest = text.trim_start();
    for _ in 0..count {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest.trim_end()
}
