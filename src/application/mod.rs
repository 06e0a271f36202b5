//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot.
//! This includes command resolution and routing, and the mood engine with its timers.

pub mod catalog;
pub mod mood;
pub mod resolver;
pub mod router;

#[cfg(test)]
pub mod testing;
