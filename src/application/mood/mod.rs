//! # Mood
//!
//! Derives the bot's displayed mood from a daily random baseline, the weather,
//! the community's presence and voice activity, and recent message volume.
//! The engine owns the signal state; the scheduler drives it with explicit timers.

pub mod activity;
pub mod engine;
pub mod scheduler;
pub mod weather;

pub use engine::MoodEngine;
pub use scheduler::{MoodScheduler, SchedulerHandle};
