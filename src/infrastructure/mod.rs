//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (e.g., ChatProvider, WeatherProvider).

pub mod history;
pub mod matrix;
pub mod weather;
