//! # Interface Layer
//!
//! User-facing entry points: the command handlers invoked by the router.

pub mod commands;
