//! guildkeeper - A Discord community bot built around reaction-driven interactions.
//!
//! This crate provides:
//! - A platform-neutral interaction engine (battle votes, paginators, confirmations)
//! - Team management with battles and match history
//! - New-account protection (NABG) and looking-for-group posts

pub mod bot;
pub mod config;
pub mod error;
pub mod interaction;
pub mod logging;
pub mod service;
pub mod task;
