// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Guild Dashboard API: backend for a Discord bot's web dashboard
//!
//! This crate completes the Discord OAuth login for the dashboard, works out
//! which guilds the user shares with the bot, and serves member engagement
//! stats (XP, voice time, leaderboards, history) from Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{DiscordService, StatsService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub discord: DiscordService,
    pub stats: StatsService,
}
