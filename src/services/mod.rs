// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod discord;
pub mod guilds;
pub mod leaderboard;
pub mod redirect;
pub mod stats;

pub use discord::{DiscordClient, DiscordService};
pub use leaderboard::LeaderboardRanker;
pub use stats::StatsService;
