// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod guild;
pub mod history;
pub mod leaderboard;
pub mod lenient;
pub mod stats;

pub use guild::{AccessToken, DiscordUser, Guild};
pub use history::{HistoryResponse, VoiceHistory};
pub use leaderboard::{LeaderboardEntry, Metric};
pub use stats::{MemberStats, UserStatsResponse};
