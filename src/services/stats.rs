// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-side stats queries: member stats, history and leaderboards.

use futures_util::TryStreamExt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::db::StatsStore;
use crate::error::AppError;
use crate::models::{HistoryResponse, LeaderboardEntry, Metric, UserStatsResponse};
use crate::services::leaderboard::LeaderboardRanker;

/// Stats queries over an injected store.
#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn StatsStore>,
    timeout: Duration,
}

impl StatsService {
    pub fn new(store: Arc<dyn StatsStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Stats for one member. A missing document is `NotFound`.
    pub async fn user_stats(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> Result<UserStatsResponse, AppError> {
        require_ids(guild_id, user_id)?;

        let stats = self
            .bounded(self.store.get_member_stats(guild_id, user_id))
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(stats.into())
    }

    /// History for one member. A missing document yields empty series.
    pub async fn user_history(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> Result<HistoryResponse, AppError> {
        require_ids(guild_id, user_id)?;

        let history = self
            .bounded(self.store.get_history(guild_id, user_id))
            .await?
            .unwrap_or_default();

        Ok(history.into())
    }

    /// Top `limit` members of a guild by `metric`.
    ///
    /// The whole scan shares a single timeout.
    pub async fn leaderboard(
        &self,
        guild_id: &str,
        metric: Metric,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        if guild_id.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "Missing guildId or type".to_string(),
            ));
        }

        let ranker = self
            .bounded(async {
                let mut members = self.store.scan_guild_members(guild_id).await?;
                let mut ranker = LeaderboardRanker::new(metric, limit);
                while let Some(stats) = members.try_next().await? {
                    ranker.push(&stats);
                }
                Ok(ranker)
            })
            .await?;

        tracing::debug!(
            guild_id,
            ?metric,
            scanned = ranker.scanned(),
            limit,
            "Leaderboard ranked"
        );

        Ok(ranker.finish())
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| {
                AppError::Database(format!("Stats store timed out after {:?}", self.timeout))
            })?
    }
}

fn require_ids(guild_id: &str, user_id: &str) -> Result<(), AppError> {
    if guild_id.trim().is_empty() || user_id.trim().is_empty() {
        return Err(AppError::InvalidArgument(
            "Missing guildId or userId".to_string(),
        ));
    }
    Ok(())
}
