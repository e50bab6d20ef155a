// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stats API routes for the dashboard.
//!
//! A single endpoint dispatches on `action`, matching the URL shape the
//! dashboard already uses.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::models::Metric;
use crate::AppState;

/// Leaderboard size when `limit` is not given.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;
const MAX_LEADERBOARD_SIZE: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/stats", get(get_stats))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    action: Option<String>,
    guild_id: Option<String>,
    user_id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    /// Leaderboard size (kept as text so a bad value is a 400 with a message)
    limit: Option<String>,
}

/// Usage help returned for unknown or missing actions.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UsageResponse {
    pub message: String,
    pub usage: Vec<String>,
}

fn usage() -> UsageResponse {
    UsageResponse {
        message: "Guild Stats API".to_string(),
        usage: vec![
            "/api/stats?action=user-stats&guildId=GUILD&userId=USER".to_string(),
            "/api/stats?action=leaderboard&guildId=GUILD&type=vc".to_string(),
            "/api/stats?action=leaderboard&guildId=GUILD&type=msg&limit=25".to_string(),
            "/api/stats?action=user-history&guildId=GUILD&userId=USER".to_string(),
        ],
    }
}

/// Treat empty query values the same as absent ones.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_limit(raw: Option<&str>) -> Result<usize> {
    match raw {
        None => Ok(DEFAULT_LEADERBOARD_SIZE),
        Some(raw) => raw
            .parse::<usize>()
            .map(|n| n.min(MAX_LEADERBOARD_SIZE))
            .map_err(|_| {
                AppError::InvalidArgument(
                    "Invalid 'limit' parameter: must be a non-negative integer".to_string(),
                )
            }),
    }
}

/// Dispatch a stats request on `action`.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsQuery>,
) -> Result<Response> {
    let action = present(&params.action).unwrap_or("");
    let guild_id = present(&params.guild_id);
    let user_id = present(&params.user_id);

    tracing::debug!(action, guild_id = ?guild_id, user_id = ?user_id, "Stats request");

    match action {
        "user-stats" => {
            let (Some(guild_id), Some(user_id)) = (guild_id, user_id) else {
                return Err(missing_member());
            };
            let stats = state.stats.user_stats(guild_id, user_id).await?;
            Ok(Json(stats).into_response())
        }
        "leaderboard" => {
            let (Some(guild_id), Some(kind)) = (guild_id, present(&params.kind)) else {
                return Err(AppError::InvalidArgument(
                    "Missing guildId or type".to_string(),
                ));
            };
            let metric: Metric = kind.parse()?;
            let limit = parse_limit(present(&params.limit))?;

            let board = state.stats.leaderboard(guild_id, metric, limit).await?;
            Ok(Json(board).into_response())
        }
        "user-history" => {
            let (Some(guild_id), Some(user_id)) = (guild_id, user_id) else {
                return Err(missing_member());
            };
            let history = state.stats.user_history(guild_id, user_id).await?;
            Ok(Json(history).into_response())
        }
        _ => Ok(Json(usage()).into_response()),
    }
}

fn missing_member() -> AppError {
    AppError::InvalidArgument("Missing guildId or userId".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), DEFAULT_LEADERBOARD_SIZE);
        assert_eq!(parse_limit(Some("0")).unwrap(), 0);
        assert_eq!(parse_limit(Some("25")).unwrap(), 25);
        assert_eq!(parse_limit(Some("5000")).unwrap(), MAX_LEADERBOARD_SIZE);
        assert!(matches!(
            parse_limit(Some("-1")),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_limit(Some("ten")),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_blank_values_are_absent() {
        assert_eq!(present(&Some("  ".to_string())), None);
        assert_eq!(present(&Some(" g1 ".to_string())), Some("g1"));
        assert_eq!(present(&None), None);
    }
}
