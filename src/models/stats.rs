//! Per-member engagement statistics written by the bot.
//!
//! The bot owns these documents; this service only reads them. Every field
//! defaults so that partially populated documents still decode.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::lenient;

/// Statistics for one member of one guild.
///
/// Stored at: `users/{guild_id}_{user_id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    // ─── Identity ────────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::string")]
    pub guild_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub avatar: Option<String>,

    // ─── Progression ─────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::int")]
    pub xp: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub level: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub coins: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub streak: i64,

    // ─── Activity ────────────────────────────────────────────────
    /// Cumulative voice-channel time
    #[serde(default, deserialize_with = "lenient::int")]
    pub vc_time: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub daily_message_count: i64,

    // ─── Achievements ────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::string_set")]
    pub badges: BTreeSet<String>,
    /// Partial completion per badge id
    #[serde(default, deserialize_with = "lenient::float_map")]
    pub badge_progress: BTreeMap<String, f64>,

    /// Document id, filled in by the Firestore client on reads.
    #[serde(default, rename = "_firestore_id", skip_serializing)]
    pub doc_id: Option<String>,
}

impl MemberStats {
    /// The member's user id, falling back to the `{guild}_{user}` document id.
    pub fn member_id(&self) -> &str {
        if !self.user_id.is_empty() {
            return &self.user_id;
        }
        self.doc_id
            .as_deref()
            .and_then(|id| id.split_once('_').map(|(_, user)| user))
            .unwrap_or("")
    }
}

/// `user-stats` response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStatsResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub xp: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub vc_time: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub level: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub streak: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub coins: i64,
    pub badges: BTreeSet<String>,
    pub badge_progress: BTreeMap<String, f64>,
}

impl From<MemberStats> for UserStatsResponse {
    fn from(stats: MemberStats) -> Self {
        Self {
            xp: stats.xp,
            vc_time: stats.vc_time,
            level: stats.level,
            streak: stats.streak,
            coins: stats.coins,
            badges: stats.badges,
            badge_progress: stats.badge_progress,
        }
    }
}
