//! Leaderboard metric selection and ranked entries.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;
use crate::models::MemberStats;

/// Avatar shown for members the bot has no avatar for.
pub const DEFAULT_AVATAR: &str = "https://cdn.discordapp.com/embed/avatars/0.png";
/// Display name for members the bot has no username for.
pub const DEFAULT_USERNAME: &str = "Unknown";

/// Metric a leaderboard is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Cumulative voice-channel time (`vcTime`)
    Voice,
    /// Messages sent today (`dailyMessageCount`)
    Messages,
}

impl Metric {
    /// Read this metric from a member's stats; missing fields are already 0.
    pub fn value_of(&self, stats: &MemberStats) -> i64 {
        match self {
            Metric::Voice => stats.vc_time,
            Metric::Messages => stats.daily_message_count,
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vc" => Ok(Metric::Voice),
            "msg" => Ok(Metric::Messages),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown leaderboard type '{}': expected 'vc' or 'msg'",
                other
            ))),
        }
    }
}

/// One ranked member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardEntry {
    pub id: String,
    pub username: String,
    pub avatar: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub value: i64,
}

impl LeaderboardEntry {
    pub fn from_stats(stats: &MemberStats, metric: Metric) -> Self {
        Self {
            id: stats.member_id().to_string(),
            username: stats
                .username
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            avatar: stats
                .avatar
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            value: metric.value_of(stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_parse() {
        assert_eq!("vc".parse::<Metric>().unwrap(), Metric::Voice);
        assert_eq!("msg".parse::<Metric>().unwrap(), Metric::Messages);
        assert!(matches!(
            "xp".parse::<Metric>(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_entry_defaults() {
        let stats = MemberStats {
            user_id: "u1".to_string(),
            vc_time: 90,
            daily_message_count: 7,
            ..Default::default()
        };

        let entry = LeaderboardEntry::from_stats(&stats, Metric::Messages);
        assert_eq!(entry.id, "u1");
        assert_eq!(entry.username, DEFAULT_USERNAME);
        assert_eq!(entry.avatar, DEFAULT_AVATAR);
        assert_eq!(entry.value, 7);
    }
}
