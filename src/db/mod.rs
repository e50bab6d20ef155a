//! Database layer (Firestore).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::error::AppError;
use crate::models::{MemberStats, VoiceHistory};

/// Collection names as constants.
pub mod collections {
    /// Member stats (keyed by `{guild_id}_{user_id}`)
    pub const USERS: &str = "users";
    /// Daily history series (keyed by `{guild_id}_{user_id}`)
    pub const VC_STATS: &str = "vc_stats";
}

/// Document id shared by both collections.
pub fn member_doc_id(guild_id: &str, user_id: &str) -> String {
    format!("{}_{}", guild_id, user_id)
}

/// Member stats yielded one document at a time by a guild scan.
pub type MemberStream<'a> = BoxStream<'a, Result<MemberStats, AppError>>;

/// Read-only access to the bot's stats documents.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Stats document for one member, `None` if it does not exist.
    async fn get_member_stats(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> Result<Option<MemberStats>, AppError>;

    /// History document for one member, `None` if it does not exist.
    async fn get_history(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> Result<Option<VoiceHistory>, AppError>;

    /// Every stats document of a guild, in the store's scan order.
    ///
    /// The order must be deterministic for a given data set; leaderboard
    /// ties are broken by it.
    async fn scan_guild_members<'a>(&'a self, guild_id: &'a str)
        -> Result<MemberStream<'a>, AppError>;
}
