//! In-process stats store.
//!
//! Used by tests and local demos. Guild scans return documents in insertion
//! order, which makes leaderboard tie-breaking easy to assert on.

use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::db::{member_doc_id, MemberStream, StatsStore};
use crate::error::AppError;
use crate::models::{MemberStats, VoiceHistory};

#[derive(Default)]
struct Collections {
    /// `(doc_id, stats)` in insertion order
    users: Vec<(String, MemberStats)>,
    vc_stats: HashMap<String, VoiceHistory>,
}

/// Stats store backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a member's stats. Replacing keeps the original scan position.
    pub fn put_member_stats(&self, mut stats: MemberStats) {
        let doc_id = member_doc_id(&stats.guild_id, &stats.user_id);
        stats.doc_id = Some(doc_id.clone());

        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match inner.users.iter_mut().find(|(id, _)| *id == doc_id) {
            Some(slot) => slot.1 = stats,
            None => inner.users.push((doc_id, stats)),
        }
    }

    pub fn put_history(&self, guild_id: &str, user_id: &str, history: VoiceHistory) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner
            .vc_stats
            .insert(member_doc_id(guild_id, user_id), history);
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn get_member_stats(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> Result<Option<MemberStats>, AppError> {
        let doc_id = member_doc_id(guild_id, user_id);
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner
            .users
            .iter()
            .find(|(id, _)| *id == doc_id)
            .map(|(_, stats)| stats.clone()))
    }

    async fn get_history(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> Result<Option<VoiceHistory>, AppError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner
            .vc_stats
            .get(&member_doc_id(guild_id, user_id))
            .cloned())
    }

    async fn scan_guild_members<'a>(
        &'a self,
        guild_id: &'a str,
    ) -> Result<MemberStream<'a>, AppError> {
        // Snapshot under the lock so the stream never holds it across awaits
        let members: Vec<MemberStats> = {
            let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
            inner
                .users
                .iter()
                .filter(|(_, stats)| stats.guild_id == guild_id)
                .map(|(_, stats)| stats.clone())
                .collect()
        };

        Ok(stream::iter(members.into_iter().map(Ok::<_, AppError>)).boxed())
    }
}
