// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Top-N leaderboard ranking.
//!
//! Members are fed one at a time in scan order. Only the current top
//! `limit` entries are retained, so memory stays bounded no matter how many
//! documents a guild has.

use crate::models::{LeaderboardEntry, MemberStats, Metric};

/// Streaming top-N accumulator.
///
/// Entries are kept sorted by value, highest first. A new entry is placed
/// after every existing entry with an equal value, so ties keep scan order
/// (the same result as a stable sort of the full scan followed by a
/// truncation).
#[derive(Debug)]
pub struct LeaderboardRanker {
    metric: Metric,
    limit: usize,
    entries: Vec<LeaderboardEntry>,
    scanned: usize,
}

impl LeaderboardRanker {
    pub fn new(metric: Metric, limit: usize) -> Self {
        Self {
            metric,
            limit,
            entries: Vec::with_capacity(limit.min(1024)),
            scanned: 0,
        }
    }

    /// Offer one member to the leaderboard.
    pub fn push(&mut self, stats: &MemberStats) {
        self.scanned += 1;

        let value = self.metric.value_of(stats);
        let pos = self.entries.partition_point(|e| e.value >= value);
        if pos >= self.limit {
            return;
        }

        self.entries
            .insert(pos, LeaderboardEntry::from_stats(stats, self.metric));
        self.entries.truncate(self.limit);
    }

    /// Number of members offered so far.
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    pub fn finish(self) -> Vec<LeaderboardEntry> {
        self.entries
    }
}

/// Rank an in-memory list of members.
pub fn rank<'a, I>(members: I, metric: Metric, limit: usize) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = &'a MemberStats>,
{
    let mut ranker = LeaderboardRanker::new(metric, limit);
    for stats in members {
        ranker.push(stats);
    }
    ranker.finish()
}
