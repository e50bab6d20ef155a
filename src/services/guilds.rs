// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mutual guild detection.

use std::collections::HashSet;

use crate::models::Guild;

/// Guilds from `user_guilds` whose id also appears in `bot_guilds`.
///
/// Output order and entry shape come from `user_guilds`. Runs in
/// O(n + m) using a set of bot guild ids.
pub fn intersect(user_guilds: Vec<Guild>, bot_guilds: &[Guild]) -> Vec<Guild> {
    let bot_ids: HashSet<&str> = bot_guilds.iter().map(|g| g.id.as_str()).collect();

    user_guilds
        .into_iter()
        .filter(|g| bot_ids.contains(g.id.as_str()))
        .collect()
}
