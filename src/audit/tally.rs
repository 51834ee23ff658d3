//! Per-user reaction counts.

use std::collections::BTreeMap;

/// Reactions that mark a thread as handled.
pub const ACKNOWLEDGEMENT_REACTIONS: [&str; 2] = ["green_check_mark", "white_check_mark"];

/// Reaction that marks a thread as being looked at.
pub const EYES_REACTION: &str = "eyes";

/// Whether a reaction name marks a thread as handled.
pub fn is_acknowledgement(reaction: &str) -> bool {
    ACKNOWLEDGEMENT_REACTIONS.contains(&reaction)
}

/// Running count of reactions, keyed by display name and then reaction name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionTally {
    counts: BTreeMap<String, BTreeMap<String, u64>>,
}

/// One user's row in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub name: String,
    pub acknowledged: u64,
    pub eyes: u64,
    pub other: u64,
}

impl UserStats {
    pub fn total(&self) -> u64 {
        self.acknowledged + self.eyes + self.other
    }
}

impl ReactionTally {
    pub fn record(&mut self, user: &str, reaction: &str) {
        *self.counts.entry(user.to_string()).or_default().entry(reaction.to_string()).or_default() += 1;
    }

    pub fn count(&self, user: &str, reaction: &str) -> u64 {
        self.counts.get(user).and_then(|reactions| reactions.get(reaction)).copied().unwrap_or_default()
    }

    /// Every reaction recorded, across all users.
    pub fn total(&self) -> u64 {
        self.counts.values().flat_map(|reactions| reactions.values()).sum()
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Users ordered by descending total, then by name.
    pub fn ranked(&self) -> Vec<UserStats> {
        let mut stats: Vec<UserStats> = self
            .counts
            .iter()
            .map(|(name, reactions)| {
                let mut row = UserStats {
                    name: name.clone(),
                    acknowledged: 0,
                    eyes: 0,
                    other: 0,
                };

                for (reaction, count) in reactions {
                    match reaction.as_str() {
                        r if is_acknowledgement(r) => row.acknowledged += count,
                        EYES_REACTION => row.eyes += count,
                        _ => row.other += count,
                    }
                }

                row
            })
            .collect();

        // `counts` iterates in name order, so a stable sort keeps names ascending on ties.
        stats.sort_by(|a, b| b.total().cmp(&a.total()));

        stats
    }
}
