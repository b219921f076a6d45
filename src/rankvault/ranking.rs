//! Tier ordering and display names, read from `rank_mapping.json`.
//!
//! The file maps lower-cased tier strings, exactly as scraped, to an ordering
//! value and a short display name:
//!
//! ```text
//! { "gold 2": { "value": 15, "clean_name": "G2" }, ... }
//! ```
//!
//! The mapping is read once and never written. A missing or unreadable file
//! is not fatal: lookups fall back to value 0 and the raw tier string.

use crate::model::{Account, Queue, RankEntry, RankState};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const RANK_MAPPING_FILENAME: &str = "rank_mapping.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RankInfo {
    pub value: i64,
    pub clean_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct RankMapping {
    entries: HashMap<String, RankInfo>,
}

impl RankMapping {
    /// Loads the side file. Any failure yields an empty mapping.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!(
                    "Rank mapping unavailable ({}): {}; showing raw tiers",
                    path.display(),
                    e
                );
                return Self::default();
            }
        };
        match Self::from_json(&content) {
            Ok(mapping) => {
                log::debug!("Loaded {} rank mapping entries", mapping.len());
                mapping
            }
            Err(e) => {
                log::warn!("Rank mapping {} is corrupt: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let raw: HashMap<String, RankInfo> = serde_json::from_str(content)?;
        let entries = raw
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Ok(Self { entries })
    }

    /// An empty mapping means rank enrichment is unavailable.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Case-insensitive. Unknown tiers map to `{0, tier}`.
    pub fn lookup(&self, tier: &str) -> RankInfo {
        self.entries
            .get(&tier.to_lowercase())
            .cloned()
            .unwrap_or_else(|| RankInfo {
                value: 0,
                clean_name: tier.to_string(),
            })
    }

    /// Ordering value of one queue; no rank data sorts lowest.
    pub fn queue_value(&self, account: &Account, queue: Queue) -> i64 {
        match account.rank(queue) {
            Some(entry) => self.lookup(entry.rank.as_str()).value,
            None => 0,
        }
    }

    /// Display text for a rank: sentinels verbatim, tiers by their clean name.
    pub fn display(&self, entry: &RankEntry) -> String {
        match &entry.rank {
            RankState::Tier(tier) => self.lookup(tier).clean_name,
            sentinel => sentinel.to_string(),
        }
    }
}
