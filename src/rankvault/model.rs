//! Core data types: the persisted [`Root`] tree, [`Account`] records and
//! their optional usage and rank blocks.
//!
//! The on-disk shape is a single JSON object:
//!
//! ```text
//! {
//!   "servers": ["EUW", "KR"],
//!   "EUW": [ { "name": "...", "id": "...", "password": "...", "usage": {...}, "ranks": {...} } ],
//!   "KR": []
//! }
//! ```
//!
//! `usage` and `ranks` are optional on disk. Absence of `ranks` means the
//! account was never queried, which is different from a query that found
//! nothing (see [`RankState`]).

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const NO_DATA: &str = "No data";
pub const UNRANKED: &str = "Unranked";

const SERVERS_KEY: &str = "servers";

/// Upper-cased, trimmed server name as stored in `servers`.
pub fn canonical_server(name: &str) -> String {
    name.trim().to_uppercase()
}

/// The rank recorded for one queue.
///
/// Stored as a plain string: the two sentinels verbatim, anything else is a
/// tier name scraped from the profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RankState {
    /// Never queried.
    NoData,
    /// Queried, and either no ranked record was found or the query failed.
    Unranked,
    Tier(String),
}

impl RankState {
    pub fn as_str(&self) -> &str {
        match self {
            RankState::NoData => NO_DATA,
            RankState::Unranked => UNRANKED,
            RankState::Tier(t) => t,
        }
    }

    pub fn tier(&self) -> Option<&str> {
        match self {
            RankState::Tier(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.tier().is_none()
    }
}

impl From<String> for RankState {
    fn from(s: String) -> Self {
        match s.as_str() {
            NO_DATA => RankState::NoData,
            UNRANKED => RankState::Unranked,
            _ => RankState::Tier(s),
        }
    }
}

impl From<RankState> for String {
    fn from(state: RankState) -> Self {
        match state {
            RankState::Tier(t) => t,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for RankState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub rank: RankState,
    /// League points text, e.g. "34 LP". Empty unless `rank` is a tier.
    #[serde(default)]
    pub lp: String,
}

impl RankEntry {
    pub fn no_data() -> Self {
        Self {
            rank: RankState::NoData,
            lp: String::new(),
        }
    }

    pub fn unranked() -> Self {
        Self {
            rank: RankState::Unranked,
            lp: String::new(),
        }
    }

    pub fn tier(tier: impl Into<String>, lp: impl Into<String>) -> Self {
        Self {
            rank: RankState::Tier(tier.into()),
            lp: lp.into(),
        }
    }
}

/// One of the two ranked ladders tracked per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Queue {
    Solo,
    Flex,
}

impl Queue {
    pub const ALL: [Queue; 2] = [Queue::Solo, Queue::Flex];

    pub fn label(&self) -> &'static str {
        match self {
            Queue::Solo => "Solo",
            Queue::Flex => "Flex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranks {
    pub solo: RankEntry,
    pub flex: RankEntry,
}

impl Ranks {
    pub fn no_data() -> Self {
        Self {
            solo: RankEntry::no_data(),
            flex: RankEntry::no_data(),
        }
    }

    pub fn unranked() -> Self {
        Self {
            solo: RankEntry::unranked(),
            flex: RankEntry::unranked(),
        }
    }

    pub fn get(&self, queue: Queue) -> &RankEntry {
        match queue {
            Queue::Solo => &self.solo,
            Queue::Flex => &self.flex,
        }
    }

    pub fn set(&mut self, queue: Queue, entry: RankEntry) {
        match queue {
            Queue::Solo => self.solo = entry,
            Queue::Flex => self.flex = entry,
        }
    }
}

/// Which credential field was copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyField {
    Id,
    Password,
}

impl FromStr for CopyField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(CopyField::Id),
            "password" => Ok(CopyField::Password),
            other => Err(format!("unknown field '{}' (expected id or password)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub id_copies: u64,
    #[serde(default)]
    pub password_copies: u64,
    #[serde(default)]
    pub total_copies: u64,
}

impl Usage {
    /// Bumps the field counter together with `total_copies`.
    pub fn record(&mut self, field: CopyField) {
        match field {
            CopyField::Id => self.id_copies += 1,
            CopyField::Password => self.password_copies += 1,
        }
        self.total_copies += 1;
    }

    /// One login copies the id and the password once each.
    pub fn times_used(&self) -> u64 {
        self.total_copies / 2
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub id: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranks: Option<Ranks>,
}

impl Account {
    pub fn new(name: impl Into<String>, id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            password: password.into(),
            usage: Some(Usage::default()),
            ranks: None,
        }
    }

    pub fn total_copies(&self) -> u64 {
        self.usage.map(|u| u.total_copies).unwrap_or(0)
    }

    pub fn rank(&self, queue: Queue) -> Option<&RankEntry> {
        self.ranks.as_ref().map(|r| r.get(queue))
    }
}

/// The whole persisted tree.
///
/// Keeps `servers` and the per-server account lists in step: every member of
/// `servers` has a (possibly empty) list. Lists whose key is not a member are
/// carried through untouched so a load/persist cycle never drops data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Root {
    servers: Vec<String>,
    accounts: BTreeMap<String, Vec<Account>>,
}

impl Root {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    /// Resolves `name` case-insensitively to the stored member.
    pub fn find_server(&self, name: &str) -> Option<&str> {
        let wanted = canonical_server(name);
        self.servers
            .iter()
            .find(|s| canonical_server(s) == wanted)
            .map(String::as_str)
    }

    pub fn accounts(&self, server: &str) -> Option<&[Account]> {
        let key = self.find_server(server)?;
        self.accounts.get(key).map(Vec::as_slice)
    }

    pub fn accounts_mut(&mut self, server: &str) -> Option<&mut Vec<Account>> {
        let key = self.find_server(server)?.to_string();
        self.accounts.get_mut(&key)
    }

    /// Appends a server that is known not to exist yet, with an empty list.
    /// A leftover list stored under the same key is discarded.
    pub(crate) fn push_server(&mut self, canonical: String) {
        if let Some(stale) = self.accounts.insert(canonical.clone(), Vec::new()) {
            if !stale.is_empty() {
                log::warn!(
                    "Discarding {} stale account(s) stored under {}",
                    stale.len(),
                    canonical
                );
            }
        }
        self.servers.push(canonical);
    }

    /// Drops the member and its account list. Returns the removed name.
    pub(crate) fn drop_server(&mut self, name: &str) -> Option<String> {
        let key = self.find_server(name)?.to_string();
        self.servers.retain(|s| s != &key);
        self.accounts.remove(&key);
        Some(key)
    }

    pub fn account_count(&self) -> usize {
        self.servers
            .iter()
            .filter_map(|s| self.accounts.get(s))
            .map(Vec::len)
            .sum()
    }

    fn normalize(mut self) -> Self {
        for server in &self.servers {
            self.accounts.entry(server.clone()).or_default();
        }
        self
    }
}

impl Serialize for Root {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.accounts.len()))?;
        map.serialize_entry(SERVERS_KEY, &self.servers)?;
        for server in &self.servers {
            if let Some(list) = self.accounts.get(server) {
                map.serialize_entry(server, list)?;
            }
        }
        for (key, list) in &self.accounts {
            if !self.servers.contains(key) {
                map.serialize_entry(key, list)?;
            }
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct RawRoot {
    #[serde(default)]
    servers: Vec<String>,
    #[serde(flatten)]
    accounts: BTreeMap<String, Vec<Account>>,
}

impl<'de> Deserialize<'de> for Root {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawRoot::deserialize(deserializer)?;
        Ok(Root {
            servers: raw.servers,
            accounts: raw.accounts,
        }
        .normalize())
    }
}
