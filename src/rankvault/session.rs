//! The shell's current-server selection.
//!
//! Held as an explicit value by whoever drives the API and validated against
//! `servers` every time it is read, so a stale selection (server removed,
//! file edited by hand) never leaks into an operation.

use crate::error::{Result, VaultError};
use crate::model::Root;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const SESSION_FILENAME: &str = "session.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    selected: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected server if it is still a member, else the first server.
    pub fn current<'a>(&self, root: &'a Root) -> Option<&'a str> {
        self.selected
            .as_deref()
            .and_then(|name| root.find_server(name))
            .or_else(|| root.servers().first().map(String::as_str))
    }

    /// No-op unless `name` is a member of `servers`.
    pub fn select(&mut self, root: &Root, name: &str) -> bool {
        match root.find_server(name) {
            Some(member) => {
                self.selected = Some(member.to_string());
                true
            }
            None => false,
        }
    }

    /// Called after a server was removed from `root`.
    pub(crate) fn forget(&mut self, root: &Root, removed: &str) {
        let was_current = self
            .selected
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(removed));
        if was_current {
            self.selected = root.servers().first().cloned();
        }
    }

    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(SESSION_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(VaultError::Io)?;
        serde_json::from_str(&content).map_err(VaultError::Serialization)
    }

    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(VaultError::Io)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(VaultError::Serialization)?;
        fs::write(dir.join(SESSION_FILENAME), content).map_err(VaultError::Io)?;
        Ok(())
    }
}
