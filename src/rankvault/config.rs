use crate::error::{Result, VaultError};
use crate::fetch::extract::{DEFAULT_FLEX_MARKER, DEFAULT_SOLO_MARKER};
use crate::fetch::DEFAULT_PROFILE_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "config.json";

/// Settings stored in `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultConfig {
    /// Profile page template with `{server}` and `{name}` placeholders
    #[serde(default = "default_profile_url")]
    pub profile_url: String,

    /// CSS selector of the solo queue rank widget
    #[serde(default = "default_solo_marker")]
    pub solo_marker: String,

    /// CSS selector of the flex queue rank widget
    #[serde(default = "default_flex_marker")]
    pub flex_marker: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Rank mapping file to use instead of `rank_mapping.json` in the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_mapping_file: Option<String>,
}

fn default_profile_url() -> String {
    DEFAULT_PROFILE_URL.to_string()
}

fn default_solo_marker() -> String {
    DEFAULT_SOLO_MARKER.to_string()
}

fn default_flex_marker() -> String {
    DEFAULT_FLEX_MARKER.to_string()
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            profile_url: default_profile_url(),
            solo_marker: default_solo_marker(),
            flex_marker: default_flex_marker(),
            user_agent: None,
            rank_mapping_file: None,
        }
    }
}

impl VaultConfig {
    pub const KEYS: [&'static str; 5] = [
        "profile_url",
        "solo_marker",
        "flex_marker",
        "user_agent",
        "rank_mapping_file",
    ];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Value of `key`; unset optional keys read as an empty string.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "profile_url" => Some(self.profile_url.clone()),
            "solo_marker" => Some(self.solo_marker.clone()),
            "flex_marker" => Some(self.flex_marker.clone()),
            "user_agent" => Some(self.user_agent.clone().unwrap_or_default()),
            "rank_mapping_file" => Some(self.rank_mapping_file.clone().unwrap_or_default()),
            _ => None,
        }
    }

    /// Sets `key`. An empty value resets an optional key to unset.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        match key {
            "profile_url" => {
                if !value.contains("{name}") {
                    return Err(VaultError::Config(
                        "profile_url must contain a {name} placeholder".to_string(),
                    ));
                }
                self.profile_url = value.to_string();
            }
            "solo_marker" => self.solo_marker = value.to_string(),
            "flex_marker" => self.flex_marker = value.to_string(),
            "user_agent" => self.user_agent = optional(value),
            "rank_mapping_file" => self.rank_mapping_file = optional(value),
            other => return Err(VaultError::Config(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = VaultConfig::load(dir.path()).unwrap();
        assert_eq!(config, VaultConfig::default());
        assert_eq!(config.profile_url, DEFAULT_PROFILE_URL);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"user_agent":"rankvault-test"}"#,
        )
        .unwrap();
        let config = VaultConfig::load(dir.path()).unwrap();
        assert_eq!(config.user_agent.as_deref(), Some("rankvault-test"));
        assert_eq!(config.solo_marker, DEFAULT_SOLO_MARKER);
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data");
        let mut config = VaultConfig::default();
        config.set("flex_marker", "section.flex").unwrap();
        config.save(&nested).unwrap();

        let loaded = VaultConfig::load(&nested).unwrap();
        assert_eq!(loaded.flex_marker, "section.flex");
    }

    #[test]
    fn set_validates_keys_and_template() {
        let mut config = VaultConfig::default();
        assert!(matches!(config.set("colour", "red"), Err(VaultError::Config(_))));
        assert!(config.set("profile_url", "https://example.com/{server}").is_err());
        config
            .set("profile_url", "https://example.com/{server}/{name}")
            .unwrap();
        assert_eq!(
            config.get("profile_url").as_deref(),
            Some("https://example.com/{server}/{name}")
        );
    }

    #[test]
    fn empty_value_unsets_optional_key() {
        let mut config = VaultConfig::default();
        config.set("user_agent", "x").unwrap();
        config.set("user_agent", "").unwrap();
        assert_eq!(config.user_agent, None);
        assert_eq!(config.get("user_agent").as_deref(), Some(""));
        assert_eq!(config.get("nope"), None);
    }
}
