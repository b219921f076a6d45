use crate::config::VaultConfig;
use crate::model::Account;

pub mod accounts;
pub mod config;
pub mod helpers;
pub mod ordering;
pub mod servers;
pub mod usage;

pub use ordering::SortKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// An account together with its 1-based position in the server's list.
#[derive(Debug, Clone)]
pub struct ListedAccount {
    pub position: usize,
    pub account: Account,
}

#[derive(Debug, Clone)]
pub struct ServerSummary {
    pub name: String,
    pub accounts: usize,
    pub current: bool,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// True when the store was mutated (and persisted).
    pub changed: bool,
    /// The server whose account list the command touched or listed.
    pub server: Option<String>,
    pub affected_accounts: Vec<Account>,
    pub listed_accounts: Vec<ListedAccount>,
    pub servers: Vec<ServerSummary>,
    pub config: Option<VaultConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn for_server(server: impl Into<String>) -> Self {
        Self {
            server: Some(server.into()),
            ..Self::default()
        }
    }

    pub fn changed(mut self) -> Self {
        self.changed = true;
        self
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected_accounts(mut self, accounts: Vec<Account>) -> Self {
        self.affected_accounts = accounts;
        self
    }

    pub fn with_listed_accounts(mut self, accounts: Vec<ListedAccount>) -> Self {
        self.listed_accounts = accounts;
        self
    }

    pub fn with_servers(mut self, servers: Vec<ServerSummary>) -> Self {
        self.servers = servers;
        self
    }

    pub fn with_config(mut self, config: VaultConfig) -> Self {
        self.config = Some(config);
        self
    }
}
