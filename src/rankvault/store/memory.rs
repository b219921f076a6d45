use super::AccountStore;
use crate::error::{Result, VaultError};
use crate::model::Root;

/// In-memory storage for testing and development.
/// Does NOT persist data, but records how often it was asked to.
#[derive(Default)]
pub struct InMemoryStore {
    root: Root,
    persists: usize,
    fail_persist: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: Root) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    /// Makes every subsequent persist fail.
    pub fn failing(mut self) -> Self {
        self.fail_persist = true;
        self
    }

    pub fn persist_count(&self) -> usize {
        self.persists
    }
}

impl AccountStore for InMemoryStore {
    fn root(&self) -> &Root {
        &self.root
    }

    fn root_mut(&mut self) -> &mut Root {
        &mut self.root
    }

    fn persist(&mut self) -> Result<()> {
        if self.fail_persist {
            return Err(VaultError::Store("persist disabled".to_string()));
        }
        self.persists += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{canonical_server, Account, RankEntry, Ranks};

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_server(mut self, name: &str) -> Self {
            let root = self.store.root_mut();
            if root.find_server(name).is_none() {
                root.push_server(canonical_server(name));
            }
            self
        }

        /// Adds an account named `name` with id `id`; creates the server if needed.
        pub fn with_account(self, server: &str, name: &str, id: &str) -> Self {
            self.with_full_account(server, Account::new(name, id, format!("pw-{}", id)))
        }

        pub fn with_ranked_account(self, server: &str, id: &str, solo: &str, flex: &str) -> Self {
            let mut account = Account::new(id, id, "pw");
            account.ranks = Some(Ranks {
                solo: RankEntry::tier(solo, "0 LP"),
                flex: RankEntry::tier(flex, "0 LP"),
            });
            self.with_full_account(server, account)
        }

        pub fn with_usage(self, server: &str, id: &str, total_copies: u64) -> Self {
            let mut account = Account::new(id, id, "pw");
            if let Some(usage) = account.usage.as_mut() {
                usage.id_copies = total_copies;
                usage.total_copies = total_copies;
            }
            self.with_full_account(server, account)
        }

        pub fn with_full_account(mut self, server: &str, account: Account) -> Self {
            self = self.with_server(server);
            if let Some(list) = self.store.root_mut().accounts_mut(server) {
                list.push(account);
            }
            self
        }

        pub fn ids(&self, server: &str) -> Vec<String> {
            self.store
                .root()
                .accounts(server)
                .map(|accs| accs.iter().map(|a| a.id.clone()).collect())
                .unwrap_or_default()
        }
    }
}
