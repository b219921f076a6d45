//! # API Facade
//!
//! The single entry point for every rankvault operation, whatever shell is
//! driving it. `VaultApi` dispatches to `commands/*.rs`, holds the read-only
//! rank mapping and the loaded config, and tells the shell about store changes
//! through a [`ShellEvents`] listener.
//!
//! It does no printing and no argument parsing. Methods return
//! `Result<CmdResult>` and leave presentation to the caller.
//!
//! ## Generic Over AccountStore
//!
//! - Production: `VaultApi<FileStore>`
//! - Testing: `VaultApi<InMemoryStore>`
//!
//! ## Rank refresh
//!
//! A refresh runs on a background worker but every store write happens here,
//! on the thread that owns the API. A shell either drives the batch
//! incrementally ([`start_refresh`](VaultApi::start_refresh) then
//! [`pump_refresh`](VaultApi::pump_refresh) between its own operations) or
//! blocks on it ([`refresh_ranks`](VaultApi::refresh_ranks)).

use crate::commands::{self, CmdResult, SortKey};
use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use crate::events::{NullEvents, ShellEvents};
use crate::fetch::{
    self, FetchTarget, HttpClient, RefreshHandle, RefreshReport, ReqwestClient, TierExtractor,
    WidgetExtractor,
};
use crate::model::{Account, CopyField, Root};
use crate::ranking::RankMapping;
use crate::session::Session;
use crate::store::AccountStore;
use std::path::Path;

pub struct VaultApi<S: AccountStore> {
    store: S,
    mapping: RankMapping,
    config: VaultConfig,
    listener: Box<dyn ShellEvents>,
}

impl<S: AccountStore> VaultApi<S> {
    pub fn new(store: S, mapping: RankMapping, config: VaultConfig) -> Self {
        Self {
            store,
            mapping,
            config,
            listener: Box::new(NullEvents),
        }
    }

    pub fn with_listener(mut self, listener: Box<dyn ShellEvents>) -> Self {
        self.listener = listener;
        self
    }

    // --- servers ---

    pub fn add_server(&mut self, session: &mut Session, name: &str) -> Result<CmdResult> {
        let result = commands::servers::add(&mut self.store, session, name)?;
        Ok(self.notify(result))
    }

    pub fn remove_server(&mut self, session: &mut Session, name: &str) -> Result<CmdResult> {
        let result = commands::servers::remove(&mut self.store, session, name)?;
        Ok(self.notify(result))
    }

    pub fn list_servers(&self, session: &Session) -> Result<CmdResult> {
        commands::servers::list(&self.store, session)
    }

    pub fn select_server(&self, session: &mut Session, name: &str) -> Result<CmdResult> {
        commands::servers::select(&self.store, session, name)
    }

    pub fn current_server<'a>(&'a self, session: &Session) -> Option<&'a str> {
        session.current(self.store.root())
    }

    // --- accounts ---

    /// Adds an account, refusing an id that already exists on the server.
    pub fn add_account(&mut self, server: &str, account: Account) -> Result<CmdResult> {
        let key = commands::helpers::require_server(self.store.root(), server)?;
        let taken = self
            .store
            .root()
            .accounts(&key)
            .is_some_and(|list| list.iter().any(|a| a.id == account.id));
        if taken {
            return Err(VaultError::DuplicateAccount {
                server: key,
                id: account.id,
            });
        }
        let result = commands::accounts::add(&mut self.store, &key, account)?;
        Ok(self.notify(result))
    }

    pub fn remove_account(&mut self, server: &str, id: &str) -> Result<CmdResult> {
        let result = commands::accounts::remove(&mut self.store, server, id)?;
        Ok(self.notify(result))
    }

    pub fn rename_account(&mut self, server: &str, id: &str, new_name: &str) -> Result<CmdResult> {
        let result = commands::accounts::rename(&mut self.store, server, id, new_name)?;
        Ok(self.notify(result))
    }

    /// `target` is the raw 1-based position as typed by the user.
    pub fn swap_accounts(&mut self, server: &str, id: &str, target: &str) -> Result<CmdResult> {
        let result = commands::ordering::swap(&mut self.store, server, id, target)?;
        Ok(self.notify(result))
    }

    pub fn sort_accounts(&mut self, server: &str, key: SortKey) -> Result<CmdResult> {
        let result = commands::ordering::sort(&mut self.store, server, key, &self.mapping)?;
        Ok(self.notify(result))
    }

    pub fn increment_usage(&mut self, server: &str, id: &str, field: CopyField) -> Result<CmdResult> {
        let result = commands::usage::increment(&mut self.store, server, id, field)?;
        Ok(self.notify(result))
    }

    pub fn list_accounts(&self, server: &str) -> Result<CmdResult> {
        commands::accounts::list(&self.store, server)
    }

    pub fn account(&self, server: &str, id: &str) -> Result<CmdResult> {
        commands::accounts::get(&self.store, server, id)
    }

    // --- rank refresh ---

    /// What a refresh would request, in request order.
    pub fn refresh_targets(&self) -> Vec<FetchTarget> {
        fetch::plan(self.store.root(), &self.config.profile_url)
    }

    /// Starts a batch against the ranking site configured in `config.json`.
    pub fn start_refresh(&self) -> Result<RefreshHandle> {
        let client = ReqwestClient::new(self.config.user_agent.as_deref())?;
        let extractor = WidgetExtractor::new(&self.config.solo_marker, &self.config.flex_marker)?;
        Ok(self.start_refresh_with(client, extractor))
    }

    pub fn start_refresh_with<C, X>(&self, client: C, extractor: X) -> RefreshHandle
    where
        C: HttpClient + 'static,
        X: TierExtractor + 'static,
    {
        fetch::spawn(self.refresh_targets(), client, extractor)
    }

    /// Applies whatever the worker has produced so far. Returns true once the
    /// batch is complete.
    pub fn pump_refresh(&mut self, handle: &mut RefreshHandle) -> bool {
        handle.pump(&mut self.store, self.listener.as_mut())
    }

    /// Blocks until the batch is complete.
    pub fn finish_refresh(&mut self, handle: RefreshHandle) -> RefreshReport {
        handle.finish(&mut self.store, self.listener.as_mut())
    }

    pub fn refresh_ranks(&mut self) -> Result<RefreshReport> {
        let handle = self.start_refresh()?;
        Ok(self.finish_refresh(handle))
    }

    // --- config ---

    /// Reads or writes `config.json` in `dir`. Changes apply from the next run.
    pub fn run_config(&self, dir: &Path, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(dir, action)
    }

    // --- accessors ---

    pub fn mapping(&self) -> &RankMapping {
        &self.mapping
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn root(&self) -> &Root {
        self.store.root()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn notify(&mut self, result: CmdResult) -> CmdResult {
        if result.changed {
            if let Some(server) = &result.server {
                self.listener.account_store_changed(server);
            }
        }
        result
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, ListedAccount, MessageLevel, ServerSummary};
