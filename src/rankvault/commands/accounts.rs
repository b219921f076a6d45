use crate::commands::helpers::{require_server, update_account};
use crate::commands::{CmdMessage, CmdResult, ListedAccount};
use crate::error::{Result, VaultError};
use crate::model::Account;
use crate::store::AccountStore;

/// Appends `account` to `server`.
///
/// Id uniqueness is NOT checked here; callers that need it (the API layer
/// does) must check before calling.
pub fn add<S: AccountStore>(store: &mut S, server: &str, account: Account) -> Result<CmdResult> {
    let key = require_server(store.root(), server)?;
    let message = CmdMessage::success(format!("Account added to {}: {}", key, account.name));

    store
        .root_mut()
        .accounts_mut(&key)
        .ok_or_else(|| VaultError::ServerNotFound(key.clone()))?
        .push(account.clone());
    store.persist()?;

    Ok(CmdResult::for_server(key)
        .changed()
        .with_affected_accounts(vec![account])
        .with_message(message))
}

/// Removes every account with `id`, not just the first.
pub fn remove<S: AccountStore>(store: &mut S, server: &str, id: &str) -> Result<CmdResult> {
    let key = require_server(store.root(), server)?;
    let list = store
        .root_mut()
        .accounts_mut(&key)
        .ok_or_else(|| VaultError::ServerNotFound(key.clone()))?;

    let (removed, kept): (Vec<Account>, Vec<Account>) =
        std::mem::take(list).into_iter().partition(|a| a.id == id);
    *list = kept;

    if removed.is_empty() {
        return Ok(CmdResult::for_server(key.clone()).with_message(CmdMessage::warning(format!(
            "No account with id {} on {}",
            id, key
        ))));
    }
    store.persist()?;

    let mut result = CmdResult::for_server(key.clone()).changed();
    for account in &removed {
        result.add_message(CmdMessage::success(format!(
            "Account removed from {}: {}",
            key, account.name
        )));
    }
    Ok(result.with_affected_accounts(removed))
}

pub fn rename<S: AccountStore>(
    store: &mut S,
    server: &str,
    id: &str,
    new_name: &str,
) -> Result<CmdResult> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(VaultError::Api("Account name cannot be empty".to_string()));
    }

    let mut old_name = String::new();
    let updated = update_account(store, server, id, |account| {
        old_name = std::mem::replace(&mut account.name, new_name.to_string());
    })?;

    Ok(CmdResult::for_server(require_server(store.root(), server)?)
        .changed()
        .with_message(CmdMessage::success(format!(
            "Account renamed: {} -> {}",
            old_name, updated.name
        )))
        .with_affected_accounts(vec![updated]))
}

/// Accounts of `server` in stored order, with 1-based positions.
pub fn list<S: AccountStore>(store: &S, server: &str) -> Result<CmdResult> {
    let key = require_server(store.root(), server)?;
    let listed = store
        .root()
        .accounts(&key)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, account)| ListedAccount {
            position: i + 1,
            account: account.clone(),
        })
        .collect();
    Ok(CmdResult::for_server(key).with_listed_accounts(listed))
}

pub fn get<S: AccountStore>(store: &S, server: &str, id: &str) -> Result<CmdResult> {
    let key = require_server(store.root(), server)?;
    let account = store
        .root()
        .accounts(&key)
        .and_then(|list| list.iter().find(|a| a.id == id))
        .cloned()
        .ok_or_else(|| VaultError::AccountNotFound {
            server: key.clone(),
            id: id.to_string(),
        })?;
    Ok(CmdResult::for_server(key).with_affected_accounts(vec![account]))
}
