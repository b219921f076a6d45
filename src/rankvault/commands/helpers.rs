use crate::error::{Result, VaultError};
use crate::model::{Account, Root};
use crate::store::AccountStore;

/// Resolves `server` to its stored name, or fails with `ServerNotFound`.
pub fn require_server(root: &Root, server: &str) -> Result<String> {
    root.find_server(server)
        .map(str::to_string)
        .ok_or_else(|| VaultError::ServerNotFound(server.to_string()))
}

/// Index of the first account with `id`.
pub fn position_of(accounts: &[Account], id: &str) -> Option<usize> {
    accounts.iter().position(|a| a.id == id)
}

/// Runs `f` against the first account with `id` on `server`, then persists.
pub fn update_account<S, F>(store: &mut S, server: &str, id: &str, f: F) -> Result<Account>
where
    S: AccountStore,
    F: FnOnce(&mut Account),
{
    let key = require_server(store.root(), server)?;
    let account = store
        .root_mut()
        .accounts_mut(&key)
        .and_then(|list| list.iter_mut().find(|a| a.id == id))
        .ok_or_else(|| VaultError::AccountNotFound {
            server: key.clone(),
            id: id.to_string(),
        })?;
    f(account);
    let updated = account.clone();
    store.persist()?;
    Ok(updated)
}
