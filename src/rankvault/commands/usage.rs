use crate::commands::helpers::update_account;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{CopyField, Usage};
use crate::store::AccountStore;

/// Counts one copy of `field`. A missing usage block starts from zeros.
pub fn increment<S: AccountStore>(
    store: &mut S,
    server: &str,
    id: &str,
    field: CopyField,
) -> Result<CmdResult> {
    let updated = update_account(store, server, id, |account| {
        account.usage.get_or_insert_with(Usage::default).record(field);
    })?;

    let what = match field {
        CopyField::Id => "id",
        CopyField::Password => "password",
    };
    let server = store
        .root()
        .find_server(server)
        .unwrap_or(server)
        .to_string();
    Ok(CmdResult::for_server(server)
        .changed()
        .with_message(CmdMessage::info(format!(
            "Copied {} of {}",
            what, updated.name
        )))
        .with_affected_accounts(vec![updated]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn counts_add_up() {
        let mut fx = StoreFixture::new().with_account("EUW", "A", "a");
        for _ in 0..3 {
            increment(&mut fx.store, "EUW", "a", CopyField::Id).unwrap();
        }
        for _ in 0..2 {
            increment(&mut fx.store, "EUW", "a", CopyField::Password).unwrap();
        }

        let usage = fx.store.root().accounts("EUW").unwrap()[0].usage.unwrap();
        assert_eq!(
            usage,
            Usage {
                id_copies: 3,
                password_copies: 2,
                total_copies: 5
            }
        );
        assert_eq!(fx.store.persist_count(), 5);
    }

    #[test]
    fn missing_usage_block_is_initialized() {
        let mut fx = StoreFixture::new().with_account("EUW", "A", "a");
        fx.store.root_mut().accounts_mut("EUW").unwrap()[0].usage = None;

        increment(&mut fx.store, "EUW", "a", CopyField::Password).unwrap();
        let usage = fx.store.root().accounts("EUW").unwrap()[0].usage.unwrap();
        assert_eq!(usage.password_copies, 1);
        assert_eq!(usage.id_copies, 0);
        assert_eq!(usage.total_copies, 1);
    }

    #[test]
    fn unknown_account_fails_without_persist() {
        let mut fx = StoreFixture::new().with_server("EUW");
        let err = increment(&mut fx.store, "EUW", "ghost", CopyField::Id).unwrap_err();
        assert!(matches!(err, VaultError::AccountNotFound { .. }));
        assert_eq!(fx.store.persist_count(), 0);
    }
}
