use crate::commands::helpers::{position_of, require_server};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, VaultError};
use crate::model::{Account, Queue};
use crate::ranking::RankMapping;
use crate::store::AccountStore;
use std::cmp::Reverse;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// `total_copies`, most used first.
    Usage,
    /// Solo queue rank value, best first.
    Solo,
    /// Flex queue rank value, best first.
    Flex,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "usage" | "most-played" => Ok(SortKey::Usage),
            "solo" | "soloq" => Ok(SortKey::Solo),
            "flex" => Ok(SortKey::Flex),
            other => Err(format!(
                "unknown sort key '{}' (expected usage, solo or flex)",
                other
            )),
        }
    }
}

impl SortKey {
    fn value(&self, account: &Account, mapping: &RankMapping) -> i64 {
        match self {
            SortKey::Usage => i64::try_from(account.total_copies()).unwrap_or(i64::MAX),
            SortKey::Solo => mapping.queue_value(account, Queue::Solo),
            SortKey::Flex => mapping.queue_value(account, Queue::Flex),
        }
    }
}

/// Exchanges the account `id` with the one at 1-based `target`.
///
/// Two elements trade places; everything else stays put. A target that is
/// not a number, or falls outside `[1, len]`, leaves the list untouched.
pub fn swap<S: AccountStore>(
    store: &mut S,
    server: &str,
    id: &str,
    target: &str,
) -> Result<CmdResult> {
    let key = require_server(store.root(), server)?;
    let accounts = store.root().accounts(&key).unwrap_or_default();

    let digits = target.trim();
    let parsed = if digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse::<usize>().ok()
    } else {
        None
    };
    let Some(target_pos) = parsed else {
        return Ok(CmdResult::for_server(key).with_message(CmdMessage::warning(format!(
            "Position '{}' is not a number",
            target.trim()
        ))));
    };
    if target_pos < 1 || target_pos > accounts.len() {
        let msg = format!(
            "Position {} is out of range (1-{})",
            target_pos,
            accounts.len()
        );
        return Ok(CmdResult::for_server(key).with_message(CmdMessage::warning(msg)));
    }

    let current = position_of(accounts, id).ok_or_else(|| VaultError::AccountNotFound {
        server: key.clone(),
        id: id.to_string(),
    })?;
    let target_idx = target_pos - 1;
    if current == target_idx {
        return Ok(CmdResult::for_server(key).with_message(CmdMessage::info(format!(
            "Account already at position {}",
            target_pos
        ))));
    }

    let list = store
        .root_mut()
        .accounts_mut(&key)
        .ok_or_else(|| VaultError::ServerNotFound(key.clone()))?;
    list.swap(current, target_idx);
    let moved = vec![list[target_idx].clone(), list[current].clone()];
    store.persist()?;

    let msg = format!(
        "Swapped positions {} and {}: {} <-> {}",
        current + 1,
        target_pos,
        moved[0].name,
        moved[1].name
    );
    Ok(CmdResult::for_server(key)
        .changed()
        .with_affected_accounts(moved)
        .with_message(CmdMessage::success(msg)))
}

/// Stable sort, descending by `key`. Accounts without rank data, or with a
/// tier the mapping does not know, sort as value 0.
pub fn sort<S: AccountStore>(
    store: &mut S,
    server: &str,
    key: SortKey,
    mapping: &RankMapping,
) -> Result<CmdResult> {
    let server_key = require_server(store.root(), server)?;
    let mut result = CmdResult::for_server(server_key.clone());
    if key != SortKey::Usage && mapping.is_empty() {
        result.add_message(CmdMessage::warning(
            "Rank mapping unavailable; ranked accounts compare equal",
        ));
    }

    let list = store
        .root_mut()
        .accounts_mut(&server_key)
        .ok_or_else(|| VaultError::ServerNotFound(server_key.clone()))?;
    list.sort_by_key(|account| Reverse(key.value(account, mapping)));
    store.persist()?;

    result.add_message(CmdMessage::success(format!(
        "Sorted {} by {:?}",
        server_key, key
    )));
    Ok(result.changed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    fn abcd() -> StoreFixture {
        StoreFixture::new()
            .with_account("EUW", "A", "a")
            .with_account("EUW", "B", "b")
            .with_account("EUW", "C", "c")
            .with_account("EUW", "D", "d")
    }

    #[test]
    fn swap_exchanges_exactly_two() {
        let mut fx = abcd();
        let res = swap(&mut fx.store, "EUW", "a", "3").unwrap();
        assert!(res.changed);
        assert_eq!(fx.ids("EUW"), ["c", "b", "a", "d"]);
    }

    #[test]
    fn swap_is_not_insert_and_shift() {
        let mut fx = abcd();
        swap(&mut fx.store, "EUW", "d", "1").unwrap();
        // Insert-and-shift would give d, a, b, c
        assert_eq!(fx.ids("EUW"), ["d", "b", "c", "a"]);
    }

    #[test]
    fn swap_out_of_range_is_noop() {
        for target in ["0", "5", "99"] {
            let mut fx = abcd();
            let res = swap(&mut fx.store, "EUW", "b", target).unwrap();
            assert!(!res.changed);
            assert_eq!(fx.ids("EUW"), ["a", "b", "c", "d"]);
            assert_eq!(fx.store.persist_count(), 0);
        }
    }

    #[test]
    fn swap_non_numeric_is_noop() {
        for target in ["two", "-1", "", "1.5", "+2"] {
            let mut fx = abcd();
            let res = swap(&mut fx.store, "EUW", "b", target).unwrap();
            assert!(!res.changed);
            assert_eq!(fx.ids("EUW"), ["a", "b", "c", "d"]);
        }
    }

    #[test]
    fn swap_with_itself_changes_nothing() {
        let mut fx = abcd();
        let res = swap(&mut fx.store, "EUW", "b", "2").unwrap();
        assert!(!res.changed);
        assert_eq!(fx.store.persist_count(), 0);
    }

    #[test]
    fn sort_by_usage_is_descending_and_stable() {
        let mut fx = StoreFixture::new()
            .with_usage("EUW", "low", 1)
            .with_usage("EUW", "tie1", 5)
            .with_usage("EUW", "high", 9)
            .with_usage("EUW", "tie2", 5)
            .with_account("EUW", "Fresh", "none");
        // An account without a usage block at all
        fx.store.root_mut().accounts_mut("EUW").unwrap()[4].usage = None;

        sort(&mut fx.store, "EUW", SortKey::Usage, &RankMapping::default()).unwrap();
        assert_eq!(fx.ids("EUW"), ["high", "tie1", "tie2", "low", "none"]);
        assert_eq!(fx.store.persist_count(), 1);
    }

    #[test]
    fn sort_by_rank_uses_mapping_values() {
        let mapping = RankMapping::from_json(
            r#"{"gold 2": {"value": 15, "clean_name": "G2"},
                "diamond 1": {"value": 28, "clean_name": "D1"},
                "silver 4": {"value": 8, "clean_name": "S4"}}"#,
        )
        .unwrap();
        let mut fx = StoreFixture::new()
            .with_ranked_account("EUW", "s", "Silver 4", "Diamond 1")
            .with_account("EUW", "Never", "none")
            .with_ranked_account("EUW", "d", "Diamond 1", "Silver 4")
            .with_ranked_account("EUW", "odd", "Mystery 9", "Gold 2")
            .with_ranked_account("EUW", "g", "Gold 2", "Gold 2");

        sort(&mut fx.store, "EUW", SortKey::Solo, &mapping).unwrap();
        assert_eq!(fx.ids("EUW"), ["d", "g", "s", "none", "odd"]);

        sort(&mut fx.store, "EUW", SortKey::Flex, &mapping).unwrap();
        assert_eq!(fx.ids("EUW"), ["s", "g", "odd", "d", "none"]);
    }

    #[test]
    fn sort_key_parses_aliases() {
        assert_eq!("most-played".parse::<SortKey>(), Ok(SortKey::Usage));
        assert_eq!("SoloQ".parse::<SortKey>(), Ok(SortKey::Solo));
        assert!("elo".parse::<SortKey>().is_err());
    }
}
