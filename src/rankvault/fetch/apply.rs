use super::{FetchEvent, FetchTarget};
use crate::commands::helpers::position_of;
use crate::events::ShellEvents;
use crate::model::{Account, Ranks};
use crate::store::AccountStore;

/// Tally of one refresh batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub total: usize,
    pub succeeded: usize,
    /// `(account name, reason)` for every account whose lookup failed.
    pub failed: Vec<(String, String)>,
    /// Persist errors hit while writing results. The in-memory tree still
    /// holds the results; the file may lag behind it.
    pub persist_errors: Vec<String>,
    /// Events dropped because their account was gone by the time they arrived.
    pub missing: usize,
}

impl RefreshReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.persist_errors.is_empty()
    }
}

/// The account an event is about. Prefers the planned index, falling back to
/// the first id match if the list was reordered since planning.
fn locate<'a>(store: &'a mut impl AccountStore, target: &FetchTarget) -> Option<&'a mut Account> {
    let list = store.root_mut().accounts_mut(&target.server)?;
    let index = match list.get(target.index) {
        Some(account) if account.id == target.id => target.index,
        _ => position_of(list, &target.id)?,
    };
    list.get_mut(index)
}

/// Applies one worker event to the store. Returns true once the batch is
/// complete.
///
/// Each store-touching event is a single field assignment followed by a full
/// persist. A persist failure is recorded in `report` and the batch goes on.
pub fn apply_event<S: AccountStore>(
    store: &mut S,
    listener: &mut dyn ShellEvents,
    report: &mut RefreshReport,
    event: FetchEvent,
) -> bool {
    match event {
        FetchEvent::Begin(target) => {
            let wrote = write(store, report, &target, |account| {
                if account.ranks.is_some() {
                    return false;
                }
                account.ranks = Some(Ranks::no_data());
                true
            });
            if wrote {
                listener.account_store_changed(&target.server);
            }
        }
        FetchEvent::Failed { target, reason } => {
            report.failed.push((target.name.clone(), reason));
            let wrote = write(store, report, &target, |account| {
                account.ranks = Some(Ranks::unranked());
                true
            });
            if wrote {
                listener.account_store_changed(&target.server);
            }
        }
        FetchEvent::Tier {
            target,
            queue,
            entry,
        } => {
            let wrote = write(store, report, &target, |account| {
                account
                    .ranks
                    .get_or_insert_with(Ranks::no_data)
                    .set(queue, entry);
                true
            });
            if wrote {
                listener.account_store_changed(&target.server);
            }
        }
        FetchEvent::Done {
            target,
            completed,
            total,
            ok,
        } => {
            if ok {
                report.succeeded += 1;
            }
            listener.fetch_progress(&target.name, completed, total);
        }
        FetchEvent::Complete => {
            listener.fetch_complete(report);
            return true;
        }
    }
    false
}

/// Runs `mutate` on the target account and persists if it changed anything.
/// Returns whether the in-memory tree changed.
fn write<S, F>(store: &mut S, report: &mut RefreshReport, target: &FetchTarget, mutate: F) -> bool
where
    S: AccountStore,
    F: FnOnce(&mut Account) -> bool,
{
    let Some(account) = locate(store, target) else {
        log::warn!(
            "Dropping rank update for {} on {}: account no longer exists",
            target.name,
            target.server
        );
        report.missing += 1;
        return false;
    };
    if !mutate(account) {
        return false;
    }
    if let Err(e) = store.persist() {
        log::error!("Failed to persist rank update for {}: {}", target.name, e);
        report
            .persist_errors
            .push(format!("{}: {}", target.name, e));
    }
    true
}
