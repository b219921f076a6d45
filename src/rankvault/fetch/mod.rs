//! # Rank Refresh Pipeline
//!
//! One refresh ("batch") visits every account of every server, in stored
//! order, and looks up its profile page on the ranking site.
//!
//! ```text
//!   coordinating thread (owns the store)          worker thread
//!   ─────────────────────────────────────         ──────────────────────────
//!   plan() ──targets──────────────────────────▶   for each target:
//!                                                    Begin
//!                                                    GET profile page
//!                                                    Failed | Tier(solo), Tier(flex)
//!   apply_event() ◀──────── FetchEvent ─────────     Done
//!     one field write + persist per event         Complete
//! ```
//!
//! The worker never sees the store. Every store write happens on the
//! coordinating thread, one event at a time, so a shell mutating the same
//! store between events cannot lose updates. Each event is a complete field
//! assignment followed by a full persist, so a crash mid-batch keeps
//! everything written so far.
//!
//! Requests go out strictly one at a time, without retries, delay, or
//! cancellation. A failed account is marked "Unranked" and the batch moves on.

use crate::model::{Queue, RankEntry, Root};

pub mod apply;
pub mod extract;
pub mod http;
pub mod worker;

pub use apply::{apply_event, RefreshReport};
pub use extract::{TierExtractor, WidgetExtractor};
pub use http::{HttpClient, ReqwestClient};
pub use worker::{spawn, RefreshHandle};

pub const DEFAULT_PROFILE_URL: &str = "https://www.op.gg/summoners/{server}/{name}";

/// One account to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub server: String,
    pub id: String,
    /// Display name at planning time; also the name looked up on the site.
    pub name: String,
    /// Position in the server's list at planning time.
    pub index: usize,
    pub url: String,
}

#[derive(Debug, Clone)]
pub enum FetchEvent {
    /// About to query `target`.
    Begin(FetchTarget),
    /// Transport error or non-success status.
    Failed { target: FetchTarget, reason: String },
    /// One queue's rank was found on the page.
    Tier {
        target: FetchTarget,
        queue: Queue,
        entry: RankEntry,
    },
    /// `target` finished, successfully or not.
    Done {
        target: FetchTarget,
        completed: usize,
        total: usize,
        ok: bool,
    },
    /// The worker has nothing left to do.
    Complete,
}

/// Fills `template`'s `{server}` and `{name}` placeholders.
///
/// The server code is lower-cased and every `#` in the name becomes `-`,
/// since the site cannot take a `#` inside a path segment.
pub fn profile_url(template: &str, server: &str, name: &str) -> String {
    template
        .replace("{server}", &server.to_lowercase())
        .replace("{name}", &name.replace('#', "-"))
}

/// Every account in `servers` order, then stored order within a server.
pub fn plan(root: &Root, template: &str) -> Vec<FetchTarget> {
    root.servers()
        .iter()
        .flat_map(|server| {
            root.accounts(server)
                .unwrap_or_default()
                .iter()
                .enumerate()
                .map(move |(index, account)| FetchTarget {
                    server: server.clone(),
                    id: account.id.clone(),
                    name: account.name.clone(),
                    index,
                    url: profile_url(template, server, &account.name),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::AccountStore;

    #[test]
    fn url_lowercases_server_and_dashes_hashes() {
        assert_eq!(
            profile_url(DEFAULT_PROFILE_URL, "EUW", "Some One#EUW"),
            "https://www.op.gg/summoners/euw/Some One-EUW"
        );
        assert_eq!(
            profile_url(DEFAULT_PROFILE_URL, "KR", "a#b#c"),
            "https://www.op.gg/summoners/kr/a-b-c"
        );
    }

    #[test]
    fn plan_follows_server_then_account_order() {
        let fx = StoreFixture::new()
            .with_server("KR")
            .with_account("EUW", "e1", "1")
            .with_account("KR", "k1", "2")
            .with_account("EUW", "e2", "3");

        let targets = plan(fx.store.root(), DEFAULT_PROFILE_URL);
        let order: Vec<_> = targets.iter().map(|t| (t.server.as_str(), t.name.as_str())).collect();
        assert_eq!(order, [("KR", "k1"), ("EUW", "e1"), ("EUW", "e2")]);
        assert_eq!(targets[2].index, 1);
    }

    #[test]
    fn plan_of_empty_store_is_empty() {
        let fx = StoreFixture::new().with_server("EUW");
        assert!(plan(fx.store.root(), DEFAULT_PROFILE_URL).is_empty());
    }
}
