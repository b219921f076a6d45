use rankvault::api::VaultApi;
use rankvault::config::VaultConfig;
use rankvault::error::{Result, VaultError};
use rankvault::fetch::{HttpClient, WidgetExtractor};
use rankvault::model::{Account, Queue, RankEntry, Ranks};
use rankvault::ranking::RankMapping;
use rankvault::session::Session;
use rankvault::store::fs::{FileStore, STORE_FILENAME};
use rankvault::store::AccountStore;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const TEMPLATE: &str = "https://ranks.test/{server}/{name}";

#[derive(Clone, Default)]
struct CannedSite {
    pages: HashMap<String, std::result::Result<String, u16>>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl CannedSite {
    fn page(mut self, server: &str, name: &str, body: String) -> Self {
        self.pages.insert(url(server, name), Ok(body));
        self
    }

    fn status(mut self, server: &str, name: &str, code: u16) -> Self {
        self.pages.insert(url(server, name), Err(code));
        self
    }
}

impl HttpClient for CannedSite {
    fn get(&self, url: &str) -> Result<String> {
        self.seen.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(code)) => Err(VaultError::Network(format!("HTTP status {}", code))),
            None => Err(VaultError::Network("HTTP status 404".to_string())),
        }
    }
}

fn url(server: &str, name: &str) -> String {
    rankvault::fetch::profile_url(TEMPLATE, server, name)
}

fn widget(classes: &str, tier: &str, lp: &str) -> String {
    format!(
        r#"<div class="{classes}"><div class="content"><div class="info">
             <div class="tier"> {tier} </div><div class="lp">{lp}</div>
           </div></div></div>"#
    )
}

fn profile(solo: Option<(&str, &str)>, flex: Option<(&str, &str)>) -> String {
    let mut body = String::from("<html><body>");
    if let Some((tier, lp)) = solo {
        body.push_str(&widget("css-1wk31w7 egd6cgn0", tier, lp));
    }
    if let Some((tier, lp)) = flex {
        body.push_str(&widget("css-1muxmfk egd6cgn0", tier, lp));
    }
    body.push_str("</body></html>");
    body
}

fn open(dir: &Path) -> VaultApi<FileStore> {
    let store = FileStore::load_or_init(dir.join(STORE_FILENAME)).unwrap();
    let config = VaultConfig {
        profile_url: TEMPLATE.to_string(),
        ..VaultConfig::default()
    };
    VaultApi::new(store, RankMapping::default(), config)
}

fn seed(dir: &Path, accounts: &[(&str, &str, &str)]) {
    let mut api = open(dir);
    let mut session = Session::new();
    for (server, name, id) in accounts {
        if api.root().find_server(server).is_none() {
            api.add_server(&mut session, server).unwrap();
        }
        api.add_account(server, Account::new(*name, *id, "secret"))
            .unwrap();
    }
}

fn ranks_on_disk(dir: &Path, server: &str, id: &str) -> Option<Ranks> {
    let store = FileStore::load_or_init(dir.join(STORE_FILENAME)).unwrap();
    store
        .root()
        .accounts(server)
        .unwrap()
        .iter()
        .find(|a| a.id == id)
        .unwrap()
        .ranks
        .clone()
}

#[test]
fn server_error_marks_account_unranked() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), &[("EUW", "Broken", "b")]);

    let mut api = open(temp.path());
    let site = CannedSite::default().status("EUW", "Broken", 500);
    let handle = api.start_refresh_with(site, WidgetExtractor::default());
    let report = api.finish_refresh(handle);

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.succeeded, 0);
    assert_eq!(ranks_on_disk(temp.path(), "EUW", "b"), Some(Ranks::unranked()));
}

#[test]
fn missing_flex_widget_keeps_no_data() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), &[("EUW", "Solo Only#EUW", "s")]);

    let mut api = open(temp.path());
    let site = CannedSite::default().page(
        "EUW",
        "Solo Only#EUW",
        profile(Some(("Gold 2", "34 LP")), None),
    );
    let handle = api.start_refresh_with(site, WidgetExtractor::default());
    let report = api.finish_refresh(handle);
    assert!(report.is_clean());

    let ranks = ranks_on_disk(temp.path(), "EUW", "s").unwrap();
    assert_eq!(ranks.solo, RankEntry::tier("Gold 2", "34 LP"));
    assert_eq!(ranks.flex, RankEntry::no_data());
}

#[test]
fn missing_widget_keeps_previous_value() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), &[("KR", "Both", "k")]);

    let mut api = open(temp.path());
    let first = CannedSite::default().page(
        "KR",
        "Both",
        profile(Some(("Diamond 4", "10 LP")), Some(("Master", "120 LP"))),
    );
    let handle = api.start_refresh_with(first, WidgetExtractor::default());
    api.finish_refresh(handle);

    let second = CannedSite::default().page(
        "KR",
        "Both",
        profile(Some(("Diamond 3", "0 LP")), None),
    );
    let handle = api.start_refresh_with(second, WidgetExtractor::default());
    api.finish_refresh(handle);

    let ranks = ranks_on_disk(temp.path(), "KR", "k").unwrap();
    assert_eq!(ranks.solo, RankEntry::tier("Diamond 3", "0 LP"));
    assert_eq!(ranks.flex, RankEntry::tier("Master", "120 LP"));
}

#[test]
fn requests_follow_server_then_account_order() {
    let temp = TempDir::new().unwrap();
    seed(
        temp.path(),
        &[
            ("KR", "k-one", "1"),
            ("EUW", "e-one", "2"),
            ("KR", "k-two", "3"),
        ],
    );

    let mut api = open(temp.path());
    let site = CannedSite::default();
    let seen = Arc::clone(&site.seen);
    let handle = api.start_refresh_with(site, WidgetExtractor::default());
    let report = api.finish_refresh(handle);

    assert_eq!(report.total, 3);
    assert_eq!(report.failed.len(), 3);
    assert_eq!(
        *seen.lock().unwrap(),
        [url("KR", "k-one"), url("KR", "k-two"), url("EUW", "e-one")]
    );
}

#[test]
fn one_failure_does_not_stop_the_batch() {
    let temp = TempDir::new().unwrap();
    seed(
        temp.path(),
        &[("EUW", "down", "d"), ("EUW", "up", "u")],
    );

    let mut api = open(temp.path());
    let site = CannedSite::default()
        .status("EUW", "down", 503)
        .page("EUW", "up", profile(None, Some(("Silver 1", "75 LP"))));
    let handle = api.start_refresh_with(site, WidgetExtractor::default());
    let report = api.finish_refresh(handle);

    assert_eq!(report.succeeded, 1);
    let up = ranks_on_disk(temp.path(), "EUW", "u").unwrap();
    assert_eq!(up.get(Queue::Flex), &RankEntry::tier("Silver 1", "75 LP"));
    assert_eq!(up.get(Queue::Solo), &RankEntry::no_data());
}
