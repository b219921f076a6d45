use crate::commands::{CmdMessage, CmdResult, ServerSummary};
use crate::error::{Result, VaultError};
use crate::model::canonical_server;
use crate::session::Session;
use crate::store::AccountStore;

/// Adds a server under its upper-cased name. A case-insensitive duplicate is
/// rejected without touching the store (`changed == false`).
pub fn add<S: AccountStore>(store: &mut S, session: &mut Session, name: &str) -> Result<CmdResult> {
    let canonical = canonical_server(name);
    if canonical.is_empty() {
        return Err(VaultError::Api("Server name cannot be empty".to_string()));
    }

    if let Some(existing) = store.root().find_server(&canonical) {
        let existing = existing.to_string();
        return Ok(CmdResult::for_server(existing.clone()).with_message(CmdMessage::warning(
            format!("Server {} already exists", existing),
        )));
    }

    let had_current = session.current(store.root()).is_some();
    store.root_mut().push_server(canonical.clone());
    if !had_current {
        session.select(store.root(), &canonical);
    }
    store.persist()?;

    Ok(CmdResult::for_server(canonical.clone())
        .changed()
        .with_message(CmdMessage::success(format!("Server added: {}", canonical))))
}

/// Removes a server and discards its accounts.
pub fn remove<S: AccountStore>(
    store: &mut S,
    session: &mut Session,
    name: &str,
) -> Result<CmdResult> {
    let Some(removed) = store.root_mut().drop_server(name) else {
        return Ok(CmdResult::default().with_message(CmdMessage::warning(format!(
            "No server named {}",
            canonical_server(name)
        ))));
    };
    session.forget(store.root(), &removed);
    store.persist()?;

    Ok(CmdResult::for_server(removed.clone())
        .changed()
        .with_message(CmdMessage::success(format!("Server removed: {}", removed))))
}

pub fn list<S: AccountStore>(store: &S, session: &Session) -> Result<CmdResult> {
    let root = store.root();
    let current = session.current(root);
    let servers = root
        .servers()
        .iter()
        .map(|name| ServerSummary {
            name: name.clone(),
            accounts: root.accounts(name).map_or(0, |a| a.len()),
            current: Some(name.as_str()) == current,
        })
        .collect();
    Ok(CmdResult::default().with_servers(servers))
}

/// Changes the current server. Unknown names leave the selection alone.
pub fn select<S: AccountStore>(store: &S, session: &mut Session, name: &str) -> Result<CmdResult> {
    if session.select(store.root(), name) {
        let current = session.current(store.root()).unwrap_or_default().to_string();
        Ok(CmdResult::for_server(current.clone())
            .with_message(CmdMessage::success(format!("Now using {}", current))))
    } else {
        Ok(CmdResult::default().with_message(CmdMessage::warning(format!(
            "No server named {}",
            canonical_server(name)
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Root;
    use crate::store::memory::InMemoryStore;

    fn servers(store: &InMemoryStore) -> Vec<String> {
        store.root().servers().to_vec()
    }

    #[test]
    fn add_canonicalizes_and_rejects_duplicates() {
        let mut store = InMemoryStore::new();
        let mut session = Session::new();

        let first = add(&mut store, &mut session, "kr").unwrap();
        assert!(first.changed);
        assert_eq!(servers(&store), ["KR"]);

        let again = add(&mut store, &mut session, "kr").unwrap();
        assert!(!again.changed);
        assert_eq!(servers(&store), ["KR"]);
        assert_eq!(store.persist_count(), 1);
    }

    #[test]
    fn add_creates_empty_list_and_adopts_first_server() {
        let mut store = InMemoryStore::new();
        let mut session = Session::new();
        add(&mut store, &mut session, "euw").unwrap();
        add(&mut store, &mut session, "na").unwrap();

        assert_eq!(store.root().accounts("NA").unwrap().len(), 0);
        assert_eq!(session.current(store.root()), Some("EUW"));
    }

    #[test]
    fn add_keeps_implicit_current_server() {
        let root: Root = serde_json::from_str(r#"{"servers":["EUW"],"EUW":[]}"#).unwrap();
        let mut store = InMemoryStore::with_root(root);
        let mut session = Session::new();
        assert_eq!(session.current(store.root()), Some("EUW"));

        add(&mut store, &mut session, "kr").unwrap();
        assert_eq!(session.current(store.root()), Some("EUW"));
    }

    #[test]
    fn add_does_not_revive_orphan_list() {
        let root: Root = serde_json::from_str(
            r#"{"servers":[],"OLD":[{"name":"ghost","id":"g","password":"p"}]}"#,
        )
        .unwrap();
        let mut store = InMemoryStore::with_root(root);
        add(&mut store, &mut Session::new(), "old").unwrap();
        assert_eq!(store.root().accounts("OLD").unwrap().len(), 0);
    }

    #[test]
    fn add_rejects_blank_name() {
        let mut store = InMemoryStore::new();
        assert!(add(&mut store, &mut Session::new(), "   ").is_err());
    }

    #[test]
    fn remove_moves_current_to_first_remaining() {
        let mut store = InMemoryStore::new();
        let mut session = Session::new();
        add(&mut store, &mut session, "euw").unwrap();
        add(&mut store, &mut session, "kr").unwrap();
        select(&store, &mut session, "kr").unwrap();

        let res = remove(&mut store, &mut session, "Kr").unwrap();
        assert!(res.changed);
        assert_eq!(servers(&store), ["EUW"]);
        assert!(store.root().accounts("KR").is_none());
        assert_eq!(session.current(store.root()), Some("EUW"));

        remove(&mut store, &mut session, "euw").unwrap();
        assert_eq!(session.current(store.root()), None);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut store = InMemoryStore::new();
        let res = remove(&mut store, &mut Session::new(), "nowhere").unwrap();
        assert!(!res.changed);
        assert_eq!(store.persist_count(), 0);
    }

    #[test]
    fn mixed_add_remove_keeps_servers_unique_with_lists() {
        let mut store = InMemoryStore::new();
        let mut session = Session::new();
        for (op, name) in [
            ("add", "euw"),
            ("add", "EUW"),
            ("add", "Kr"),
            ("remove", "euw"),
            ("add", "eUw"),
            ("add", "kR"),
            ("remove", "na"),
        ] {
            match op {
                "add" => add(&mut store, &mut session, name).unwrap(),
                _ => remove(&mut store, &mut session, name).unwrap(),
            };
        }

        let names = servers(&store);
        assert_eq!(names, ["KR", "EUW"]);
        for name in &names {
            assert!(store.root().accounts(name).is_some());
        }
    }

    #[test]
    fn list_marks_current() {
        let mut store = InMemoryStore::new();
        let mut session = Session::new();
        add(&mut store, &mut session, "euw").unwrap();
        add(&mut store, &mut session, "kr").unwrap();
        select(&store, &mut session, "KR").unwrap();

        let res = list(&store, &session).unwrap();
        let current: Vec<_> = res.servers.iter().filter(|s| s.current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].name, "KR");
    }
}
