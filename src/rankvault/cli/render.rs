//! Turns command results into terminal text.
//!
//! Every `render_*` function returns a `String` and has a `_internal` twin
//! taking an explicit color switch, which is what the tests call.

use super::styles::{names, paint};
use colored::Colorize;
use console::Term;
use rankvault::api::{CmdMessage, ListedAccount, MessageLevel, ServerSummary};
use rankvault::config::VaultConfig;
use rankvault::events::ShellEvents;
use rankvault::fetch::{FetchTarget, RefreshReport};
use rankvault::model::{Account, Queue, NO_DATA};
use rankvault::ranking::RankMapping;
use unicode_width::UnicodeWidthStr;

const GAP: &str = "  ";

fn pad(text: &str, width: usize) -> String {
    format!("{}{}", text, " ".repeat(width.saturating_sub(text.width())))
}

/// Display text of one queue and whether it is a sentinel.
fn rank_cell(account: &Account, queue: Queue, mapping: &RankMapping) -> (String, bool) {
    match account.rank(queue) {
        Some(entry) => (mapping.display(entry), entry.rank.is_sentinel()),
        None => (NO_DATA.to_string(), true),
    }
}

fn times_used(account: &Account) -> u64 {
    account.usage.map(|u| u.times_used()).unwrap_or(0)
}

pub fn render_account_list(server: &str, accounts: &[ListedAccount], mapping: &RankMapping) -> String {
    render_account_list_internal(server, accounts, mapping, console::colors_enabled())
}

fn render_account_list_internal(
    server: &str,
    accounts: &[ListedAccount],
    mapping: &RankMapping,
    use_color: bool,
) -> String {
    if accounts.is_empty() {
        return format!("No accounts on {}.\n", server);
    }

    let rows: Vec<[(String, &str); 5]> = accounts
        .iter()
        .map(|listed| {
            let account = &listed.account;
            let (solo, solo_sentinel) = rank_cell(account, Queue::Solo, mapping);
            let (flex, flex_sentinel) = rank_cell(account, Queue::Flex, mapping);
            let rank_style = |sentinel: bool| if sentinel { names::SENTINEL } else { names::TIER };
            [
                (format!("{}.", listed.position), names::POSITION),
                (account.name.clone(), names::NAME),
                (solo, rank_style(solo_sentinel)),
                (flex, rank_style(flex_sentinel)),
                (times_used(account).to_string(), names::USAGE),
            ]
        })
        .collect();

    let headers = ["", "Name", "Solo", "Flex", "Used"];
    let mut widths = headers.map(|h| h.width());
    for row in &rows {
        for (w, (text, _)) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(text.width());
        }
    }

    let mut out = format!("{}\n", paint(names::CURRENT, server, use_color));
    let header_line: Vec<String> = headers
        .iter()
        .zip(widths)
        .map(|(h, w)| paint(names::HEADER, &pad(h, w), use_color))
        .collect();
    out.push_str(header_line.join(GAP).trim_end());
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|((text, style), w)| paint(style, &pad(text, w), use_color))
            .collect();
        out.push_str(cells.join(GAP).trim_end());
        out.push('\n');
    }
    out
}

pub fn render_servers(servers: &[ServerSummary]) -> String {
    render_servers_internal(servers, console::colors_enabled())
}

fn render_servers_internal(servers: &[ServerSummary], use_color: bool) -> String {
    if servers.is_empty() {
        return "No servers. Add one with `rankvault server add <name>`.\n".to_string();
    }
    let width = servers.iter().map(|s| s.name.width()).max().unwrap_or(0);
    let mut out = String::new();
    for server in servers {
        let marker = if server.current { "*" } else { " " };
        let name = pad(&server.name, width);
        let name = if server.current {
            paint(names::CURRENT, &name, use_color)
        } else {
            name
        };
        let count = match server.accounts {
            1 => "1 account".to_string(),
            n => format!("{} accounts", n),
        };
        out.push_str(&format!(
            "{} {}{}{}\n",
            marker,
            name,
            GAP,
            paint(names::USAGE, &count, use_color)
        ));
    }
    out
}

pub fn render_account_info(account: &Account, mapping: &RankMapping) -> String {
    render_account_info_internal(account, mapping, console::colors_enabled())
}

fn render_account_info_internal(account: &Account, mapping: &RankMapping, use_color: bool) -> String {
    let usage = account.usage.unwrap_or_default();
    let mut out = format!("{}\n", paint(names::NAME, &account.name, use_color));
    out.push_str(&format!("  id:         {}\n", account.id));
    out.push_str(&format!(
        "  used:       {} times ({} id / {} password copies)\n",
        usage.times_used(),
        usage.id_copies,
        usage.password_copies
    ));
    for queue in Queue::ALL {
        let label = format!("{}:", queue.label().to_lowercase());
        let line = match account.rank(queue) {
            Some(entry) if !entry.rank.is_sentinel() => {
                let shown = mapping.display(entry);
                let raw = entry.rank.as_str();
                let mut text = if shown == raw {
                    shown
                } else {
                    format!("{} ({})", raw, shown)
                };
                if !entry.lp.is_empty() {
                    text = format!("{}, {}", text, entry.lp);
                }
                paint(names::TIER, &text, use_color)
            }
            Some(entry) => paint(names::SENTINEL, entry.rank.as_str(), use_color),
            None => paint(names::SENTINEL, NO_DATA, use_color),
        };
        out.push_str(&format!("  {:<11} {}\n", label, line));
    }
    out
}

pub fn render_targets(targets: &[FetchTarget]) -> String {
    render_targets_internal(targets, console::colors_enabled())
}

fn render_targets_internal(targets: &[FetchTarget], use_color: bool) -> String {
    if targets.is_empty() {
        return "No accounts to refresh.\n".to_string();
    }
    let name_width = targets
        .iter()
        .map(|t| t.server.width() + 1 + t.name.width())
        .max()
        .unwrap_or(0);
    targets
        .iter()
        .map(|t| {
            let who = pad(&format!("{}/{}", t.server, t.name), name_width);
            format!("{}{}{}\n", who, GAP, paint(names::URL, &t.url, use_color))
        })
        .collect()
}

pub fn render_refresh_report(report: &RefreshReport) -> String {
    let mut out = format!(
        "Refreshed {} of {} accounts.\n",
        report.succeeded, report.total
    );
    for (name, reason) in &report.failed {
        out.push_str(&format!("  {}: marked Unranked ({})\n", name, reason));
    }
    if report.missing > 0 {
        out.push_str(&format!(
            "  {} update(s) skipped for accounts removed during the refresh\n",
            report.missing
        ));
    }
    if !report.persist_errors.is_empty() {
        out.push_str("Some results could not be saved:\n");
        for err in &report.persist_errors {
            out.push_str(&format!("  {}\n", err));
        }
    }
    out
}

pub fn render_config(config: &VaultConfig) -> String {
    VaultConfig::KEYS
        .iter()
        .map(|key| format!("{} = {}\n", key, config.get(key).unwrap_or_default()))
        .collect()
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => message.content.dimmed(),
            MessageLevel::Success => message.content.green(),
            MessageLevel::Warning => message.content.yellow(),
            MessageLevel::Error => message.content.red(),
        };
        out.push_str(&format!("{}\n", line));
    }
    out
}

pub fn print_messages(messages: &[CmdMessage]) {
    print!("{}", render_messages(messages));
}

/// Live progress line on stderr while a refresh runs.
pub struct TermProgress {
    term: Term,
}

impl TermProgress {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TermProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellEvents for TermProgress {
    fn fetch_progress(&mut self, account_name: &str, completed: usize, total: usize) {
        if !self.term.is_term() {
            return;
        }
        let _ = self.term.clear_line();
        let _ = self
            .term
            .write_str(&format!("[{}/{}] {}", completed, total, account_name));
    }

    fn fetch_complete(&mut self, _report: &RefreshReport) {
        if self.term.is_term() {
            let _ = self.term.clear_line();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankvault::model::{RankEntry, Ranks, Usage};

    fn mapping() -> RankMapping {
        RankMapping::from_json(r#"{"gold 2": {"value": 15, "clean_name": "G2"}}"#).unwrap()
    }

    fn listed(position: usize, account: Account) -> ListedAccount {
        ListedAccount { position, account }
    }

    #[test]
    fn empty_account_list() {
        let out = render_account_list_internal("EUW", &[], &mapping(), false);
        assert_eq!(out, "No accounts on EUW.\n");
    }

    #[test]
    fn account_list_uses_clean_names_and_sentinels() {
        let mut ranked = Account::new("Main#EUW", "m", "pw");
        ranked.ranks = Some(Ranks {
            solo: RankEntry::tier("Gold 2", "34 LP"),
            flex: RankEntry::unranked(),
        });
        ranked.usage = Some(Usage {
            id_copies: 3,
            password_copies: 3,
            total_copies: 6,
        });
        let fresh = Account::new("Smurf", "s", "pw");

        let out = render_account_list_internal(
            "EUW",
            &[listed(1, ranked), listed(2, fresh)],
            &mapping(),
            false,
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "EUW");
        assert_eq!(lines[1], "    Name      Solo     Flex      Used");
        assert_eq!(lines[2], "1.  Main#EUW  G2       Unranked  3");
        assert_eq!(lines[3], "2.  Smurf     No data  No data   0");
    }

    #[test]
    fn color_output_has_ansi() {
        let out = render_account_list_internal(
            "EUW",
            &[listed(1, Account::new("a", "a", "pw"))],
            &mapping(),
            true,
        );
        assert!(out.contains("\x1b["));
    }

    #[test]
    fn servers_mark_current() {
        let servers = vec![
            ServerSummary {
                name: "EUW".into(),
                accounts: 1,
                current: true,
            },
            ServerSummary {
                name: "KR".into(),
                accounts: 0,
                current: false,
            },
        ];
        let out = render_servers_internal(&servers, false);
        assert_eq!(out, "* EUW  1 account\n  KR   0 accounts\n");
    }

    #[test]
    fn info_shows_times_used_and_lp() {
        let mut account = Account::new("Main", "m", "pw");
        account.usage = Some(Usage {
            id_copies: 4,
            password_copies: 3,
            total_copies: 7,
        });
        account.ranks = Some(Ranks {
            solo: RankEntry::tier("Gold 2", "34 LP"),
            flex: RankEntry::no_data(),
        });
        let out = render_account_info_internal(&account, &mapping(), false);
        assert!(out.contains("used:       3 times (4 id / 3 password copies)"));
        assert!(out.contains("solo:       Gold 2 (G2), 34 LP"));
        assert!(out.contains("flex:       No data"));
        assert!(!out.contains("pw"));
    }

    #[test]
    fn targets_are_aligned() {
        let target = |server: &str, name: &str, url: &str| FetchTarget {
            server: server.into(),
            id: name.into(),
            name: name.into(),
            index: 0,
            url: url.into(),
        };
        let out = render_targets_internal(
            &[target("EUW", "a", "u1"), target("KR", "long", "u2")],
            false,
        );
        assert_eq!(out, "EUW/a    u1\nKR/long  u2\n");
    }

    #[test]
    fn report_lists_failures_and_persist_errors() {
        let report = RefreshReport {
            total: 3,
            succeeded: 2,
            failed: vec![("b".into(), "HTTP status 500".into())],
            persist_errors: vec!["a: disk full".into()],
            missing: 0,
        };
        let out = render_refresh_report(&report);
        assert!(out.starts_with("Refreshed 2 of 3 accounts.\n"));
        assert!(out.contains("b: marked Unranked (HTTP status 500)"));
        assert!(out.contains("Some results could not be saved:\n  a: disk full\n"));
    }

    #[test]
    fn default_progress_accepts_events() {
        let mut progress = TermProgress::default();
        progress.fetch_progress("a", 1, 2);
        progress.fetch_complete(&RefreshReport::new(2));
    }

    #[test]
    fn config_lists_every_key() {
        let out = render_config(&VaultConfig::default());
        assert_eq!(out.lines().count(), VaultConfig::KEYS.len());
        assert!(out.contains("user_agent = \n"));
    }
}
