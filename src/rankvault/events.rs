//! Notifications from the library to whatever shell is driving it.
//!
//! Every method has an empty default, so a shell only implements what it
//! renders. All calls happen on the thread that owns the [`VaultApi`](crate::api::VaultApi).

use crate::fetch::RefreshReport;

pub trait ShellEvents {
    /// The account list of `server` was mutated and persisted.
    fn account_store_changed(&mut self, _server: &str) {}

    /// One account of a refresh batch finished.
    fn fetch_progress(&mut self, _account_name: &str, _completed: usize, _total: usize) {}

    /// The refresh batch is over.
    fn fetch_complete(&mut self, _report: &RefreshReport) {}
}

/// Ignores every event.
pub struct NullEvents;
impl ShellEvents for NullEvents {}

#[cfg(any(test, feature = "test_utils"))]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Writes one line per event into a shared log.
    #[derive(Clone, Default)]
    pub struct RecordingEvents {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingEvents {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn lines(&self) -> Vec<String> {
            self.log.lock().map(|l| l.clone()).unwrap_or_default()
        }

        fn push(&self, line: String) {
            if let Ok(mut log) = self.log.lock() {
                log.push(line);
            }
        }
    }

    impl ShellEvents for RecordingEvents {
        fn account_store_changed(&mut self, server: &str) {
            self.push(format!("changed {}", server));
        }

        fn fetch_progress(&mut self, account_name: &str, completed: usize, total: usize) {
            self.push(format!("progress {} {}/{}", account_name, completed, total));
        }

        fn fetch_complete(&mut self, report: &RefreshReport) {
            self.push(format!(
                "complete {}/{} ok",
                report.succeeded, report.total
            ));
        }
    }
}
