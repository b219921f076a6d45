use super::apply::{apply_event, RefreshReport};
use super::extract::TierExtractor;
use super::http::HttpClient;
use super::{FetchEvent, FetchTarget};
use crate::events::ShellEvents;
use crate::model::{Queue, RankEntry};
use crate::store::AccountStore;
use scraper::Html;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

/// The coordinating side of a running batch.
///
/// Events arrive in the order the worker produced them. Once `Complete` has
/// been handed out the handle yields nothing more. If the worker dies
/// without sending `Complete`, the handle synthesizes one so the batch still
/// ends.
pub struct RefreshHandle {
    events: Receiver<FetchEvent>,
    worker: Option<JoinHandle<()>>,
    total: usize,
    complete: bool,
    report: RefreshReport,
}

/// Starts the single background worker for `targets`.
pub fn spawn<C, X>(targets: Vec<FetchTarget>, client: C, extractor: X) -> RefreshHandle
where
    C: HttpClient + 'static,
    X: TierExtractor + 'static,
{
    let total = targets.len();
    let (tx, rx) = mpsc::channel();
    let worker = thread::Builder::new()
        .name("rank-refresh".to_string())
        .spawn(move || run(targets, &client, &extractor, &tx));

    let worker = match worker {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::error!("Could not start rank refresh worker: {}", e);
            None
        }
    };

    RefreshHandle {
        events: rx,
        worker,
        total,
        complete: false,
        report: RefreshReport::new(total),
    }
}

fn run<C: HttpClient, X: TierExtractor>(
    targets: Vec<FetchTarget>,
    client: &C,
    extractor: &X,
    tx: &Sender<FetchEvent>,
) {
    let total = targets.len();
    log::info!("Rank refresh started for {} accounts", total);

    for (i, target) in targets.into_iter().enumerate() {
        if tx.send(FetchEvent::Begin(target.clone())).is_err() {
            return;
        }

        log::debug!("GET {}", target.url);
        let ok = match client.get(&target.url) {
            Ok(body) => {
                let doc = Html::parse_document(&body);
                for queue in Queue::ALL {
                    match extractor.extract_tier(&doc, queue) {
                        Some((tier, lp)) => {
                            let event = FetchEvent::Tier {
                                target: target.clone(),
                                queue,
                                entry: RankEntry::tier(tier, lp),
                            };
                            if tx.send(event).is_err() {
                                return;
                            }
                        }
                        None => log::debug!("{}: no {} rank on page", target.name, queue.label()),
                    }
                }
                true
            }
            Err(e) => {
                log::warn!("Rank lookup failed for {} ({}): {}", target.name, target.server, e);
                let event = FetchEvent::Failed {
                    target: target.clone(),
                    reason: e.to_string(),
                };
                if tx.send(event).is_err() {
                    return;
                }
                false
            }
        };

        let done = FetchEvent::Done {
            target,
            completed: i + 1,
            total,
            ok,
        };
        if tx.send(done).is_err() {
            return;
        }
    }

    log::info!("Rank refresh finished");
    let _ = tx.send(FetchEvent::Complete);
}

impl RefreshHandle {
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The next event if one is ready, without blocking.
    pub fn try_next(&mut self) -> Option<FetchEvent> {
        if self.complete {
            return None;
        }
        match self.events.try_recv() {
            Ok(event) => Some(self.observe(event)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.observe(FetchEvent::Complete)),
        }
    }

    /// Waits for the next event.
    pub fn next_blocking(&mut self) -> Option<FetchEvent> {
        if self.complete {
            return None;
        }
        let event = self.events.recv().unwrap_or(FetchEvent::Complete);
        Some(self.observe(event))
    }

    pub fn report(&self) -> &RefreshReport {
        &self.report
    }

    /// Applies every event that is already waiting, then returns. Returns
    /// true once the batch is complete.
    pub fn pump<S: AccountStore>(&mut self, store: &mut S, listener: &mut dyn ShellEvents) -> bool {
        while let Some(event) = self.try_next() {
            apply_event(store, listener, &mut self.report, event);
        }
        self.complete
    }

    /// Applies events until the batch is complete.
    pub fn finish<S: AccountStore>(
        mut self,
        store: &mut S,
        listener: &mut dyn ShellEvents,
    ) -> RefreshReport {
        while let Some(event) = self.next_blocking() {
            apply_event(store, listener, &mut self.report, event);
        }
        self.report
    }

    fn observe(&mut self, event: FetchEvent) -> FetchEvent {
        if matches!(event, FetchEvent::Complete) {
            self.complete = true;
            if let Some(worker) = self.worker.take() {
                if worker.join().is_err() {
                    log::error!("Rank refresh worker panicked");
                }
            }
        }
        event
    }
}
