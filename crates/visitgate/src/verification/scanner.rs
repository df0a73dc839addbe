//! Stand-in for a camera decoder at the checkpoint.
//!
//! A scan is an explicit cancellable task: the delay races a cancel signal
//! inside `select!`, so a stopped scan never reaches the verification engine
//! and never appends an audit record. A real decoder replaces the
//! [`CodeFeed`] seam without touching the engine contract.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::visits::{ApplicationStatus, ApplicationStore, StatusFilter};

use super::engine::{VerificationEngine, VerificationOutcome};

/// Source of candidate codes for a simulated scan.
pub trait CodeFeed: Send + Sync {
    fn next_code(&self, today: NaiveDate) -> Option<String>;
}

/// Demo feed: draws a random code from currently-approved applications, the
/// way a cooperative visitor would present a valid badge. Returns `None` when
/// nothing is approved.
pub struct ApprovedBiasFeed<S> {
    store: Arc<S>,
}

impl<S> ApprovedBiasFeed<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: ApplicationStore> CodeFeed for ApprovedBiasFeed<S> {
    fn next_code(&self, today: NaiveDate) -> Option<String> {
        let approved = self
            .store
            .list(
                StatusFilter::Only(ApplicationStatus::Approved),
                None,
                today,
            )
            .ok()?;
        approved
            .choose(&mut rand::thread_rng())
            .map(|app| app.id.0.clone())
    }
}

/// What a scan resolved to.
#[derive(Debug)]
pub enum ScanEvent {
    Verified(VerificationOutcome),
    NoCodeDetected,
    Cancelled,
}

/// Control handle for an in-flight scan. Dropping the handle cancels the
/// scan the same way [`ScanHandle::stop`] does.
pub struct ScanHandle {
    cancel: oneshot::Sender<()>,
    task: JoinHandle<ScanEvent>,
}

impl ScanHandle {
    /// Cancel the scan. If the delay already elapsed the completed event is
    /// returned; cancellation is best-effort but once acknowledged no further
    /// verification or logging happens.
    pub async fn stop(self) -> ScanEvent {
        let _ = self.cancel.send(());
        self.task.await.unwrap_or(ScanEvent::Cancelled)
    }

    /// Wait for the scan to resolve on its own.
    pub async fn outcome(self) -> ScanEvent {
        self.task.await.unwrap_or(ScanEvent::Cancelled)
    }
}

pub struct ScanSimulator<S, F> {
    engine: Arc<VerificationEngine<S>>,
    feed: Arc<F>,
    delay: Duration,
}

impl<S, F> ScanSimulator<S, F>
where
    S: ApplicationStore + 'static,
    F: CodeFeed + 'static,
{
    pub fn new(engine: Arc<VerificationEngine<S>>, feed: Arc<F>, delay: Duration) -> Self {
        Self {
            engine,
            feed,
            delay,
        }
    }

    /// Begin a scan that resolves after the configured delay.
    pub fn start_scan(&self, today: NaiveDate) -> ScanHandle {
        let (cancel, cancelled) = oneshot::channel();
        let engine = Arc::clone(&self.engine);
        let feed = Arc::clone(&self.feed);
        let delay = self.delay;

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = cancelled => {
                    debug!("scan cancelled before decode");
                    ScanEvent::Cancelled
                }
                _ = tokio::time::sleep(delay) => {
                    match feed.next_code(today) {
                        Some(code) => match engine.verify(&code, today) {
                            Ok(outcome) => ScanEvent::Verified(outcome),
                            Err(err) => {
                                debug!(%err, "feed produced an unverifiable code");
                                ScanEvent::NoCodeDetected
                            }
                        },
                        None => ScanEvent::NoCodeDetected,
                    }
                }
            }
        });

        ScanHandle { cancel, task }
    }
}
