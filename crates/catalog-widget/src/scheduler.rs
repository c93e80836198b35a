//! Debounced fetch scheduling and sequence numbering.
//!
//! Every fetch that actually reaches the search service takes a sequence
//! number from [`FetchScheduler::issue`]. Only the holder of the latest
//! number may commit; see [`CatalogResultStore::commit`](crate::CatalogResultStore::commit).
//!
//! Debounced fetches run as Tokio tasks that sleep for the window first.
//! At most one such task is pending: a new trigger aborts the previous one,
//! so a superseded search key never reaches the service.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;
use tracing::trace;

use crate::lock;
use crate::store::FetchOutcome;

/// Issues sequence numbers and owns the pending debounced fetch.
#[derive(Debug)]
pub struct FetchScheduler {
    window: Duration,
    issued: AtomicU64,
    pending: Mutex<Option<AbortHandle>>,
}

impl FetchScheduler {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            issued: AtomicU64::new(0),
            pending: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Take the next sequence number. Numbers start at 1.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Most recently issued sequence number; zero before the first fetch.
    pub fn latest(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        self.latest() == seq
    }

    /// Run `fetch` after the debounce window unless another fetch is
    /// scheduled first. Must be called within a Tokio runtime.
    pub fn debounce<F, Fut>(&self, fetch: F) -> PendingFetch
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = FetchOutcome> + Send + 'static,
    {
        let deadline = Instant::now() + self.window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            fetch().await
        });
        if let Some(previous) = lock(&self.pending).replace(handle.abort_handle()) {
            if !previous.is_finished() {
                trace!("debounced fetch superseded");
            }
            previous.abort();
        }
        PendingFetch::new(handle)
    }

    /// Run `fetch` right away, dropping any pending debounced fetch.
    pub fn immediate<Fut>(&self, fetch: Fut) -> PendingFetch
    where
        Fut: Future<Output = FetchOutcome> + Send + 'static,
    {
        self.cancel_pending();
        PendingFetch::spawn(fetch)
    }

    /// Abort the pending debounced fetch, if any. Returns whether one was
    /// still running.
    pub fn cancel_pending(&self) -> bool {
        match lock(&self.pending).take() {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }
}

/// Handle to a scheduled fetch.
///
/// Dropping it does not cancel the fetch.
#[derive(Debug)]
pub struct PendingFetch {
    handle: JoinHandle<FetchOutcome>,
}

impl PendingFetch {
    fn new(handle: JoinHandle<FetchOutcome>) -> Self {
        Self { handle }
    }

    /// Run `fetch` as its own task, outside the debounce slot.
    pub(crate) fn spawn<Fut>(fetch: Fut) -> Self
    where
        Fut: Future<Output = FetchOutcome> + Send + 'static,
    {
        Self::new(tokio::spawn(fetch))
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the fetch. Aborted fetches report [`FetchOutcome::Cancelled`].
    pub async fn outcome(self) -> FetchOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => FetchOutcome::Cancelled,
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}
