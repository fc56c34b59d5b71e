use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::CatalogSource;
use crate::app::Result;
use crate::domain::{PageResult, Product};
use crate::feed::sentinel::Sentinel;
use crate::feed::state::{FeedState, FetchOutcome, PageRequest, Phase};

type Completion = (PageRequest, Result<PageResult>);

/// Drives a [`FeedState`] against a [`CatalogSource`].
///
/// Fetches run on background tasks so the caller's event loop never blocks;
/// their results come back through a channel and are applied by
/// [`poll_completions`](Self::poll_completions) or
/// [`settle`](Self::settle).
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource + Send + Sync>,
    page_size: u32,
    state: FeedState,
    sentinel: Sentinel,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource + Send + Sync>, page_size: u32) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            source,
            page_size: page_size.max(1),
            state: FeedState::new(),
            sentinel: Sentinel::new(),
            completions_tx,
            completions_rx,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn products(&self) -> &[Product] {
        self.state.products()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Clears the feed when the refresh trigger changed. The sentinel is
    /// torn down with it.
    pub fn reset<T: Hash + ?Sized>(&mut self, trigger: &T) -> bool {
        if self.state.reset_on(trigger) {
            self.sentinel.disconnect();
            true
        } else {
            false
        }
    }

    /// Starts fetching the page under the cursor, unless a fetch is already
    /// running or the feed is exhausted.
    pub fn fetch_next_page(&mut self) -> Option<PageRequest> {
        let request = self.state.begin_fetch()?;
        tracing::debug!(
            "Fetching page {} (generation {})",
            request.page,
            request.generation
        );

        let source = self.source.clone();
        let tx = self.completions_tx.clone();
        let limit = self.page_size;
        tokio::spawn(async move {
            let result = source.fetch_page(request.page, limit).await;
            let _ = tx.send((request, result));
        });

        Some(request)
    }

    /// Registers the last rendered product as the sentinel.
    pub fn observe(&mut self, last_id: Option<&str>) {
        self.sentinel.observe(last_id);
    }

    /// Called when the observed product scrolls into view.
    pub fn on_last_item_visible(&mut self, id: &str) -> Option<PageRequest> {
        if !self.sentinel.report(id, true) {
            return None;
        }
        if !self.state.has_more() || self.state.is_loading() {
            return None;
        }
        self.fetch_next_page()
    }

    /// Called when the observed product leaves the view.
    pub fn on_last_item_hidden(&mut self, id: &str) {
        self.sentinel.report(id, false);
    }

    /// Re-requests the page that failed last, if any.
    pub fn retry(&mut self) -> Option<PageRequest> {
        self.state.last_error()?;
        self.fetch_next_page()
    }

    /// Applies every completion that has already arrived.
    pub fn poll_completions(&mut self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            outcomes.push(self.apply(completion));
        }
        outcomes
    }

    /// Waits for the in-flight fetch to finish and applies it.
    ///
    /// Stale completions received on the way are discarded. Returns `None`
    /// if nothing is in flight.
    pub async fn settle(&mut self) -> Option<FetchOutcome> {
        while self.state.is_loading() {
            let completion = self.completions_rx.recv().await?;
            match self.apply(completion) {
                FetchOutcome::Stale { .. } => continue,
                outcome => return Some(outcome),
            }
        }
        None
    }

    fn apply(&mut self, (request, result): Completion) -> FetchOutcome {
        let outcome = self.state.complete(request, result);

        // A page made only of known products leaves the same sentinel on
        // screen; rearm it so the feed does not stall.
        if let FetchOutcome::Merged {
            added: 0,
            has_more: true,
            ..
        } = outcome
        {
            self.sentinel.rearm();
        }

        outcome
    }
}
