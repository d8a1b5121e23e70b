//! Debounced symbol search.
//!
//! Keystrokes are pushed into an mpsc channel. A worker task waits for a quiet
//! period after the latest input and only then runs the search, so a burst of
//! typing costs one provider call carrying the final query. Results are
//! published through a `watch` channel.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ClientSettings;
use crate::models::SymbolMatch;
use crate::provider::finnhub::FinnhubClient;

/// Default quiet period before a search fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

#[async_trait]
pub trait SymbolSearch: Send + Sync + 'static {
    /// `None` means the search failed; the caller shows no results.
    async fn search(&self, query: &str) -> Option<Vec<SymbolMatch>>;
}

#[async_trait]
impl SymbolSearch for FinnhubClient {
    async fn search(&self, query: &str) -> Option<Vec<SymbolMatch>> {
        self.search_symbols(query).await
    }
}

/// Latest published search outcome.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    /// Query the results belong to; empty when cleared.
    pub query: String,
    pub results: Vec<SymbolMatch>,
}

/// Owns the debounce worker. Dropping it cancels any pending search.
pub struct SearchDebouncer {
    inputs: mpsc::UnboundedSender<String>,
    state: watch::Receiver<SearchState>,
    cancel: CancellationToken,
}

impl SearchDebouncer {
    /// Spawns the worker on the current tokio runtime.
    pub fn spawn<S: SymbolSearch>(search: Arc<S>, quiet_period: Duration, min_query_len: usize) -> Self {
        let (inputs, rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(SearchState::default());
        let cancel = CancellationToken::new();

        let worker = DebounceWorker {
            search,
            quiet_period,
            min_query_len,
            state: state_tx,
            cancel: cancel.clone(),
        };
        tokio::spawn(worker.run(rx));

        Self {
            inputs,
            state,
            cancel,
        }
    }

    pub fn from_settings<S: SymbolSearch>(search: Arc<S>, settings: &ClientSettings) -> Self {
        Self::spawn(search, settings.search_debounce, settings.search_min_query_len)
    }

    /// Feeds the current contents of the search box.
    pub fn push(&self, input: impl Into<String>) {
        if self.inputs.send(input.into()).is_err() {
            debug!("Search input dropped: debouncer is shut down");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    pub fn current(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Stops the worker. A pending or in-flight search never publishes.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct DebounceWorker<S> {
    search: Arc<S>,
    quiet_period: Duration,
    min_query_len: usize,
    state: watch::Sender<SearchState>,
    cancel: CancellationToken,
}

impl<S: SymbolSearch> DebounceWorker<S> {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<String>) {
        debug!("Search debouncer started");
        let mut pending: Option<String> = None;

        loop {
            if let Some(query) = pending.clone() {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break,
                    input = rx.recv() => match input {
                        Some(next) => pending = self.accept(next),
                        None => break,
                    },
                    // Restarted on every new input since each loop builds a fresh sleep.
                    _ = tokio::time::sleep(self.quiet_period) => {
                        pending = None;
                        self.execute(query).await;
                    }
                }
            } else {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break,
                    input = rx.recv() => match input {
                        Some(next) => pending = self.accept(next),
                        None => break,
                    },
                }
            }
        }

        debug!("Search debouncer shutting down");
    }

    /// Short queries clear the results right away and schedule nothing.
    fn accept(&self, input: String) -> Option<String> {
        let query = input.trim();
        if query.chars().count() < self.min_query_len {
            self.state.send_replace(SearchState::default());
            return None;
        }
        Some(query.to_string())
    }

    async fn execute(&self, query: String) {
        debug!("Searching symbols for '{}'", query);

        let results = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return,
            results = self.search.search(&query) => results.unwrap_or_default(),
        };

        if self.cancel.is_cancelled() {
            return;
        }
        self.state.send_replace(SearchState { query, results });
    }
}
