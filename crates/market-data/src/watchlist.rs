//! Bounded watchlist with an active symbol.

use serde::Serialize;
use tracing::debug;

use crate::notify::Notifier;

/// Symbols a fresh watchlist starts with.
pub const DEFAULT_WATCHLIST: [&str; 5] = ["AAPL", "MSFT", "GOOGL", "AMZN", "META"];

/// Most symbols a watchlist may hold.
pub const MAX_WATCHLIST_LEN: usize = 10;

/// Snapshot of a watchlist, as a view renders it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistState {
    pub symbols: Vec<String>,
    pub active_symbol: String,
}

/// Ordered, duplicate-free list of symbols. Never empty; one symbol is
/// always active.
///
/// Rejected edits publish a notification instead of returning an error.
#[derive(Clone)]
pub struct Watchlist {
    symbols: Vec<String>,
    active: String,
    notifier: Notifier,
}

fn normalize(symbol: &str) -> Option<String> {
    let symbol = symbol.trim().to_uppercase();
    (!symbol.is_empty()).then_some(symbol)
}

impl Watchlist {
    pub fn new(notifier: Notifier) -> Self {
        Self::with_symbols(DEFAULT_WATCHLIST, notifier)
    }

    /// Builds a watchlist from `symbols`, dropping blanks and duplicates and
    /// keeping at most [`MAX_WATCHLIST_LEN`]. Falls back to the defaults when
    /// nothing usable remains. The first symbol becomes active.
    pub fn with_symbols<I, S>(symbols: I, notifier: Notifier) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for symbol in symbols {
            if let Some(symbol) = normalize(symbol.as_ref()) {
                if !list.contains(&symbol) && list.len() < MAX_WATCHLIST_LEN {
                    list.push(symbol);
                }
            }
        }
        if list.is_empty() {
            list = DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect();
        }

        let active = list[0].clone();
        Self {
            symbols: list,
            active,
            notifier,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        normalize(symbol).is_some_and(|s| self.symbols.contains(&s))
    }

    pub fn state(&self) -> WatchlistState {
        WatchlistState {
            symbols: self.symbols.clone(),
            active_symbol: self.active.clone(),
        }
    }

    /// Adds `input` and makes it active. A symbol already on the list only
    /// becomes active. Returns `false` when nothing changed.
    pub fn add(&mut self, input: &str) -> bool {
        let Some(symbol) = normalize(input) else {
            return false;
        };

        if self.symbols.contains(&symbol) {
            self.active = symbol;
            return true;
        }

        if self.symbols.len() >= MAX_WATCHLIST_LEN {
            self.notifier.warning(format!(
                "Maximum of {} stocks in watchlist. Remove one first.",
                MAX_WATCHLIST_LEN
            ));
            return false;
        }

        debug!("Adding {} to watchlist", symbol);
        self.symbols.push(symbol.clone());
        self.active = symbol;
        true
    }

    /// Removes `symbol`. The last symbol can't be removed. Removing the
    /// active symbol moves focus to the first remaining one.
    pub fn remove(&mut self, symbol: &str) -> bool {
        if self.symbols.len() <= 1 {
            self.notifier
                .error("Cannot remove the last stock from watchlist");
            return false;
        }

        let Some(symbol) = normalize(symbol) else {
            return false;
        };
        let before = self.symbols.len();
        self.symbols.retain(|s| *s != symbol);
        if self.symbols.len() == before {
            return false;
        }

        if self.active == symbol {
            self.active = self.symbols[0].clone();
        }
        true
    }

    /// Makes an existing symbol active.
    pub fn select(&mut self, symbol: &str) -> bool {
        match normalize(symbol) {
            Some(symbol) if self.symbols.contains(&symbol) => {
                self.active = symbol;
                true
            }
            _ => false,
        }
    }
}
