//! Per-request loading state.
//!
//! Every adapter call derives a key such as `quote-AAPL` or
//! `candles-AAPL-D` and flips its flag while the request is in flight, so
//! concurrent requests for different symbols never share a spinner.
//!
//! The map is never mutated in place. Each change publishes a fresh
//! `Arc<HashMap>` snapshot through a `watch` channel, so readers always see a
//! whole map.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::config::ClientSettings;

/// Immutable snapshot of all known request keys.
pub type LoadingSnapshot = Arc<HashMap<String, bool>>;

/// Default upper bound on tracked keys before idle keys are pruned.
pub const DEFAULT_KEY_CAPACITY: usize = 256;

/// Builds a loading key from an operation name and its parameters.
///
/// ```
/// use wisefolio_market_data::loading::request_key;
///
/// assert_eq!(request_key("quote", &["AAPL"]), "quote-AAPL");
/// assert_eq!(request_key("candles", &["AAPL", "D"]), "candles-AAPL-D");
/// ```
pub fn request_key(operation: &str, params: &[&str]) -> String {
    let mut key = operation.to_string();
    for param in params {
        key.push('-');
        key.push_str(param);
    }
    key
}

/// Loading-state map owned by one adapter instance.
#[derive(Clone)]
pub struct LoadingMap {
    sender: Arc<watch::Sender<LoadingSnapshot>>,
    capacity: usize,
}

impl LoadingMap {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_KEY_CAPACITY)
    }

    /// Creates a map that prunes idle keys once more than `capacity` are tracked.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _receiver) = watch::channel(Arc::new(HashMap::new()));
        Self {
            sender: Arc::new(sender),
            capacity: capacity.max(1),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::with_capacity(settings.loading_key_capacity)
    }

    /// Marks `key` as in flight until the returned guard is dropped.
    pub fn begin(&self, key: impl Into<String>) -> LoadingGuard {
        let key = key.into();
        self.set(&key, true);
        LoadingGuard {
            map: self.clone(),
            key,
        }
    }

    /// Replaces the snapshot with one where `key` maps to `loading`.
    pub fn set(&self, key: &str, loading: bool) {
        let capacity = self.capacity;
        self.sender.send_modify(|current| {
            let mut next: HashMap<String, bool> = (**current).clone();
            next.insert(key.to_string(), loading);
            if next.len() > capacity {
                let before = next.len();
                next.retain(|k, v| *v || k == key);
                debug!("Pruned {} idle loading keys", before - next.len());
            }
            *current = Arc::new(next);
        });
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.sender.borrow().get(key).copied().unwrap_or(false)
    }

    /// True while any tracked request is in flight.
    pub fn any_loading(&self) -> bool {
        self.sender.borrow().values().any(|v| *v)
    }

    pub fn snapshot(&self) -> LoadingSnapshot {
        self.sender.borrow().clone()
    }

    /// Receives every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<LoadingSnapshot> {
        self.sender.subscribe()
    }
}

impl Default for LoadingMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears its loading flag on drop.
///
/// Dropping covers every exit path: success, error, and a caller that
/// abandons the future mid-request.
pub struct LoadingGuard {
    map: LoadingMap,
    key: String,
}

impl LoadingGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.map.set(&self.key, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_sets_and_clears_flag() {
        let map = LoadingMap::new();
        assert!(!map.is_loading("quote-AAPL"));

        let guard = map.begin("quote-AAPL");
        assert!(map.is_loading("quote-AAPL"));
        assert!(map.any_loading());

        drop(guard);
        assert!(!map.is_loading("quote-AAPL"));
        assert!(!map.any_loading());
        // Key stays known after completion.
        assert_eq!(map.snapshot().get("quote-AAPL"), Some(&false));
    }

    #[test]
    fn test_keys_are_independent() {
        let map = LoadingMap::new();
        let aapl = map.begin("quote-AAPL");
        let msft = map.begin("quote-MSFT");
        drop(aapl);

        assert!(!map.is_loading("quote-AAPL"));
        assert!(map.is_loading("quote-MSFT"));
        drop(msft);
    }

    #[test]
    fn test_snapshots_are_replaced_not_mutated() {
        let map = LoadingMap::new();
        let before = map.snapshot();
        let _guard = map.begin("daily-AAPL-compact");
        let after = map.snapshot();

        assert!(before.is_empty());
        assert_eq!(after.get("daily-AAPL-compact"), Some(&true));
    }

    #[test]
    fn test_idle_keys_pruned_past_capacity() {
        let map = LoadingMap::with_capacity(2);
        map.set("quote-A", false);
        map.set("quote-B", true);
        map.set("quote-C", true);

        let snapshot = map.snapshot();
        assert!(!snapshot.contains_key("quote-A"));
        assert!(snapshot.contains_key("quote-B"));
        assert!(snapshot.contains_key("quote-C"));
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let map = LoadingMap::new();
        let mut rx = map.subscribe();

        let guard = map.begin("weekly-IBM");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().get("weekly-IBM"), Some(&true));

        drop(guard);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().get("weekly-IBM"), Some(&false));
    }

    #[test]
    fn test_capacity_from_settings() {
        let settings = ClientSettings {
            loading_key_capacity: 1,
            ..ClientSettings::default()
        };
        let map = LoadingMap::from_settings(&settings);
        map.set("quote-A", false);
        map.set("quote-B", false);
        assert_eq!(map.snapshot().len(), 1);
        assert!(map.snapshot().contains_key("quote-B"));
    }

    #[test]
    fn test_request_key() {
        assert_eq!(request_key("weekly", &["IBM"]), "weekly-IBM");
        assert_eq!(
            request_key("intraday", &["AAPL", "5min"]),
            "intraday-AAPL-5min"
        );
    }
}
