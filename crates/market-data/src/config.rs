//! Client-side settings for the adapter layer.

use std::time::Duration;

use serde::Deserialize;

use crate::loading::DEFAULT_KEY_CAPACITY;

/// Settings shared by the adapters, the search debouncer and the pollers.
///
/// Deserializes from camelCase JSON; any missing field falls back to its
/// default.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Base URL of the proxy functions, e.g. `http://localhost:8080/functions/v1`.
    pub functions_url: String,

    /// Optional bearer key sent with every function call.
    pub anon_key: Option<String>,

    #[serde(with = "millis")]
    pub request_timeout: Duration,

    /// Quiet period before a symbol search fires.
    #[serde(with = "millis")]
    pub search_debounce: Duration,

    /// Shortest trimmed query that triggers a search.
    pub search_min_query_len: usize,

    #[serde(with = "millis")]
    pub poll_interval: Duration,

    pub loading_key_capacity: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            functions_url: "http://localhost:8080/functions/v1".to_string(),
            anon_key: None,
            request_timeout: Duration::from_secs(30),
            search_debounce: Duration::from_millis(400),
            search_min_query_len: 1,
            poll_interval: Duration::from_secs(60),
            loading_key_capacity: DEFAULT_KEY_CAPACITY,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.search_debounce, Duration::from_millis(400));
        assert_eq!(settings.search_min_query_len, 1);
        assert_eq!(settings.poll_interval, Duration::from_secs(60));
        assert!(settings.anon_key.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "functionsUrl": "https://example.test/functions/v1",
            "searchDebounce": 300,
            "searchMinQueryLen": 2
        }"#;

        let settings: ClientSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.functions_url, "https://example.test/functions/v1");
        assert_eq!(settings.search_debounce, Duration::from_millis(300));
        assert_eq!(settings.search_min_query_len, 2);
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }
}
