//! Direct HTTP clients for the provider REST APIs.
//!
//! These hold the provider API keys and are only meant for the proxy server.
//! Adapters in [`crate::provider`] never use them.

mod alpha_vantage;
mod finnhub;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde_json::{Map, Value};

use crate::errors::MarketDataError;

pub use alpha_vantage::{AlphaVantageUpstream, ALPHA_VANTAGE_BASE_URL};
pub use finnhub::{FinnhubUpstream, FINNHUB_BASE_URL, FINNHUB_ENDPOINTS};

/// A provider REST API reached with a GET and a query string.
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    /// Requests `path` (relative to the provider base URL) and returns the
    /// parsed JSON body.
    async fn get(&self, path: &str, query: Vec<(String, String)>) -> Result<Value, MarketDataError>;
}

/// Flattens JSON params into query pairs. `null` values are dropped and
/// non-string scalars use their JSON text.
pub fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// Replaces every occurrence of `secret` with `***`.
pub(crate) fn mask(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, "***")
}

pub(crate) fn send_error(provider: &str, err: reqwest::Error) -> MarketDataError {
    if err.is_timeout() {
        MarketDataError::Timeout {
            provider: provider.to_string(),
        }
    } else {
        MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("Request failed: {}", err.without_url()),
        }
    }
}

/// Maps rate-limit statuses, then parses the body as JSON.
///
/// Non-success statuses return the body text so callers can word the error.
pub(crate) async fn read_json(
    provider: &str,
    response: Response,
) -> Result<Result<Value, (StatusCode, String)>, MarketDataError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(MarketDataError::RateLimited {
            provider: provider.to_string(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("Failed to read response: {}", e.without_url()),
        })?;

    if !status.is_success() {
        return Ok(Err((status, body)));
    }

    serde_json::from_str(&body)
        .map(Ok)
        .map_err(|e| MarketDataError::decode(provider, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs() {
        let params = json!({ "symbol": "AAPL", "from": 1704000000, "flag": true, "skip": null });
        let mut pairs = query_pairs(params.as_object().unwrap());
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("flag".to_string(), "true".to_string()),
                ("from".to_string(), "1704000000".to_string()),
                ("symbol".to_string(), "AAPL".to_string()),
            ]
        );
    }

    #[test]
    fn test_mask() {
        assert_eq!(
            mask("https://x.test/query?apikey=SECRET&symbol=IBM", "SECRET"),
            "https://x.test/query?apikey=***&symbol=IBM"
        );
        assert_eq!(mask("no key here", ""), "no key here");
    }
}
