use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{read_json, send_error, UpstreamApi};
use crate::errors::MarketDataError;

pub const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Endpoints the adapters call; anything else is refused by the proxy.
pub const FINNHUB_ENDPOINTS: [&str; 8] = [
    "quote",
    "stock/candle",
    "stock/profile2",
    "stock/metric",
    "company-news",
    "news",
    "news-sentiment",
    "search",
];

const PROVIDER_ID: &str = "FINNHUB";

/// Error body Finnhub sends with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Finnhub REST client.
///
/// Free tier is limited to 60 API calls per minute.
pub struct FinnhubUpstream {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FinnhubUpstream {
    pub fn new(api_key: String) -> Self {
        Self::with_options(api_key, FINNHUB_BASE_URL, Duration::from_secs(30))
    }

    pub fn with_options(api_key: String, base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl UpstreamApi for FinnhubUpstream {
    async fn get(&self, path: &str, query: Vec<(String, String)>) -> Result<Value, MarketDataError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("Finnhub request: {} with {} params", path, query.len());

        // Key goes in a header so it never shows up in logged URLs.
        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| send_error(PROVIDER_ID, e))?;

        match read_json(PROVIDER_ID, response).await? {
            Ok(data) => Ok(data),
            Err((status, body)) => {
                let detail = serde_json::from_str::<ErrorResponse>(&body)
                    .ok()
                    .and_then(|r| r.error)
                    .unwrap_or(body);
                Err(MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Finnhub API Error: HTTP {} - {}", status.as_u16(), detail),
                })
            }
        }
    }
}
