use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use super::{mask, read_json, send_error, UpstreamApi};
use crate::errors::MarketDataError;

pub const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";

const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// Alpha Vantage REST client.
///
/// Every call goes to the single `query` endpoint; `path` is ignored.
pub struct AlphaVantageUpstream {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageUpstream {
    pub fn new(api_key: String) -> Self {
        Self::with_options(api_key, ALPHA_VANTAGE_BASE_URL, Duration::from_secs(30))
    }

    pub fn with_options(api_key: String, base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl UpstreamApi for AlphaVantageUpstream {
    async fn get(&self, _path: &str, query: Vec<(String, String)>) -> Result<Value, MarketDataError> {
        let mut params = query;
        params.push(("apikey".to_string(), self.api_key.clone()));

        let url = Url::parse_with_params(&self.base_url, &params).map_err(|e| {
            MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            }
        })?;

        debug!("Alpha Vantage request: {}", mask(url.as_str(), &self.api_key));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| send_error(PROVIDER_ID, e))?;

        match read_json(PROVIDER_ID, response).await? {
            Ok(data) => Ok(data),
            Err((status, _body)) => Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!(
                    "Alpha Vantage API error: {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
                .trim_end()
                .to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn upstream(server: &MockServer) -> AlphaVantageUpstream {
        AlphaVantageUpstream::with_options(
            "av-key".to_string(),
            format!("{}/query", server.uri()),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_get_appends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "GLOBAL_QUOTE"))
            .and(query_param("symbol", "IBM"))
            .and(query_param("apikey", "av-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "Global Quote": { "05. price": "184.92" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let data = upstream(&server)
            .get(
                "",
                vec![
                    ("function".to_string(), "GLOBAL_QUOTE".to_string()),
                    ("symbol".to_string(), "IBM".to_string()),
                ],
            )
            .await
            .unwrap();
        assert_eq!(data["Global Quote"]["05. price"], "184.92");
    }

    #[tokio::test]
    async fn test_error_status_wording() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let err = upstream(&server).get("", Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Alpha Vantage API error: 503 Service Unavailable");
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("timestamp,open\n"))
            .mount(&server)
            .await;

        let err = upstream(&server).get("", Vec::new()).await.unwrap_err();
        assert!(matches!(err, MarketDataError::Decode { .. }));
    }
}
