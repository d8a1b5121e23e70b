//! reqwest-backed [`FunctionClient`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::traits::{FunctionClient, FunctionEnvelope};
use crate::config::ClientSettings;
use crate::errors::MarketDataError;

/// Calls proxy functions over HTTP.
///
/// Each invocation is a `POST {functions_url}/{function}` with a JSON body and
/// an optional bearer key.
pub struct HttpFunctionClient {
    client: Client,
    functions_url: String,
    anon_key: Option<String>,
}

impl HttpFunctionClient {
    pub fn new(functions_url: impl Into<String>, anon_key: Option<String>) -> Self {
        Self::with_timeout(functions_url, anon_key, Duration::from_secs(30))
    }

    pub fn with_timeout(
        functions_url: impl Into<String>,
        anon_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            functions_url: functions_url.into().trim_end_matches('/').to_string(),
            anon_key,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::with_timeout(
            settings.functions_url.clone(),
            settings.anon_key.clone(),
            settings.request_timeout,
        )
    }

    fn url(&self, function: &str) -> String {
        format!("{}/{}", self.functions_url, function)
    }

    /// Posts `body` and returns the status with the raw response text.
    async fn post(&self, function: &str, body: Value) -> Result<(StatusCode, String), MarketDataError> {
        let url = self.url(function);
        debug!("Invoking function {}", url);

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.anon_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: function.to_string(),
                }
            } else {
                MarketDataError::Transport(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: function.to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| MarketDataError::Transport(format!("Failed to read response: {}", e)))?;
        Ok((status, text))
    }
}

#[async_trait]
impl FunctionClient for HttpFunctionClient {
    async fn invoke(&self, function: &str, body: Value) -> Result<Value, MarketDataError> {
        let (status, text) = self.post(function, body).await?;

        // Error responses still carry the envelope when the function produced them.
        match serde_json::from_str::<FunctionEnvelope>(&text) {
            Ok(envelope) => {
                if !status.is_success() && envelope.error.is_none() {
                    return Err(MarketDataError::Transport(format!("HTTP {}", status)));
                }
                envelope.into_result(function)
            }
            Err(_) if !status.is_success() => {
                Err(MarketDataError::Transport(format!("HTTP {} - {}", status, text)))
            }
            Err(e) => Err(MarketDataError::decode(
                format!("{} response", function),
                e,
            )),
        }
    }

    async fn invoke_plain(&self, function: &str, body: Value) -> Result<Value, MarketDataError> {
        let (status, text) = self.post(function, body).await?;

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(MarketDataError::Transport(format!("HTTP {} - {}", status, text)));
            }
            Err(e) => return Err(MarketDataError::decode(format!("{} response", function), e)),
        };

        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(MarketDataError::ProviderError {
                provider: function.to_string(),
                message: message.to_string(),
            });
        }
        if !status.is_success() {
            return Err(MarketDataError::Transport(format!("HTTP {}", status)));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn respond(function: &str, response: ResponseTemplate) -> (MockServer, HttpFunctionClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/functions/v1/{}", function)))
            .respond_with(response)
            .mount(&server)
            .await;
        let client = HttpFunctionClient::new(format!("{}/functions/v1", server.uri()), None);
        (server, client)
    }

    #[test]
    fn test_url_joins_function_name() {
        let client = HttpFunctionClient::new("http://localhost:8080/functions/v1/", None);
        assert_eq!(
            client.url("finnhub-api"),
            "http://localhost:8080/functions/v1/finnhub-api"
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = ClientSettings {
            functions_url: "https://proxy.test/functions/v1".to_string(),
            anon_key: Some("anon".to_string()),
            ..ClientSettings::default()
        };
        let client = HttpFunctionClient::from_settings(&settings);
        assert_eq!(
            client.url("alpha-vantage-api"),
            "https://proxy.test/functions/v1/alpha-vantage-api"
        );
        assert_eq!(client.anon_key.as_deref(), Some("anon"));
    }

    #[tokio::test]
    async fn test_invoke_unwraps_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/finnhub-api"))
            .and(header("authorization", "Bearer anon"))
            .and(body_partial_json(json!({ "endpoint": "quote" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "c": 1.5 } })))
            .expect(1)
            .mount(&server)
            .await;
        let client = HttpFunctionClient::new(
            format!("{}/functions/v1", server.uri()),
            Some("anon".to_string()),
        );

        let data = client
            .invoke("finnhub-api", json!({ "endpoint": "quote", "params": { "symbol": "AAPL" } }))
            .await
            .unwrap();
        assert_eq!(data, json!({ "c": 1.5 }));
    }

    #[tokio::test]
    async fn test_invoke_error_envelope_on_server_error() {
        let (_server, client) = respond(
            "alpha-vantage-api",
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": "Alpha Vantage API error: Invalid API call." })),
        )
        .await;

        let err = client
            .invoke("alpha-vantage-api", json!({ "function": "TIME_SERIES_DAILY" }))
            .await
            .unwrap_err();
        match err {
            MarketDataError::ProviderError { provider, message } => {
                assert_eq!(provider, "alpha-vantage-api");
                assert_eq!(message, "Alpha Vantage API error: Invalid API call.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invoke_non_json_error_body() {
        let (_server, client) = respond(
            "finnhub-api",
            ResponseTemplate::new(500).set_body_string("upstream crashed"),
        )
        .await;

        let err = client.invoke("finnhub-api", json!({})).await.unwrap_err();
        match err {
            MarketDataError::Transport(message) => {
                assert!(message.starts_with("HTTP 500"));
                assert!(message.ends_with("upstream crashed"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invoke_rate_limited() {
        let (_server, client) = respond("finnhub-api", ResponseTemplate::new(429)).await;

        let err = client.invoke("finnhub-api", json!({})).await.unwrap_err();
        assert!(matches!(
            err,
            MarketDataError::RateLimited { ref provider } if provider == "finnhub-api"
        ));
    }

    #[tokio::test]
    async fn test_invoke_null_data_is_an_error() {
        let (_server, client) = respond(
            "finnhub-api",
            ResponseTemplate::new(200).set_body_json(json!({ "data": null })),
        )
        .await;

        let err = client.invoke("finnhub-api", json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Received empty response from API function");
    }

    #[tokio::test]
    async fn test_invoke_plain_returns_bare_body() {
        let (_server, client) = respond(
            "financial-advisor",
            ResponseTemplate::new(200).set_body_json(json!({ "response": "Diversify." })),
        )
        .await;

        let body = client
            .invoke_plain("financial-advisor", json!({ "query": "?" }))
            .await
            .unwrap();
        assert_eq!(body, json!({ "response": "Diversify." }));
    }

    #[tokio::test]
    async fn test_invoke_plain_error_member() {
        let (_server, client) = respond(
            "stock-analyzer",
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Failed to parse analysis results" })),
        )
        .await;

        let err = client
            .invoke_plain("stock-analyzer", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse analysis results");
    }
}
