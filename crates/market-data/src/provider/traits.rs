//! Transport trait for the server-side proxy functions.
//!
//! The browser never talks to a market-data provider directly. Every call is
//! an invocation of a named proxy function (`finnhub-api`,
//! `alpha-vantage-api`, ...) that holds the provider API key and answers with
//! a `{data} | {error}` envelope.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;

/// Name of the Finnhub proxy function.
pub const FINNHUB_FUNCTION: &str = "finnhub-api";

/// Name of the Alpha Vantage proxy function.
pub const ALPHA_VANTAGE_FUNCTION: &str = "alpha-vantage-api";

/// Invokes a named proxy function.
///
/// Implementations unwrap the response envelope: `Ok` carries the `data`
/// member, while an `error` member or a transport failure becomes `Err`.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use serde_json::{json, Value};
/// use wisefolio_market_data::provider::FunctionClient;
///
/// struct Canned;
///
/// #[async_trait]
/// impl FunctionClient for Canned {
///     async fn invoke(&self, _function: &str, _body: Value) -> Result<Value, MarketDataError> {
///         Ok(json!({ "c": 184.92 }))
///     }
/// }
/// ```
#[async_trait]
pub trait FunctionClient: Send + Sync {
    /// Sends `body` to `function` and returns the unwrapped `data` payload.
    async fn invoke(&self, function: &str, body: Value) -> Result<Value, MarketDataError>;

    /// Like [`invoke`](Self::invoke) for functions that answer with a bare
    /// JSON body instead of the `{data}` envelope. An `error` member still
    /// becomes `Err`.
    async fn invoke_plain(&self, function: &str, body: Value) -> Result<Value, MarketDataError> {
        self.invoke(function, body).await
    }
}

/// Wire envelope returned by every proxy function.
#[derive(Debug, Deserialize)]
pub struct FunctionEnvelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FunctionEnvelope {
    /// Converts the envelope into the payload or the reported error.
    pub fn into_result(self, function: &str) -> Result<Value, MarketDataError> {
        if let Some(message) = self.error {
            return Err(MarketDataError::ProviderError {
                provider: function.to_string(),
                message,
            });
        }

        match self.data {
            Some(Value::Null) | None => Err(MarketDataError::ProviderError {
                provider: function.to_string(),
                message: "Received empty response from API function".to_string(),
            }),
            Some(data) => Ok(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_with_data() {
        let envelope: FunctionEnvelope =
            serde_json::from_value(json!({ "data": { "c": 1.0 } })).unwrap();
        let data = envelope.into_result(FINNHUB_FUNCTION).unwrap();
        assert_eq!(data["c"], 1.0);
    }

    #[test]
    fn test_envelope_with_error() {
        let envelope: FunctionEnvelope =
            serde_json::from_value(json!({ "error": "Endpoint is required" })).unwrap();
        let err = envelope.into_result(FINNHUB_FUNCTION).unwrap_err();
        assert_eq!(err.to_string(), "Endpoint is required");
    }

    #[test]
    fn test_envelope_without_data_is_an_error() {
        let envelope: FunctionEnvelope = serde_json::from_value(json!({ "data": null })).unwrap();
        assert!(envelope.into_result(ALPHA_VANTAGE_FUNCTION).is_err());
    }
}
