//! Error types for the market data crate.
//!
//! Adapters never hand these errors to their callers. They are converted at
//! the adapter boundary into a `None` result plus a [`Notification`](crate::Notification).
//! The proxy server maps them into its `{error}` response body.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider rate limited the request.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider (or the proxy function in front of it) reported an error.
    #[error("{message}")]
    ProviderError {
        /// The provider or function that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The proxy function could not be reached or answered with an unusable body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A payload did not match the expected shape.
    #[error("Failed to decode {context}: {message}")]
    Decode {
        /// What was being decoded
        context: String,
        /// The underlying serde message
        message: String,
    },
}

impl MarketDataError {
    pub(crate) fn decode(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MarketDataError::RateLimited {
            provider: "FINNHUB".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: FINNHUB");

        let error = MarketDataError::ProviderError {
            provider: "alpha-vantage-api".to_string(),
            message: "API key invalid".to_string(),
        };
        assert_eq!(format!("{}", error), "API key invalid");

        let error = MarketDataError::decode("candles", "expected array");
        assert_eq!(format!("{}", error), "Failed to decode candles: expected array");

        let error = MarketDataError::Transport("HTTP 502 Bad Gateway".to_string());
        assert_eq!(format!("{}", error), "Transport error: HTTP 502 Bad Gateway");
    }
}
