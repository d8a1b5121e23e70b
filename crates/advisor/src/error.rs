//! Advisor error types.

use thiserror::Error;
use wisefolio_market_data::MarketDataError;

/// Errors raised while calling an advisor function.
///
/// Like the market-data adapters, [`AdvisorClient`](crate::AdvisorClient)
/// converts these into a notification and a `None` result.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The request was rejected before being sent.
    #[error("{0}")]
    InvalidInput(String),

    /// The function call itself failed.
    #[error(transparent)]
    Function(#[from] MarketDataError),

    /// The function answered but the body was not usable at all.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl AdvisorError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            AdvisorError::InvalidInput(_) => "INVALID_INPUT",
            AdvisorError::Function(_) => "FUNCTION_ERROR",
            AdvisorError::Malformed(_) => "MALFORMED_RESPONSE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_error_is_transparent() {
        let err: AdvisorError = MarketDataError::ProviderError {
            provider: "stock-analyzer".to_string(),
            message: "OPENAI_API_KEY is not set".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "OPENAI_API_KEY is not set");
        assert_eq!(err.code(), "FUNCTION_ERROR");
    }
}
