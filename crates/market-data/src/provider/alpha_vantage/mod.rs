//! Alpha Vantage adapter.
//!
//! Wraps the `alpha-vantage-api` proxy function:
//! - Intraday bars via TIME_SERIES_INTRADAY
//! - Daily, weekly and monthly bars via TIME_SERIES_DAILY/WEEKLY/MONTHLY
//! - Last price via GLOBAL_QUOTE
//!
//! Note: the free tier is limited to 5 API calls per minute. When the limit is
//! hit the provider answers with a `Note` instead of data; that is surfaced as
//! a warning and whatever data came back is still returned.

pub mod models;

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::loading::{request_key, LoadingMap};
use crate::models::{IntradayInterval, OutputSize, SeriesKind, TimeSeriesPoint};
use crate::notify::Notifier;
use crate::provider::{FunctionClient, ALPHA_VANTAGE_FUNCTION};

pub use models::{normalize_series, Advisory, GlobalQuote};

pub(crate) const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// Time-series adapter backed by the `alpha-vantage-api` function.
#[derive(Clone)]
pub struct AlphaVantageClient {
    functions: Arc<dyn FunctionClient>,
    loading: LoadingMap,
    notifier: Notifier,
}

impl AlphaVantageClient {
    pub fn new(functions: Arc<dyn FunctionClient>, notifier: Notifier) -> Self {
        Self::with_loading(functions, LoadingMap::new(), notifier)
    }

    pub fn with_loading(
        functions: Arc<dyn FunctionClient>,
        loading: LoadingMap,
        notifier: Notifier,
    ) -> Self {
        Self {
            functions,
            loading,
            notifier,
        }
    }

    pub fn loading(&self) -> &LoadingMap {
        &self.loading
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub async fn daily(&self, symbol: &str, output_size: OutputSize) -> Option<Vec<TimeSeriesPoint>> {
        self.time_series(SeriesKind::Daily, symbol, Some(output_size))
            .await
    }

    pub async fn intraday(
        &self,
        symbol: &str,
        interval: IntradayInterval,
        output_size: OutputSize,
    ) -> Option<Vec<TimeSeriesPoint>> {
        self.time_series(SeriesKind::Intraday(interval), symbol, Some(output_size))
            .await
    }

    pub async fn weekly(&self, symbol: &str) -> Option<Vec<TimeSeriesPoint>> {
        self.time_series(SeriesKind::Weekly, symbol, None).await
    }

    pub async fn monthly(&self, symbol: &str) -> Option<Vec<TimeSeriesPoint>> {
        self.time_series(SeriesKind::Monthly, symbol, None).await
    }

    /// Fetches one series and normalizes it, oldest point first.
    ///
    /// Loading keys: `intraday-SYM-5min`, `daily-SYM-compact`, `weekly-SYM`,
    /// `monthly-SYM`.
    pub async fn time_series(
        &self,
        kind: SeriesKind,
        symbol: &str,
        output_size: Option<OutputSize>,
    ) -> Option<Vec<TimeSeriesPoint>> {
        let symbol = self.require_symbol(symbol)?;

        let mut key_params = vec![symbol.as_str()];
        let mut body = json!({
            "function": kind.function_name(),
            "symbol": symbol,
        });
        if let SeriesKind::Intraday(interval) = kind {
            key_params.push(interval.as_str());
            body["interval"] = json!(interval.as_str());
        }
        if let Some(size) = output_size {
            if matches!(kind, SeriesKind::Daily) {
                key_params.push(size.as_str());
            }
            body["outputsize"] = json!(size.as_str());
        }

        let key = request_key(kind.key_prefix(), &key_params);
        let payload = self.call(key, kind.function_name(), body).await?;

        let points = normalize_series(kind, &payload);
        debug!(
            "Alpha Vantage: {} {} points for {}",
            points.len(),
            kind.key_prefix(),
            symbol
        );
        Some(points)
    }

    /// Latest price record for `symbol`.
    pub async fn global_quote(&self, symbol: &str) -> Option<GlobalQuote> {
        let symbol = self.require_symbol(symbol)?;
        let body = json!({ "function": "GLOBAL_QUOTE", "symbol": symbol });
        let payload = self
            .call(request_key("global-quote", &[&symbol]), "GLOBAL_QUOTE", body)
            .await?;

        match GlobalQuote::from_payload(&payload) {
            Some(quote) => Some(quote),
            None => {
                let error = MarketDataError::decode(
                    "GLOBAL_QUOTE",
                    "missing 'Global Quote' object",
                );
                self.report("GLOBAL_QUOTE", &error);
                None
            }
        }
    }

    /// Flags the key, invokes the function and inspects the payload for
    /// embedded errors and advisories.
    async fn call(&self, key: String, function: &str, body: Value) -> Option<Value> {
        let _loading = self.loading.begin(key);

        let payload = match self.functions.invoke(ALPHA_VANTAGE_FUNCTION, body).await {
            Ok(payload) => payload,
            Err(e) => {
                self.report(function, &e);
                return None;
            }
        };

        if let Some(message) = models::error_message(&payload) {
            let error = MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("API Error: {}", message),
            };
            self.report(function, &error);
            return None;
        }

        if let Some(advisory) = Advisory::from_payload(&payload) {
            if advisory.is_rate_limit() {
                warn!(
                    "Alpha Vantage rate limit reached during {}: {}",
                    function,
                    advisory.message()
                );
            } else {
                warn!("Alpha Vantage advisory for {}: {}", function, advisory.message());
            }
            self.notifier
                .warning(format!("Alpha Vantage API: {}", advisory.message()));
        }

        Some(payload)
    }

    fn report(&self, function: &str, error: &MarketDataError) {
        warn!("Error calling Alpha Vantage API ({}): {}", function, error);
        self.notifier
            .error(format!("Failed to fetch data: {}", error));
    }

    fn require_symbol(&self, symbol: &str) -> Option<String> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            self.notifier.warning("Symbol is required");
            return None;
        }
        Some(symbol.to_string())
    }
}
