//! Finnhub adapter.
//!
//! Wraps the `finnhub-api` proxy function:
//! - Quotes via `quote`
//! - Candles via `stock/candle`
//! - Company profile and fundamentals via `stock/profile2` and `stock/metric`
//! - Company news, market news and news sentiment
//! - Symbol search via `search`
//!
//! Every call tags itself with a loading key and never fails outward: errors
//! become an error notification and a `None` result.
//! API documentation: https://finnhub.io/docs/api

pub mod models;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::loading::{request_key, LoadingMap};
use crate::models::{
    CandleResolution, CompanyMetrics, CompanyProfile, NewsCategory, NewsItem, NewsQuery,
    NewsSentiment, Quote, SymbolMatch, TimeSeriesPoint,
};
use crate::notify::Notifier;
use crate::provider::{FunctionClient, FINNHUB_FUNCTION};

pub use models::{CandleResponse, FinnhubQuote};

pub(crate) const PROVIDER_ID: &str = "FINNHUB";

/// Quote, candle and news adapter backed by the `finnhub-api` function.
///
/// Each consumer owns its own client; the loading map and notifier are passed
/// in so a view decides what it shares.
#[derive(Clone)]
pub struct FinnhubClient {
    functions: Arc<dyn FunctionClient>,
    loading: LoadingMap,
    notifier: Notifier,
}

impl FinnhubClient {
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

    /// Raw quote as the provider sent it; fields may be missing.
    pub async fn quote(&self, symbol: &str) -> Option<FinnhubQuote> {
        let symbol = self.require_symbol(symbol)?;
        self.call(
            request_key("quote", &[&symbol]),
            "quote",
            params([("symbol", json!(symbol))]),
        )
        .await
    }

    /// Fully populated quote, or `None` when the provider had gaps.
    pub async fn latest_quote(&self, symbol: &str) -> Option<Quote> {
        let raw = self.quote(symbol).await?;
        let quote = raw.normalize(symbol.trim());
        if quote.is_none() {
            debug!("Finnhub quote for {} is incomplete", symbol);
        }
        quote
    }

    pub async fn company_profile(&self, symbol: &str) -> Option<CompanyProfile> {
        let symbol = self.require_symbol(symbol)?;
        let profile: CompanyProfile = self
            .call(
                request_key("profile", &[&symbol]),
                "stock/profile2",
                params([("symbol", json!(symbol))]),
            )
            .await?;

        if profile.is_empty() {
            debug!("No profile data for symbol: {}", symbol);
            return None;
        }
        Some(profile)
    }

    pub async fn company_metrics(&self, symbol: &str) -> Option<CompanyMetrics> {
        let symbol = self.require_symbol(symbol)?;
        self.call(
            request_key("metrics", &[&symbol]),
            "stock/metric",
            params([("symbol", json!(symbol)), ("metric", json!("all"))]),
        )
        .await
    }

    pub async fn company_news(&self, query: &NewsQuery) -> Option<Vec<NewsItem>> {
        let symbol = self.require_symbol(&query.symbol)?;
        let from = query.from.format("%Y-%m-%d").to_string();
        let to = query.to.format("%Y-%m-%d").to_string();
        self.call(
            request_key("news", &[&symbol]),
            "company-news",
            params([
                ("symbol", json!(symbol)),
                ("from", json!(from)),
                ("to", json!(to)),
            ]),
        )
        .await
    }

    /// Market-wide headlines; `min_id` only returns items newer than that id.
    pub async fn market_news(
        &self,
        category: NewsCategory,
        min_id: Option<i64>,
    ) -> Option<Vec<NewsItem>> {
        let mut query = params([("category", json!(category.as_str()))]);
        if let Some(min_id) = min_id {
            query.insert("minId".to_string(), json!(min_id));
        }
        self.call(
            request_key("market-news", &[category.as_str()]),
            "news",
            query,
        )
        .await
    }

    pub async fn news_sentiment(&self, symbol: &str) -> Option<NewsSentiment> {
        let symbol = self.require_symbol(symbol)?;
        self.call(
            request_key("sentiment", &[&symbol]),
            "news-sentiment",
            params([("symbol", json!(symbol))]),
        )
        .await
    }

    /// OHLCV candles between `from` and `to`, sorted ascending.
    pub async fn candles(
        &self,
        symbol: &str,
        resolution: CandleResolution,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Option<Vec<TimeSeriesPoint>> {
        let symbol = self.require_symbol(symbol)?;
        let response: CandleResponse = self
            .call(
                request_key("candles", &[&symbol, resolution.as_str()]),
                "stock/candle",
                params([
                    ("symbol", json!(symbol)),
                    ("resolution", json!(resolution.as_str())),
                    ("from", json!(from.timestamp())),
                    ("to", json!(to.timestamp())),
                ]),
            )
            .await?;

        match response.normalize() {
            Ok(points) => {
                debug!("Finnhub: {} candles for {}", points.len(), symbol);
                Some(points)
            }
            Err(e) => {
                self.report("stock/candle", &e);
                None
            }
        }
    }

    pub async fn search_symbols(&self, query: &str) -> Option<Vec<SymbolMatch>> {
        let query = query.trim();
        if query.is_empty() {
            return Some(Vec::new());
        }

        let response: models::SearchResponse = self
            .call(
                request_key("search", &[query]),
                "search",
                params([("q", json!(query))]),
            )
            .await?;

        Some(response.result.into_iter().map(SymbolMatch::from).collect())
    }

    /// Flags the key, invokes the function and converts failures into a
    /// notification.
    async fn call<T: DeserializeOwned>(
        &self,
        key: String,
        endpoint: &str,
        params: Map<String, Value>,
    ) -> Option<T> {
        let _loading = self.loading.begin(key);

        match self.try_call(endpoint, params).await {
            Ok(value) => Some(value),
            Err(e) => {
                self.report(endpoint, &e);
                None
            }
        }
    }

    async fn try_call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Map<String, Value>,
    ) -> Result<T, MarketDataError> {
        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        let body = json!({ "endpoint": endpoint, "params": params });
        let data = self.functions.invoke(FINNHUB_FUNCTION, body).await?;
        serde_json::from_value(data).map_err(|e| MarketDataError::decode(endpoint, e))
    }

    fn report(&self, endpoint: &str, error: &MarketDataError) {
        warn!("Error calling Finnhub API ({}): {}", endpoint, error);
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

fn params<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
