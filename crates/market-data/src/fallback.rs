//! Price resolution with provider fallback.
//!
//! A lightweight price row needs two figures: the last price and the percent
//! change. The resolver asks each feed in order and stops at the first one
//! that produces both. A feed that answers with gaps is treated exactly like
//! a feed that failed, so callers get either a complete snapshot or
//! [`PriceLookup::Unavailable`], never a record with a missing number.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::models::{PriceLookup, PriceSnapshot};
use crate::provider::alpha_vantage::AlphaVantageClient;
use crate::provider::finnhub::FinnhubClient;

/// Something that can produce a price snapshot for a symbol.
///
/// `None` covers both a failed call and an incomplete answer.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    fn name(&self) -> &'static str;

    async fn price_snapshot(&self, symbol: &str) -> Option<PriceSnapshot>;
}

#[async_trait]
impl PriceFeed for FinnhubClient {
    fn name(&self) -> &'static str {
        "finnhub"
    }

    async fn price_snapshot(&self, symbol: &str) -> Option<PriceSnapshot> {
        self.quote(symbol).await?.price_snapshot()
    }
}

#[async_trait]
impl PriceFeed for AlphaVantageClient {
    fn name(&self) -> &'static str {
        "alphavantage"
    }

    async fn price_snapshot(&self, symbol: &str) -> Option<PriceSnapshot> {
        self.global_quote(symbol).await?.price_snapshot()
    }
}

/// Tries price feeds in order until one yields a complete snapshot.
#[derive(Clone)]
pub struct PriceResolver {
    feeds: Vec<Arc<dyn PriceFeed>>,
}

impl PriceResolver {
    /// Finnhub first, Alpha Vantage as the fallback.
    pub fn new(finnhub: FinnhubClient, alpha_vantage: AlphaVantageClient) -> Self {
        Self::with_feeds(vec![Arc::new(finnhub), Arc::new(alpha_vantage)])
    }

    pub fn with_feeds(feeds: Vec<Arc<dyn PriceFeed>>) -> Self {
        Self { feeds }
    }

    pub async fn resolve(&self, symbol: &str) -> PriceLookup {
        for feed in &self.feeds {
            match feed.price_snapshot(symbol).await {
                Some(snapshot) => {
                    debug!("Resolved {} price from {}", symbol, feed.name());
                    return PriceLookup::Available(snapshot);
                }
                None => {
                    debug!("{} had no usable price for {}", feed.name(), symbol);
                }
            }
        }

        warn!("No price data available for {}", symbol);
        PriceLookup::Unavailable
    }

    /// Resolves every symbol concurrently; results follow input order.
    pub async fn resolve_many<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<PriceLookup> {
        join_all(symbols.iter().map(|s| self.resolve(s.as_ref()))).await
    }
}
