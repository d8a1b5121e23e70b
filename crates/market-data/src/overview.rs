//! Dashboard market overview.

use futures::future::join_all;
use tracing::debug;

use crate::models::Quote;
use crate::provider::finnhub::FinnhubClient;

/// ETFs standing in for the S&P 500, Nasdaq 100 and Dow.
pub const DEFAULT_INDEX_SYMBOLS: [&str; 3] = ["SPY", "QQQ", "DIA"];

#[derive(Clone)]
pub struct MarketOverview {
    client: FinnhubClient,
    symbols: Vec<String>,
}

impl MarketOverview {
    pub fn new(client: FinnhubClient) -> Self {
        Self::with_symbols(client, DEFAULT_INDEX_SYMBOLS.iter().map(|s| s.to_string()))
    }

    pub fn with_symbols(client: FinnhubClient, symbols: impl IntoIterator<Item = String>) -> Self {
        Self {
            client,
            symbols: symbols.into_iter().collect(),
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Quotes for every index symbol, fetched concurrently.
    ///
    /// Symbols that fail or come back incomplete are left out; the rest keep
    /// their configured order.
    pub async fn indices(&self) -> Vec<Quote> {
        let quotes = join_all(self.symbols.iter().map(|s| self.client.latest_quote(s))).await;
        let resolved: Vec<Quote> = quotes.into_iter().flatten().collect();
        debug!(
            "Market overview resolved {}/{} indices",
            resolved.len(),
            self.symbols.len()
        );
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MarketDataError;
    use crate::notify::Notifier;
    use crate::provider::finnhub::tests::MockFunctions;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[tokio::test]
    async fn test_indices_skip_failures_and_keep_order() {
        let mock = MockFunctions::new(vec![
            Ok(json!({"c": 470.1, "d": 2.0, "dp": 0.43, "h": 471, "l": 466, "o": 467, "pc": 468.1, "t": 1704067200})),
            Err(MarketDataError::Transport("connection reset".to_string())),
            Ok(json!({"c": 376.5, "d": -1.0, "dp": -0.26, "h": 378, "l": 375, "o": 377, "pc": 377.5, "t": 1704067200})),
        ]);
        let client = FinnhubClient::new(mock.clone(), Notifier::default());
        let overview = MarketOverview::new(client);

        let quotes = overview.indices().await;
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].symbol, "SPY");
        assert_eq!(quotes[1].symbol, "DIA");
        assert_eq!(quotes[1].percent_change, dec!(-0.26));
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_custom_symbols() {
        let mock = MockFunctions::new(vec![Ok(json!({"c": null}))]);
        let client = FinnhubClient::new(mock, Notifier::default());
        let overview = MarketOverview::with_symbols(client, vec!["IWM".to_string()]);

        assert_eq!(overview.symbols(), ["IWM".to_string()]);
        assert!(overview.indices().await.is_empty());
    }
}
