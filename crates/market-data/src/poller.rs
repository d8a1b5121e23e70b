//! Periodic quote refresh for a single symbol.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ClientSettings;
use crate::models::{CompanyMetrics, CompanyProfile, Quote};
use crate::provider::finnhub::FinnhubClient;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What a stock detail view shows. Profile and metrics are fetched once;
/// the quote is refreshed every tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub symbol: String,
    pub quote: Option<Quote>,
    pub profile: Option<CompanyProfile>,
    pub metrics: Option<CompanyMetrics>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Background task that keeps a [`StockSnapshot`] fresh.
///
/// Stops on [`QuotePoller::stop`] or when dropped. A request still in flight
/// at that point is abandoned and its result never published.
pub struct QuotePoller {
    snapshot: watch::Receiver<StockSnapshot>,
    cancel: CancellationToken,
}

impl QuotePoller {
    pub fn spawn(client: FinnhubClient, symbol: impl Into<String>, interval: Duration) -> Self {
        let symbol = symbol.into().trim().to_uppercase();
        let (tx, snapshot) = watch::channel(StockSnapshot {
            symbol: symbol.clone(),
            ..StockSnapshot::default()
        });
        let cancel = CancellationToken::new();

        tokio::spawn(poll_loop(
            client,
            symbol,
            interval.max(MIN_POLL_INTERVAL),
            tx,
            cancel.clone(),
        ));

        Self { snapshot, cancel }
    }

    pub fn from_settings(
        client: FinnhubClient,
        symbol: impl Into<String>,
        settings: &ClientSettings,
    ) -> Self {
        Self::spawn(client, symbol, settings.poll_interval)
    }

    pub fn subscribe(&self) -> watch::Receiver<StockSnapshot> {
        self.snapshot.clone()
    }

    pub fn latest(&self) -> StockSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for QuotePoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    client: FinnhubClient,
    symbol: String,
    period: Duration,
    tx: watch::Sender<StockSnapshot>,
    cancel: CancellationToken,
) {
    debug!("Quote poller for {} started ({:?})", symbol, period);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let needs_profile = tx.borrow().profile.is_none();
        let needs_metrics = tx.borrow().metrics.is_none();

        let refresh = async {
            let quote = client.latest_quote(&symbol).await;
            let profile = if needs_profile {
                client.company_profile(&symbol).await
            } else {
                None
            };
            let metrics = if needs_metrics {
                client.company_metrics(&symbol).await
            } else {
                None
            };
            (quote, profile, metrics)
        };

        let (quote, profile, metrics) = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            fetched = refresh => fetched,
        };

        if cancel.is_cancelled() {
            break;
        }

        tx.send_modify(|snapshot| {
            // Keep the last good quote if this tick failed.
            if quote.is_some() {
                snapshot.quote = quote;
                snapshot.updated_at = Some(Utc::now());
            }
            if profile.is_some() {
                snapshot.profile = profile;
            }
            if metrics.is_some() {
                snapshot.metrics = metrics;
            }
        });
    }

    debug!("Quote poller for {} stopped", symbol);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MarketDataError;
    use crate::notify::Notifier;
    use crate::provider::finnhub::tests::MockFunctions;
    use crate::provider::FunctionClient;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn quote(price: f64) -> Result<Value, MarketDataError> {
        Ok(json!({
            "c": price, "d": 1.0, "dp": 0.5, "h": price, "l": price, "o": price, "pc": price - 1.0, "t": 1704067200
        }))
    }

    async fn advance(secs: u64) {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_quote_and_fetches_profile_once() {
        let mock = MockFunctions::new(vec![
            quote(184.0),
            Ok(json!({ "name": "Apple Inc", "ticker": "AAPL" })),
            Ok(json!({ "metric": { "beta": 1.2 }, "metricType": "all" })),
            quote(185.5),
        ]);
        let client = FinnhubClient::new(mock.clone(), Notifier::default());
        let poller = QuotePoller::spawn(client, "aapl", DEFAULT_POLL_INTERVAL);

        advance(1).await;
        let first = poller.latest();
        assert_eq!(first.symbol, "AAPL");
        assert_eq!(first.quote.unwrap().current_price, dec!(184));
        assert_eq!(first.profile.unwrap().name.as_deref(), Some("Apple Inc"));
        assert_eq!(first.metrics.unwrap().beta(), Some(1.2));
        assert_eq!(mock.call_count(), 3);

        advance(60).await;
        assert_eq!(
            poller.latest().quote.unwrap().current_price,
            dec!(185.5)
        );
        assert_eq!(mock.call_count(), 4);

        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls[3].1["endpoint"], "quote");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_keeps_last_quote() {
        let mock = MockFunctions::new(vec![
            quote(50.0),
            Ok(json!({ "name": "Example Corp" })),
            Ok(json!({ "metric": {} })),
            Err(MarketDataError::Transport("timeout".to_string())),
        ]);
        let client = FinnhubClient::new(mock, Notifier::default());
        let poller = QuotePoller::spawn(client, "EXM", Duration::from_secs(30));

        advance(31).await;
        let snapshot = poller.latest();
        assert_eq!(snapshot.quote.unwrap().current_price, dec!(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_polling() {
        let mock = MockFunctions::new(vec![
            quote(10.0),
            Ok(json!({ "name": "Ten" })),
            Ok(json!({ "metric": {} })),
        ]);
        let client = FinnhubClient::new(mock.clone(), Notifier::default());
        let poller = QuotePoller::spawn(client, "TEN", Duration::from_secs(10));

        advance(1).await;
        poller.stop();
        advance(100).await;

        assert_eq!(mock.call_count(), 3);
    }

    /// Answers every call after a long delay.
    struct SlowFunctions;

    #[async_trait]
    impl FunctionClient for SlowFunctions {
        async fn invoke(&self, _function: &str, _body: Value) -> Result<Value, MarketDataError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            quote(99.0)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_result_discarded_after_drop() {
        let client = FinnhubClient::new(Arc::new(SlowFunctions), Notifier::default());
        let poller = QuotePoller::spawn(client, "SLOW", DEFAULT_POLL_INTERVAL);
        let mut rx = poller.subscribe();

        advance(1).await;
        drop(poller);
        advance(30).await;

        assert!(rx.borrow_and_update().quote.is_none());
    }
}
