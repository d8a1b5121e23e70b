//! Finnhub API response models and their normalization.
//!
//! The quote endpoint returns short single-letter keys and may answer `null`
//! (or zeros) for symbols it does not know, so every numeric field is
//! optional here. Candles come back as parallel arrays.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::MarketDataError;
use crate::models::{PriceSnapshot, PriceSource, Quote, SymbolMatch, TimeSeriesPoint};

/// Response from /quote endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinnhubQuote {
    /// Current price
    pub c: Option<f64>,
    /// Change
    pub d: Option<f64>,
    /// Percent change
    pub dp: Option<f64>,
    /// High price of the day
    pub h: Option<f64>,
    /// Low price of the day
    pub l: Option<f64>,
    /// Open price of the day
    pub o: Option<f64>,
    /// Previous close price
    pub pc: Option<f64>,
    /// Timestamp (Unix)
    pub t: Option<i64>,
}

fn decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(|v| Decimal::try_from(v).ok())
}

impl FinnhubQuote {
    /// Price and percent change, when both are present.
    pub fn price_snapshot(&self) -> Option<PriceSnapshot> {
        Some(PriceSnapshot {
            price: decimal(self.c)?,
            percent_change: decimal(self.dp)?,
            source: PriceSource::Finnhub,
        })
    }

    /// Full quote, or `None` if any figure is missing.
    pub fn normalize(&self, symbol: &str) -> Option<Quote> {
        let timestamp = self
            .t
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);

        Some(Quote {
            symbol: symbol.to_string(),
            current_price: decimal(self.c)?,
            change: decimal(self.d)?,
            percent_change: decimal(self.dp)?,
            high: decimal(self.h)?,
            low: decimal(self.l)?,
            open: decimal(self.o)?,
            previous_close: decimal(self.pc)?,
            timestamp,
        })
    }
}

/// Response from /stock/candle endpoint
#[derive(Clone, Debug, Deserialize)]
pub struct CandleResponse {
    /// Status: "ok" or "no_data"
    pub s: String,
    /// Close prices
    #[serde(default)]
    pub c: Vec<f64>,
    /// High prices
    #[serde(default)]
    pub h: Vec<f64>,
    /// Low prices
    #[serde(default)]
    pub l: Vec<f64>,
    /// Open prices
    #[serde(default)]
    pub o: Vec<f64>,
    /// Volume
    #[serde(default)]
    pub v: Vec<f64>,
    /// Timestamps (Unix)
    #[serde(default)]
    pub t: Vec<i64>,
}

impl CandleResponse {
    /// Zips the parallel arrays into points sorted by date.
    ///
    /// `no_data` yields an empty series. Samples with an invalid timestamp or
    /// price are skipped.
    pub fn normalize(&self) -> Result<Vec<TimeSeriesPoint>, MarketDataError> {
        if self.s == "no_data" {
            return Ok(Vec::new());
        }

        if self.s != "ok" {
            return Err(MarketDataError::ProviderError {
                provider: super::PROVIDER_ID.to_string(),
                message: format!("Unexpected candle status: {}", self.s),
            });
        }

        let len = self.t.len();
        if self.c.len() != len || self.o.len() != len || self.h.len() != len || self.l.len() != len
        {
            return Err(MarketDataError::ProviderError {
                provider: super::PROVIDER_ID.to_string(),
                message: "Mismatched array lengths in candle response".to_string(),
            });
        }

        let mut points = Vec::with_capacity(len);
        for i in 0..len {
            let date: DateTime<Utc> = match Utc.timestamp_opt(self.t[i], 0).single() {
                Some(ts) => ts,
                None => {
                    warn!("Invalid timestamp at index {}: {}", i, self.t[i]);
                    continue;
                }
            };

            let values = (
                Decimal::try_from(self.o[i]),
                Decimal::try_from(self.h[i]),
                Decimal::try_from(self.l[i]),
                Decimal::try_from(self.c[i]),
            );
            let (Ok(open), Ok(high), Ok(low), Ok(close)) = values else {
                warn!("Invalid price at index {}", i);
                continue;
            };

            let volume = self
                .v
                .get(i)
                .and_then(|&v| Decimal::try_from(v).ok())
                .unwrap_or(Decimal::ZERO);

            points.push(TimeSeriesPoint {
                date: date.naive_utc(),
                open,
                high,
                low,
                close,
                volume,
            });
        }

        points.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(points)
    }
}

/// Response from /search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result: Vec<SearchItem>,
}

/// Individual search result item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub description: String,
    pub display_symbol: String,
    pub symbol: String,
    #[serde(rename = "type", default)]
    pub security_type: String,
}

impl From<SearchItem> for SymbolMatch {
    fn from(item: SearchItem) -> Self {
        let security_type = map_security_type(&item.security_type);
        SymbolMatch::new(
            item.symbol,
            item.display_symbol,
            item.description,
            security_type,
        )
    }
}

/// Map Finnhub security type to our display type.
pub(crate) fn map_security_type(finnhub_type: &str) -> String {
    match finnhub_type.to_lowercase().as_str() {
        "common stock" | "stock" => "Stock".to_string(),
        "etf" | "etp" => "ETF".to_string(),
        "mutual fund" | "fund" => "Mutual Fund".to_string(),
        "adr" | "american depositary receipt" => "ADR".to_string(),
        "reit" => "REIT".to_string(),
        "preferred stock" | "preferred" => "Preferred Stock".to_string(),
        _ => finnhub_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_parsing_and_normalization() {
        let json = r#"{
            "c": 184.92,
            "d": 1.27,
            "dp": 0.69,
            "h": 186,
            "l": 183,
            "o": 184,
            "pc": 183.65,
            "t": 1704067200
        }"#;

        let raw: FinnhubQuote = serde_json::from_str(json).unwrap();
        let quote = raw.normalize("AAPL").unwrap();
        assert_eq!(quote.current_price, dec!(184.92));
        assert_eq!(quote.percent_change, dec!(0.69));
        assert_eq!(quote.previous_close, dec!(183.65));
        assert_eq!(quote.timestamp.timestamp(), 1704067200);

        let snapshot = raw.price_snapshot().unwrap();
        assert_eq!(snapshot.source, PriceSource::Finnhub);
        assert_eq!(snapshot.price, dec!(184.92));
    }

    #[test]
    fn test_quote_with_nulls_is_incomplete() {
        let raw: FinnhubQuote =
            serde_json::from_str(r#"{"c": null, "dp": null, "d": null}"#).unwrap();
        assert!(raw.price_snapshot().is_none());
        assert!(raw.normalize("XYZ").is_none());
    }

    #[test]
    fn test_quote_missing_percent_change_has_no_snapshot() {
        let raw: FinnhubQuote = serde_json::from_str(r#"{"c": 10.5}"#).unwrap();
        assert!(raw.price_snapshot().is_none());
    }

    #[test]
    fn test_candles_normalize_sorted() {
        let json = r#"{
            "s": "ok",
            "c": [152.0, 150.0, 151.0],
            "h": [153.0, 151.0, 152.0],
            "l": [151.0, 149.0, 150.0],
            "o": [151.5, 149.5, 150.5],
            "v": [1200000, 1000000, 1100000],
            "t": [1704240000, 1704067200, 1704153600]
        }"#;

        let response: CandleResponse = serde_json::from_str(json).unwrap();
        let points = response.normalize().unwrap();
        assert_eq!(points.len(), 3);
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(points[0].close, dec!(150));
        assert_eq!(points[2].volume, dec!(1200000));
    }

    #[test]
    fn test_candles_no_data_is_empty() {
        let response: CandleResponse = serde_json::from_str(r#"{"s": "no_data"}"#).unwrap();
        assert!(response.normalize().unwrap().is_empty());
    }

    #[test]
    fn test_candles_mismatched_arrays() {
        let json = r#"{"s": "ok", "c": [1.0, 2.0], "h": [1.0], "l": [1.0], "o": [1.0], "t": [1, 2]}"#;
        let response: CandleResponse = serde_json::from_str(json).unwrap();
        assert!(response.normalize().is_err());
    }

    #[test]
    fn test_search_item_conversion() {
        let json = r#"{
            "count": 2,
            "result": [
                {"description": "Apple Inc", "displaySymbol": "AAPL", "symbol": "AAPL", "type": "Common Stock"},
                {"description": "Apple Hospitality REIT Inc", "displaySymbol": "APLE", "symbol": "APLE", "type": "REIT"}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let matches: Vec<SymbolMatch> = response.result.into_iter().map(Into::into).collect();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].security_type, "Stock");
        assert_eq!(matches[1].security_type, "REIT");
    }

    #[test]
    fn test_map_security_type() {
        assert_eq!(map_security_type("Common Stock"), "Stock");
        assert_eq!(map_security_type("ETP"), "ETF");
        assert_eq!(map_security_type("Unknown Type"), "Unknown Type");
    }
}
