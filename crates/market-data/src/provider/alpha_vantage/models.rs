//! Alpha Vantage payload shapes and normalization.
//!
//! Time series come back as a map keyed by date string whose values are
//! OHLCV numbers encoded as strings, nested under a label that depends on the
//! requested series (`Time Series (Daily)`, `Weekly Time Series`, ...).
//! Every numeric string is parsed defensively: a value that fails to parse is
//! treated as absent.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::models::{PriceSnapshot, PriceSource, SeriesKind, TimeSeriesPoint};

const ERROR_MESSAGE_KEY: &str = "Error Message";
const NOTE_KEY: &str = "Note";
const INFORMATION_KEY: &str = "Information";

/// Non-fatal message the provider attaches to a payload, usually about rate
/// limits or premium endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advisory {
    Note(String),
    Information(String),
}

impl Advisory {
    /// Reads the first advisory field present in a raw payload.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        if let Some(note) = payload.get(NOTE_KEY).and_then(Value::as_str) {
            return Some(Self::Note(note.to_string()));
        }
        payload
            .get(INFORMATION_KEY)
            .and_then(Value::as_str)
            .map(|info| Self::Information(info.to_string()))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Note(message) | Self::Information(message) => message,
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        let message = self.message();
        message.contains("API call frequency") || message.contains("rate limit")
    }
}

/// Explicit API error carried in an otherwise successful payload.
pub fn error_message(payload: &Value) -> Option<&str> {
    payload.get(ERROR_MESSAGE_KEY).and_then(Value::as_str)
}

/// One bar as the provider encodes it.
#[derive(Debug, Deserialize)]
struct RawBar {
    #[serde(rename = "1. open")]
    open: Option<String>,
    #[serde(rename = "2. high")]
    high: Option<String>,
    #[serde(rename = "3. low")]
    low: Option<String>,
    #[serde(rename = "4. close")]
    close: Option<String>,
    #[serde(rename = "5. volume")]
    volume: Option<String>,
}

/// Parses a provider number string, ignoring placeholders like `None` or `-`.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "None" || trimmed == "-" {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Parses `2024-01-05` or `2024-01-05 16:00:00`.
pub fn parse_series_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl RawBar {
    fn to_point(&self, date: NaiveDateTime) -> Option<TimeSeriesPoint> {
        let field = |v: &Option<String>| v.as_deref().and_then(parse_decimal);
        Some(TimeSeriesPoint {
            date,
            open: field(&self.open)?,
            high: field(&self.high)?,
            low: field(&self.low)?,
            close: field(&self.close)?,
            volume: field(&self.volume)?,
        })
    }
}

/// Converts the series nested under `kind`'s label into points sorted by date.
///
/// A missing label (including payloads that only carry an advisory) yields an
/// empty series. Entries with an unparseable date or number are skipped.
pub fn normalize_series(kind: SeriesKind, payload: &Value) -> Vec<TimeSeriesPoint> {
    let label = kind.series_label();
    let Some(raw) = payload.get(&label) else {
        return Vec::new();
    };

    let bars: HashMap<String, RawBar> = match serde_json::from_value(raw.clone()) {
        Ok(bars) => bars,
        Err(e) => {
            warn!("Malformed '{}' payload: {}", label, e);
            return Vec::new();
        }
    };

    let mut points: Vec<TimeSeriesPoint> = bars
        .iter()
        .filter_map(|(date_str, bar)| {
            let point = parse_series_date(date_str).and_then(|date| bar.to_point(date));
            if point.is_none() {
                warn!("Skipping unparseable '{}' entry for {}", label, date_str);
            }
            point
        })
        .collect();

    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

/// GLOBAL_QUOTE record; the provider encodes every field as a string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "02. open")]
    pub open: Option<String>,
    #[serde(rename = "03. high")]
    pub high: Option<String>,
    #[serde(rename = "04. low")]
    pub low: Option<String>,
    #[serde(rename = "05. price")]
    pub price: Option<String>,
    #[serde(rename = "06. volume")]
    pub volume: Option<String>,
    #[serde(rename = "07. latest trading day")]
    pub latest_trading_day: Option<String>,
    #[serde(rename = "08. previous close")]
    pub previous_close: Option<String>,
    #[serde(rename = "09. change")]
    pub change: Option<String>,
    #[serde(rename = "10. change percent")]
    pub change_percent: Option<String>,
}

impl GlobalQuote {
    /// Pulls the record out of `{"Global Quote": {...}}`.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let raw = payload.get("Global Quote")?;
        serde_json::from_value(raw.clone()).ok()
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price.as_deref().and_then(parse_decimal)
    }

    /// Percent change with the trailing `%` stripped (`"1.50%"` -> `1.50`).
    pub fn percent_change(&self) -> Option<Decimal> {
        self.change_percent
            .as_deref()
            .map(|s| s.trim().trim_end_matches('%'))
            .and_then(parse_decimal)
    }

    pub fn price_snapshot(&self) -> Option<PriceSnapshot> {
        Some(PriceSnapshot {
            price: self.price()?,
            percent_change: self.percent_change()?,
            source: PriceSource::AlphaVantage,
        })
    }
}
