//! Market data models
//!
//! This module contains the normalized data types the adapters produce:
//! - `quote` - Current quote snapshot (Quote)
//! - `time_series` - OHLCV points and the series/interval sum types
//! - `price` - Mini price widget result (PriceSnapshot, PriceLookup)
//! - `news` - Company and market news, news sentiment
//! - `company` - Company profile and metrics
//! - `search` - Symbol search matches

mod company;
mod news;
mod price;
mod quote;
mod search;
mod time_series;

pub use company::{CompanyMetrics, CompanyProfile};
pub use news::{
    Buzz, NewsCategory, NewsItem, NewsQuery, NewsSentiment, SentimentBreakdown, SentimentLabel,
};
pub use price::{PriceLookup, PriceSnapshot, PriceSource};
pub use quote::Quote;
pub use search::SymbolMatch;
pub use time_series::{CandleResolution, IntradayInterval, OutputSize, SeriesKind, TimeSeriesPoint};
