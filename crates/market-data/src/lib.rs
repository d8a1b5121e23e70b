//! Wisefolio Market Data Crate
//!
//! This crate reconciles data from two market-data providers into one stock
//! model for the Wisefolio application.
//!
//! # Overview
//!
//! - Finnhub: quotes, candles, company profile and metrics, news, sentiment,
//!   symbol search
//! - Alpha Vantage: intraday, daily, weekly and monthly time series, global
//!   quote
//! - Per-request loading flags and failure notifications
//! - Price resolution that falls back from Finnhub to Alpha Vantage
//! - Debounced symbol search and periodic quote polling
//! - A bounded watchlist and a portfolio growth simulator
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +-------------------+
//! |   View / caller  | --> |  FinnhubClient /  |  (loading keys, notifications)
//! +------------------+     | AlphaVantageClient|
//!                          +-------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  FunctionClient  |  (POST {functions_url}/{name})
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   proxy server   |  (holds API keys, upstream/)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  Provider APIs   |
//!                          +------------------+
//! ```
//!
//! Adapters never return errors. A failed call yields `None` and publishes a
//! [`Notification`] on the adapter's [`Notifier`].

pub mod config;
pub mod display;
pub mod errors;
pub mod fallback;
pub mod loading;
pub mod models;
pub mod notify;
pub mod overview;
pub mod poller;
pub mod provider;
pub mod search;
pub mod simulator;
pub mod upstream;
pub mod watchlist;

pub use config::ClientSettings;
pub use errors::MarketDataError;
pub use fallback::{PriceFeed, PriceResolver};
pub use loading::{request_key, LoadingGuard, LoadingMap, LoadingSnapshot};
pub use models::{
    CandleResolution, CompanyMetrics, CompanyProfile, IntradayInterval, NewsCategory, NewsItem,
    NewsQuery, NewsSentiment, OutputSize, PriceLookup, PriceSnapshot, PriceSource, Quote,
    SeriesKind, SymbolMatch, TimeSeriesPoint,
};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use overview::MarketOverview;
pub use poller::{QuotePoller, StockSnapshot};
pub use provider::alpha_vantage::AlphaVantageClient;
pub use provider::finnhub::FinnhubClient;
pub use provider::{FunctionClient, HttpFunctionClient};
pub use search::{SearchDebouncer, SearchState, SymbolSearch};
pub use simulator::{
    simulate, simulate_with, Holding, RiskProfile, SimulationParams, SimulationPeriod,
    SimulationResult,
};
pub use watchlist::{Watchlist, WatchlistState};
