use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use wisefolio_market_data::upstream::{AlphaVantageUpstream, FinnhubUpstream, UpstreamApi};

use crate::config::Config;

/// Upstream clients keyed by provider. `None` means the API key was not
/// configured; requests for that provider fail with a 500.
#[derive(Clone, Default)]
pub struct AppState {
    pub finnhub: Option<Arc<dyn UpstreamApi>>,
    pub alpha_vantage: Option<Arc<dyn UpstreamApi>>,
}

pub fn init_tracing() {
    let log_format = std::env::var("WF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> Arc<AppState> {
    let finnhub = config.finnhub_api_key.clone().map(|key| {
        Arc::new(FinnhubUpstream::new(key)) as Arc<dyn UpstreamApi>
    });
    let alpha_vantage = config.alpha_vantage_api_key.clone().map(|key| {
        Arc::new(AlphaVantageUpstream::new(key)) as Arc<dyn UpstreamApi>
    });

    if finnhub.is_none() {
        tracing::warn!("FINNHUB_API_KEY is not set; Finnhub requests will fail");
    }
    if alpha_vantage.is_none() {
        tracing::warn!("ALPHA_VANTAGE_API_KEY is not set; Alpha Vantage requests will fail");
    }

    Arc::new(AppState {
        finnhub,
        alpha_vantage,
    })
}
