use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Company profile from the quote provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub ticker: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub country: Option<String>,
    pub ipo: Option<String>,
    /// In millions
    pub market_capitalization: Option<f64>,
    pub share_outstanding: Option<f64>,
    pub weburl: Option<String>,
    pub logo: Option<String>,
    pub finnhub_industry: Option<String>,
}

impl CompanyProfile {
    /// The provider answers `{}` for unknown symbols.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.ticker.is_none()
    }

    pub fn market_cap(&self) -> Option<f64> {
        self.market_capitalization.map(|mc| mc * 1_000_000.0)
    }
}

/// Company fundamentals (`stock/metric` with `metric=all`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyMetrics {
    /// Metric name to value; values can be numbers, strings or null.
    pub metric: HashMap<String, Value>,
    pub metric_type: String,
}

impl CompanyMetrics {
    fn number(&self, name: &str) -> Option<f64> {
        self.metric.get(name).and_then(Value::as_f64)
    }

    pub fn week_52_high(&self) -> Option<f64> {
        self.number("52WeekHigh")
    }

    pub fn week_52_low(&self) -> Option<f64> {
        self.number("52WeekLow")
    }

    pub fn pe_ratio(&self) -> Option<f64> {
        self.number("peBasicExclExtraTTM")
    }

    pub fn eps(&self) -> Option<f64> {
        self.number("epsBasicExclExtraItemsTTM")
    }

    pub fn dividend_yield(&self) -> Option<f64> {
        self.number("dividendYieldIndicatedAnnual")
    }

    pub fn beta(&self) -> Option<f64> {
        self.number("beta")
    }

    pub fn average_volume_10d(&self) -> Option<f64> {
        self.number("10DayAverageTradingVolume")
    }
}
