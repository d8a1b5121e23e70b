use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snapshot of a symbol's current price and day range.
///
/// Produced fresh on every poll and owned by whoever requested it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,

    /// Current/last traded price
    pub current_price: Decimal,

    /// Absolute change since previous close
    pub change: Decimal,

    /// Percent change since previous close (1.5 means 1.5%)
    pub percent_change: Decimal,

    pub high: Decimal,
    pub low: Decimal,
    pub open: Decimal,
    pub previous_close: Decimal,

    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// True when the price moved up or stayed flat.
    pub fn is_up(&self) -> bool {
        !self.change.is_sign_negative()
    }
}
