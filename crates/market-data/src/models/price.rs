use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which provider answered a price lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Finnhub,
    #[serde(rename = "alphavantage")]
    AlphaVantage,
}

/// Price and percent change for a lightweight display row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    pub price: Decimal,
    pub percent_change: Decimal,
    pub source: PriceSource,
}

/// Outcome of resolving a price across providers.
///
/// Either a fully populated snapshot or nothing at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PriceLookup {
    Available(PriceSnapshot),
    Unavailable,
}

impl PriceLookup {
    pub fn snapshot(&self) -> Option<&PriceSnapshot> {
        match self {
            Self::Available(snapshot) => Some(snapshot),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_source_serializes_like_the_ui_expects() {
        assert_eq!(
            serde_json::to_string(&PriceSource::AlphaVantage).unwrap(),
            "\"alphavantage\""
        );
        assert_eq!(
            serde_json::to_string(&PriceSource::Finnhub).unwrap(),
            "\"finnhub\""
        );
    }

    #[test]
    fn test_lookup_accessors() {
        let lookup = PriceLookup::Available(PriceSnapshot {
            price: dec!(12.34),
            percent_change: dec!(1.50),
            source: PriceSource::AlphaVantage,
        });
        assert!(lookup.is_available());
        assert_eq!(lookup.snapshot().unwrap().price, dec!(12.34));
        assert!(PriceLookup::Unavailable.snapshot().is_none());
    }
}
