//! Search result models for symbol lookup.

use serde::{Deserialize, Serialize};

/// Result from a ticker/symbol search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolMatch {
    /// Symbol for API calls (e.g., "AAPL", "SHOP.TO")
    pub symbol: String,

    /// Symbol shown to the user
    pub display_symbol: String,

    /// Company or fund name (e.g., "Apple Inc")
    pub description: String,

    /// Normalized security type (e.g., "Stock", "ETF")
    pub security_type: String,
}

impl SymbolMatch {
    pub fn new(
        symbol: impl Into<String>,
        display_symbol: impl Into<String>,
        description: impl Into<String>,
        security_type: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            display_symbol: display_symbol.into(),
            description: description.into(),
            security_type: security_type.into(),
        }
    }
}
