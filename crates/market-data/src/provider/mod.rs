//! Provider adapters and the transport they share.
//!
//! This module contains:
//! - The `FunctionClient` trait, the seam between adapters and the proxy functions
//! - `HttpFunctionClient`, the reqwest-backed transport
//! - The Finnhub and Alpha Vantage adapters
//!
//! Adapters never see provider API keys. They post a JSON body to a named
//! proxy function and receive a `{data}` or `{error}` envelope back.

mod http;
mod traits;

pub mod alpha_vantage;
pub mod finnhub;

// Re-exports
pub use http::HttpFunctionClient;
pub use traits::{FunctionClient, FunctionEnvelope, ALPHA_VANTAGE_FUNCTION, FINNHUB_FUNCTION};
