//! Wisefolio advisor clients.
//!
//! Typed access to the AI proxy functions:
//! - `financial-advisor`: free-form questions with user context
//! - `stock-analyzer`: structured buy/hold/sell recommendations
//! - `journal-ai-feedback`: feedback and bias detection for journal entries
//!
//! Prompting and model calls happen server-side. This crate only shapes the
//! requests and sanitizes the structured answers.

mod client;
mod error;
pub mod sanitize;
pub mod types;

pub use client::{
    AdvisorClient, FINANCIAL_ADVISOR_FUNCTION, JOURNAL_FEEDBACK_FUNCTION, MAX_ANALYZED_SYMBOLS,
    STOCK_ANALYZER_FUNCTION,
};
pub use error::AdvisorError;
pub use types::{
    Action, AdvisorReply, AnalysisSummary, AnalyzerRequest, Bias, JournalFeedback,
    JournalFeedbackRequest, JournalSentiment, Recommendation, RiskLevel, StockAnalysis, TimeFrame,
    UserContext,
};
