//! Request and answer types for the advisor functions.
//!
//! - Requests: UserContext, AnalyzerRequest, JournalFeedbackRequest
//! - Answers: AdvisorReply, StockAnalysis, JournalFeedback
//! - Closed vocabularies: Action, RiskLevel, TimeFrame, JournalSentiment

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Vocabularies
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    #[default]
    Hold,
    Sell,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Short,
    #[default]
    Medium,
    Long,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalSentiment {
    Bullish,
    Bearish,
    Neutral,
}

// ============================================================================
// Financial advisor
// ============================================================================

/// What the advisor knows about the user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tolerance: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub investment_goals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_horizon: Option<TimeFrame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_size: Option<f64>,
    /// Free-form extras forwarded as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvisorReply {
    pub response: String,
}

// ============================================================================
// Stock analyzer
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerRequest {
    pub symbols: Vec<String>,
    pub risk_level: RiskLevel,
    pub investment_amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub summary: String,
    pub market_outlook: String,
    pub risk_assessment: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub symbol: String,
    pub name: String,
    pub action: Action,
    /// Percent of the investment amount.
    pub allocation: f64,
    pub rationale: String,
    pub risk_level: RiskLevel,
    pub time_frame: TimeFrame,
    /// Estimated annual return, percent.
    pub potential_return: f64,
}

/// Sanitized stock-analyzer answer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub analysis: AnalysisSummary,
    pub recommendations: Vec<Recommendation>,
    /// Quote records the analysis was based on, passed through untouched.
    pub stock_data: Vec<Value>,
}

// ============================================================================
// Journal feedback
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalFeedbackRequest {
    pub journal_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<JournalSentiment>,
    #[serde(default)]
    pub stocks: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bias {
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalFeedback {
    pub ai_feedback: String,
    pub biases: Vec<Bias>,
}
