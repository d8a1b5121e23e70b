//! Allow-list sanitization of AI-structured answers.
//!
//! The analyzer's JSON comes from a language model, so any field may be
//! missing, mistyped or outside its vocabulary. Each field is checked on its
//! own and replaced by a default when it does not fit; one bad field never
//! throws away the rest of the answer.

use serde_json::Value;
use tracing::debug;

use crate::types::{
    Action, AnalysisSummary, Bias, JournalFeedback, Recommendation, RiskLevel, StockAnalysis,
    TimeFrame,
};

const UNKNOWN: &str = "Unknown";
const UNKNOWN_COMPANY: &str = "Unknown Company";
const ANALYSIS_UNAVAILABLE: &str = "Analysis unavailable";
const OUTLOOK_UNAVAILABLE: &str = "Market outlook unavailable";
const RISK_UNAVAILABLE: &str = "Risk assessment unavailable";
const RATIONALE_UNAVAILABLE: &str = "No rationale provided";
const FEEDBACK_UNAVAILABLE: &str = "Feedback unavailable";

fn text(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn text_or(value: &Value, key: &str, default: &str) -> String {
    text(value, key).unwrap_or_else(|| default.to_string())
}

/// Finite number, or a numeric string such as `"12.5"` or `"12.5%"`.
fn number(value: &Value, key: &str) -> f64 {
    let parsed = match value.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

fn vocabulary(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_lowercase())
}

pub fn action(value: &Value, key: &str) -> Action {
    match vocabulary(value, key).as_deref() {
        Some("buy") => Action::Buy,
        Some("sell") => Action::Sell,
        Some("hold") => Action::Hold,
        other => {
            debug!("Unrecognized action {:?}, defaulting to hold", other);
            Action::default()
        }
    }
}

pub fn risk_level(value: &Value, key: &str) -> RiskLevel {
    match vocabulary(value, key).as_deref() {
        Some("low") => RiskLevel::Low,
        Some("high") => RiskLevel::High,
        _ => RiskLevel::default(),
    }
}

pub fn time_frame(value: &Value, key: &str) -> TimeFrame {
    match vocabulary(value, key).as_deref() {
        Some("short") => TimeFrame::Short,
        Some("long") => TimeFrame::Long,
        _ => TimeFrame::default(),
    }
}

fn recommendation(value: &Value) -> Recommendation {
    Recommendation {
        symbol: text(value, "symbol")
            .map(|s| s.to_uppercase())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        name: text_or(value, "name", UNKNOWN_COMPANY),
        action: action(value, "action"),
        allocation: number(value, "allocation"),
        rationale: text_or(value, "rationale", RATIONALE_UNAVAILABLE),
        risk_level: risk_level(value, "riskLevel"),
        time_frame: time_frame(value, "timeFrame"),
        potential_return: number(value, "potentialReturn"),
    }
}

/// Builds a [`StockAnalysis`] from the analyzer body
/// `{stockData, analysis: {analysis: {...}, recommendations: [...]}}`.
///
/// A body that is just the inner `{analysis, recommendations}` object is
/// accepted too.
pub fn stock_analysis(body: &Value) -> StockAnalysis {
    let result = match body.get("analysis") {
        Some(inner) if inner.get("recommendations").is_some() || inner.get("analysis").is_some() => {
            inner
        }
        _ => body,
    };

    let summary = result.get("analysis").unwrap_or(&Value::Null);
    let analysis = AnalysisSummary {
        summary: text_or(summary, "summary", ANALYSIS_UNAVAILABLE),
        market_outlook: text_or(summary, "marketOutlook", OUTLOOK_UNAVAILABLE),
        risk_assessment: text_or(summary, "riskAssessment", RISK_UNAVAILABLE),
    };

    let recommendations = result
        .get("recommendations")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|v| v.is_object()).map(recommendation).collect())
        .unwrap_or_default();

    let stock_data = body
        .get("stockData")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    StockAnalysis {
        analysis,
        recommendations,
        stock_data,
    }
}

/// Builds [`JournalFeedback`]; biases without a name are dropped.
pub fn journal_feedback(body: &Value) -> JournalFeedback {
    let biases = body
        .get("biases")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let name = text(item, "name")?;
                    Some(Bias {
                        name,
                        description: text(item, "description").unwrap_or_default(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    JournalFeedback {
        ai_feedback: text_or(body, "aiFeedback", FEEDBACK_UNAVAILABLE),
        biases,
    }
}
