//! Client for the AI advisor functions.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};
use wisefolio_market_data::{FunctionClient, LoadingMap, Notifier};

use crate::error::AdvisorError;
use crate::sanitize;
use crate::types::{
    AdvisorReply, AnalyzerRequest, JournalFeedback, JournalFeedbackRequest, StockAnalysis,
    UserContext,
};

pub const FINANCIAL_ADVISOR_FUNCTION: &str = "financial-advisor";
pub const STOCK_ANALYZER_FUNCTION: &str = "stock-analyzer";
pub const JOURNAL_FEEDBACK_FUNCTION: &str = "journal-ai-feedback";

/// The analyzer only looks at this many symbols per request.
pub const MAX_ANALYZED_SYMBOLS: usize = 5;

/// Calls the advisor functions and sanitizes what they return.
///
/// Same contract as the market-data adapters: failures become an error
/// notification and `None`.
#[derive(Clone)]
pub struct AdvisorClient {
    functions: Arc<dyn FunctionClient>,
    loading: LoadingMap,
    notifier: Notifier,
}

impl AdvisorClient {
    pub fn new(functions: Arc<dyn FunctionClient>, notifier: Notifier) -> Self {
        Self {
            functions,
            loading: LoadingMap::new(),
            notifier,
        }
    }

    pub fn loading(&self) -> &LoadingMap {
        &self.loading
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Asks the financial advisor a free-form question.
    pub async fn ask(&self, query: &str, context: UserContext) -> Option<AdvisorReply> {
        let result = self.try_ask(query, context).await;
        self.settle("AI Advisor error", result)
    }

    async fn try_ask(&self, query: &str, context: UserContext) -> Result<AdvisorReply, AdvisorError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AdvisorError::invalid_input("Query is required"));
        }

        let body = json!({ "query": query, "userContext": context });
        let answer = self.invoke("advisor", FINANCIAL_ADVISOR_FUNCTION, body).await?;

        let response = answer
            .get("response")
            .and_then(Value::as_str)
            .ok_or_else(|| AdvisorError::malformed("missing 'response' text"))?;

        Ok(AdvisorReply {
            response: response.to_string(),
        })
    }

    /// Runs the stock analyzer over up to five symbols.
    pub async fn analyze_stocks(&self, request: AnalyzerRequest) -> Option<StockAnalysis> {
        let result = self.try_analyze(request).await;
        self.settle("Stock analysis error", result)
    }

    async fn try_analyze(&self, mut request: AnalyzerRequest) -> Result<StockAnalysis, AdvisorError> {
        request.symbols = request
            .symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if request.symbols.is_empty() {
            return Err(AdvisorError::invalid_input(
                "Valid stock symbols array is required",
            ));
        }
        if request.symbols.len() > MAX_ANALYZED_SYMBOLS {
            debug!(
                "Analyzer only considers the first {} of {} symbols",
                MAX_ANALYZED_SYMBOLS,
                request.symbols.len()
            );
            request.symbols.truncate(MAX_ANALYZED_SYMBOLS);
        }

        let body = serde_json::to_value(&request)
            .map_err(|e| AdvisorError::invalid_input(e.to_string()))?;
        let answer = self.invoke("analysis", STOCK_ANALYZER_FUNCTION, body).await?;
        if !answer.is_object() {
            return Err(AdvisorError::malformed("analysis is not a JSON object"));
        }

        Ok(sanitize::stock_analysis(&answer))
    }

    /// Reviews a journal entry and flags likely cognitive biases.
    pub async fn journal_feedback(&self, request: JournalFeedbackRequest) -> Option<JournalFeedback> {
        let result = self.try_journal_feedback(request).await;
        self.settle("Journal feedback error", result)
    }

    async fn try_journal_feedback(
        &self,
        request: JournalFeedbackRequest,
    ) -> Result<JournalFeedback, AdvisorError> {
        if request.journal_content.trim().is_empty() {
            return Err(AdvisorError::invalid_input("Journal content is required"));
        }

        let body = serde_json::to_value(&request)
            .map_err(|e| AdvisorError::invalid_input(e.to_string()))?;
        let answer = self
            .invoke("journal-feedback", JOURNAL_FEEDBACK_FUNCTION, body)
            .await?;

        Ok(sanitize::journal_feedback(&answer))
    }

    async fn invoke(&self, key: &str, function: &str, body: Value) -> Result<Value, AdvisorError> {
        let _loading = self.loading.begin(key);
        debug!("Invoking advisor function {}", function);
        Ok(self.functions.invoke_plain(function, body).await?)
    }

    fn settle<T>(&self, context: &str, result: Result<T, AdvisorError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{} ({}): {}", context, e.code(), e);
                self.notifier.error(format!("{}: {}", context, e));
                None
            }
        }
    }
}
