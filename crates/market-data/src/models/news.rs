use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A news article from the quote provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    #[serde(default)]
    pub category: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub datetime: DateTime<Utc>,
    pub headline: String,
    #[serde(default)]
    pub image: String,
    /// Related symbol(s), comma separated
    #[serde(default)]
    pub related: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub summary: String,
    pub url: String,
}

/// Date window for company news.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewsQuery {
    pub symbol: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl NewsQuery {
    /// News for `symbol` published over the seven days ending today.
    pub fn last_week(symbol: impl Into<String>) -> Self {
        let to = Utc::now().date_naive();
        Self {
            symbol: symbol.into(),
            from: to - Duration::days(7),
            to,
        }
    }
}

/// Market-wide news feeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    #[default]
    General,
    Forex,
    Crypto,
    Merger,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Forex => "forex",
            Self::Crypto => "crypto",
            Self::Merger => "merger",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Buzz {
    pub articles_in_last_week: u32,
    pub buzz: f64,
    pub weekly_average: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SentimentBreakdown {
    pub bearish_percent: f64,
    pub bullish_percent: f64,
}

/// Aggregated news sentiment for a symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSentiment {
    pub symbol: String,
    #[serde(default)]
    pub buzz: Buzz,
    #[serde(default)]
    pub company_news_score: f64,
    #[serde(default)]
    pub sector_average_bullish_percent: f64,
    #[serde(default)]
    pub sector_average_news_score: f64,
    #[serde(default)]
    pub sentiment: SentimentBreakdown,
}

/// Qualitative sentiment label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Bullish,
    Neutral,
    Bearish,
}

impl NewsSentiment {
    /// Buckets the company news score: >= 0.5 bullish, <= -0.3 bearish.
    pub fn label(&self) -> SentimentLabel {
        if self.company_news_score >= 0.5 {
            SentimentLabel::Bullish
        } else if self.company_news_score <= -0.3 {
            SentimentLabel::Bearish
        } else {
            SentimentLabel::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_item_parsing() {
        let json = r#"{
            "category": "company",
            "datetime": 1704067200,
            "headline": "Apple ships things",
            "id": 125,
            "image": "",
            "related": "AAPL",
            "source": "Reuters",
            "summary": "Summary",
            "url": "https://example.test/a"
        }"#;

        let item: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 125);
        assert_eq!(item.datetime.timestamp(), 1704067200);
        assert_eq!(item.related, "AAPL");
    }

    #[test]
    fn test_sentiment_labels() {
        let mut sentiment: NewsSentiment = serde_json::from_str(
            r#"{"symbol": "AAPL", "companyNewsScore": 0.72,
                "sentiment": {"bearishPercent": 0.1, "bullishPercent": 0.9}}"#,
        )
        .unwrap();
        assert_eq!(sentiment.label(), SentimentLabel::Bullish);
        assert_eq!(sentiment.sentiment.bullish_percent, 0.9);

        sentiment.company_news_score = 0.1;
        assert_eq!(sentiment.label(), SentimentLabel::Neutral);

        sentiment.company_news_score = -0.3;
        assert_eq!(sentiment.label(), SentimentLabel::Bearish);
    }

    #[test]
    fn test_last_week_window() {
        let query = NewsQuery::last_week("MSFT");
        assert_eq!(query.to - query.from, Duration::days(7));
    }
}
