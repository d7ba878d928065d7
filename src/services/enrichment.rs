use crate::scoring::{
    urgency_from_confidence, weights::parse_label, Sentiment, DEFAULT_SENTIMENT,
    DEFAULT_URGENCY, KEYWORDS_ERROR, KEYWORDS_NONE,
};
use crate::services::text_analysis::TextAnalyzer;
use std::future::Future;
use std::time::Duration;

/// How a pipeline stage produced its value.
#[derive(Debug, Clone, PartialEq)]
pub enum StageStatus {
    Completed,
    /// The stage failed and its value is a failover default (or partly one).
    Degraded(String),
}

/// A stage value together with the way it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Staged<T> {
    pub value: T,
    pub status: StageStatus,
}

impl<T> Staged<T> {
    pub fn completed(value: T) -> Self {
        Self {
            value,
            status: StageStatus::Completed,
        }
    }

    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            status: StageStatus::Degraded(reason.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, StageStatus::Degraded(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match &self.status {
            StageStatus::Completed => None,
            StageStatus::Degraded(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentSignal {
    /// Label as returned by the provider, not case-normalized.
    pub label: String,
    pub urgency: f64,
}

impl Default for SentimentSignal {
    fn default() -> Self {
        Self {
            label: DEFAULT_SENTIMENT.to_string(),
            urgency: DEFAULT_URGENCY,
        }
    }
}

/// Text signals for one report. Both fields are always populated.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalExtraction {
    pub keywords: Staged<String>,
    pub sentiment: Staged<SentimentSignal>,
}

impl SignalExtraction {
    pub fn is_degraded(&self) -> bool {
        self.keywords.is_degraded() || self.sentiment.is_degraded()
    }
}

/// Run `fut` under `limit`; running out of time is an ordinary failure.
pub(crate) async fn within<T, F>(limit: Duration, what: &str, fut: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("{} timed out after {:?}", what, limit)),
    }
}

/// Derive keywords, sentiment and urgency from a report description.
///
/// Never fails. Each provider call is isolated: a failed key phrase call
/// leaves `error_processing`, a failed sentiment call leaves `neutral` / 0.50,
/// and neither affects the other.
pub async fn extract_signals(
    analyzer: &dyn TextAnalyzer,
    description: &str,
    locale: &str,
    limit: Duration,
) -> SignalExtraction {
    if description.trim().is_empty() {
        return SignalExtraction {
            keywords: Staged::degraded(KEYWORDS_ERROR.to_string(), "description is empty"),
            sentiment: Staged::degraded(SentimentSignal::default(), "description is empty"),
        };
    }

    let keywords = extract_keywords(analyzer, description, locale, limit).await;
    let sentiment = extract_sentiment(analyzer, description, locale, limit).await;

    SignalExtraction {
        keywords,
        sentiment,
    }
}

async fn extract_keywords(
    analyzer: &dyn TextAnalyzer,
    description: &str,
    locale: &str,
    limit: Duration,
) -> Staged<String> {
    let call = analyzer.extract_key_phrases(description, locale);
    match within(limit, "key phrase extraction", call).await {
        Ok(phrases) => Staged::completed(join_key_phrases(&phrases)),
        Err(e) => Staged::degraded(KEYWORDS_ERROR.to_string(), format!("{:#}", e)),
    }
}

async fn extract_sentiment(
    analyzer: &dyn TextAnalyzer,
    description: &str,
    locale: &str,
    limit: Duration,
) -> Staged<SentimentSignal> {
    let call = analyzer.analyze_sentiment(description, locale);
    match within(limit, "sentiment analysis", call).await {
        Ok(analysis) => match analysis.confidence {
            Some(scores) => {
                let urgency = urgency_from_confidence(parse_label::<Sentiment>(&analysis.label), &scores);
                Staged::completed(SentimentSignal {
                    label: analysis.label,
                    urgency,
                })
            }
            None => Staged::degraded(
                SentimentSignal {
                    label: analysis.label,
                    urgency: DEFAULT_URGENCY,
                },
                "sentiment returned without confidence scores",
            ),
        },
        Err(e) => Staged::degraded(SentimentSignal::default(), format!("{:#}", e)),
    }
}

/// `", "`-joined phrases, or the no-keywords sentinel when there are none.
pub fn join_key_phrases(phrases: &[String]) -> String {
    let kept: Vec<&str> = phrases
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();

    if kept.is_empty() {
        KEYWORDS_NONE.to_string()
    } else {
        kept.join(", ")
    }
}
