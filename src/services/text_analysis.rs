use crate::config::analysis::TextAnalysisConfig;
use crate::scoring::ConfidenceScores;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Sentiment label plus the confidence the provider attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentAnalysis {
    pub label: String,
    pub confidence: Option<ConfidenceScores>,
}

/// External text-analysis capability.
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    fn provider(&self) -> &str;

    /// Key phrases found in `text`. An empty list means the analysis ran and found nothing.
    async fn extract_key_phrases(&self, text: &str, locale: &str) -> Result<Vec<String>>;

    async fn analyze_sentiment(&self, text: &str, locale: &str) -> Result<SentimentAnalysis>;
}

/// Stand-in used when no provider is configured: every call fails, so every
/// report degrades to the failover signals.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredAnalyzer;

#[async_trait]
impl TextAnalyzer for UnconfiguredAnalyzer {
    fn provider(&self) -> &str {
        "unconfigured"
    }

    async fn extract_key_phrases(&self, _text: &str, _locale: &str) -> Result<Vec<String>> {
        anyhow::bail!("text analysis provider is not configured")
    }

    async fn analyze_sentiment(&self, _text: &str, _locale: &str) -> Result<SentimentAnalysis> {
        anyhow::bail!("text analysis provider is not configured")
    }
}

/// Client for the cloud language service `analyze-text` REST endpoint.
#[derive(Clone)]
pub struct LanguageServiceAnalyzer {
    endpoint: String,
    api_key: String,
    api_version: String,
    client: Client,
}

impl LanguageServiceAnalyzer {
    pub fn new(config: &TextAnalysisConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
            client,
        })
    }

    async fn call_api<D: for<'de> Deserialize<'de>>(
        &self,
        kind: &'static str,
        text: &str,
        locale: &str,
    ) -> Result<AnalyzeResults<D>> {
        let req = AnalyzeTextRequest {
            kind,
            analysis_input: AnalysisInput {
                documents: vec![InputDocument {
                    id: DOCUMENT_ID,
                    language: locale,
                    text,
                }],
            },
        };

        tracing::debug!(kind, text_length = text.len(), "Calling language service");

        let resp = self
            .client
            .post(format!("{}/language/:analyze-text", self.endpoint))
            .query(&[("api-version", self.api_version.as_str())])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&req)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to language service", kind))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, kind, "Language service request failed");
            anyhow::bail!("Language service error {}: {}", status, body);
        }

        let parsed: AnalyzeTextResponse<D> = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", kind))?;
        Ok(parsed.results)
    }
}

#[async_trait]
impl TextAnalyzer for LanguageServiceAnalyzer {
    fn provider(&self) -> &str {
        "language-service"
    }

    async fn extract_key_phrases(&self, text: &str, locale: &str) -> Result<Vec<String>> {
        let results = self
            .call_api::<KeyPhraseDocument>("KeyPhraseExtraction", text, locale)
            .await?;
        Ok(key_phrases_from(results))
    }

    async fn analyze_sentiment(&self, text: &str, locale: &str) -> Result<SentimentAnalysis> {
        let results = self
            .call_api::<SentimentDocument>("SentimentAnalysis", text, locale)
            .await?;
        sentiment_from(results)
    }
}

const DOCUMENT_ID: &str = "1";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeTextRequest<'a> {
    kind: &'static str,
    analysis_input: AnalysisInput<'a>,
}

#[derive(Serialize)]
struct AnalysisInput<'a> {
    documents: Vec<InputDocument<'a>>,
}

#[derive(Serialize)]
struct InputDocument<'a> {
    id: &'a str,
    language: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeTextResponse<D> {
    results: AnalyzeResults<D>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResults<D> {
    #[serde(default = "Vec::new")]
    documents: Vec<D>,
    #[serde(default)]
    errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
struct DocumentError {
    id: String,
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyPhraseDocument {
    id: String,
    #[serde(default)]
    key_phrases: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentimentDocument {
    id: String,
    sentiment: Option<String>,
    confidence_scores: Option<ConfidenceScores>,
}

fn document_error(errors: &[DocumentError]) -> Option<&ErrorDetail> {
    errors.iter().find(|e| e.id == DOCUMENT_ID).map(|e| &e.error)
}

// A rejected document still counts as a completed analysis with no phrases.
fn key_phrases_from(results: AnalyzeResults<KeyPhraseDocument>) -> Vec<String> {
    if let Some(err) = document_error(&results.errors) {
        tracing::warn!(code = %err.code, message = %err.message, "Key phrase extraction rejected document");
        return Vec::new();
    }

    results
        .documents
        .into_iter()
        .find(|d| d.id == DOCUMENT_ID)
        .map(|d| d.key_phrases)
        .unwrap_or_default()
}

fn sentiment_from(results: AnalyzeResults<SentimentDocument>) -> Result<SentimentAnalysis> {
    if let Some(err) = document_error(&results.errors) {
        anyhow::bail!("Sentiment analysis rejected document: {} {}", err.code, err.message);
    }

    let doc = results
        .documents
        .into_iter()
        .find(|d| d.id == DOCUMENT_ID)
        .ok_or_else(|| anyhow::anyhow!("Empty response from sentiment analysis"))?;

    let label = doc
        .sentiment
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("Sentiment analysis returned no label"))?;

    Ok(SentimentAnalysis {
        label,
        confidence: doc.confidence_scores,
    })
}
