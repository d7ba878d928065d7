#![allow(dead_code)]

use async_trait::async_trait;
use community_risk::config::pipeline::PipelineConfig;
use community_risk::models::{EnrichmentResult, NewReport, ReportModel};
use community_risk::scoring::ConfidenceScores;
use community_risk::services::memory_store::MemoryReportStore;
use community_risk::services::pipeline::ReportPipeline;
use community_risk::services::store::{ReportFilter, ReportStore};
use community_risk::services::text_analysis::{SentimentAnalysis, TextAnalyzer};
use community_risk::AppResult;
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("community_risk=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Analyzer that replays fixed answers. `None` means the call fails.
#[derive(Clone, Default)]
pub struct ScriptedAnalyzer {
    pub phrases: Option<Vec<String>>,
    pub sentiment: Option<SentimentAnalysis>,
    pub delay: Option<Duration>,
}

impl ScriptedAnalyzer {
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn answering(phrases: &[&str], label: &str, scores: ConfidenceScores) -> Self {
        Self {
            phrases: Some(phrases.iter().map(|p| p.to_string()).collect()),
            sentiment: Some(SentimentAnalysis {
                label: label.to_string(),
                confidence: Some(scores),
            }),
            delay: None,
        }
    }
}

#[async_trait]
impl TextAnalyzer for ScriptedAnalyzer {
    fn provider(&self) -> &str {
        "scripted"
    }

    async fn extract_key_phrases(&self, _text: &str, _locale: &str) -> anyhow::Result<Vec<String>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.phrases
            .clone()
            .ok_or_else(|| anyhow::anyhow!("key phrase extraction unavailable"))
    }

    async fn analyze_sentiment(
        &self,
        _text: &str,
        _locale: &str,
    ) -> anyhow::Result<SentimentAnalysis> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.sentiment
            .clone()
            .ok_or_else(|| anyhow::anyhow!("sentiment analysis unavailable"))
    }
}

/// In-memory store that counts enrichment writes and can be told to fail or stall.
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub inner: MemoryReportStore,
    pub persist_calls: Arc<AtomicUsize>,
    pub fail_persist: bool,
    pub fail_fetch: bool,
    pub fetch_delay: Option<Duration>,
    pub persist_delay: Option<Duration>,
}

impl RecordingStore {
    pub fn failing_persist() -> Self {
        Self {
            fail_persist: true,
            ..Self::default()
        }
    }

    pub fn failing_fetch() -> Self {
        Self {
            fail_fetch: true,
            ..Self::default()
        }
    }

    pub fn persist_count(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportStore for RecordingStore {
    async fn insert_report(&self, report: NewReport) -> AppResult<ReportModel> {
        self.inner.insert_report(report).await
    }

    async fn fetch_report(&self, report_id: i32) -> AppResult<Option<ReportModel>> {
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_fetch {
            return Err(community_risk::AppError::Storage(
                "read timed out on replica".to_string(),
            ));
        }
        self.inner.fetch_report(report_id).await
    }

    async fn list_reports(
        &self,
        filter: &ReportFilter,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<ReportModel>, u64)> {
        self.inner.list_reports(filter, page, per_page).await
    }

    async fn persist_enrichment(
        &self,
        report_id: i32,
        enrichment: &EnrichmentResult,
    ) -> AppResult<()> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.persist_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_persist {
            return Err(community_risk::AppError::Storage(
                "connection reset by peer".to_string(),
            ));
        }
        self.inner.persist_enrichment(report_id, enrichment).await
    }

    async fn ping(&self) -> bool {
        true
    }
}

pub fn scores(positive: f64, neutral: f64, negative: f64) -> ConfidenceScores {
    ConfidenceScores {
        positive,
        neutral,
        negative,
    }
}

pub fn new_report(category: &str, severity: &str, description: &str) -> NewReport {
    NewReport {
        date_reported: chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap(),
        location: "North Ward".to_string(),
        category: category.to_string(),
        severity: severity.to_string(),
        reporter_type: "Anonymous".to_string(),
        description: description.to_string(),
        image_url: None,
    }
}

pub fn pipeline_with(store: Arc<dyn ReportStore>, analyzer: ScriptedAnalyzer) -> ReportPipeline {
    init_tracing();
    ReportPipeline::new(store, Arc::new(analyzer), PipelineConfig::default())
}

/// Pipeline whose every stage gives up after `stage_timeout`.
pub fn pipeline_with_timeout(
    store: Arc<dyn ReportStore>,
    analyzer: ScriptedAnalyzer,
    stage_timeout: Duration,
) -> ReportPipeline {
    init_tracing();
    ReportPipeline::new(
        store,
        Arc::new(analyzer),
        PipelineConfig {
            stage_timeout,
            ..PipelineConfig::default()
        },
    )
}

pub struct TestApp {
    pub addr: String,
    pub client: Client,
    pub store: RecordingStore,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

pub async fn spawn_app(analyzer: ScriptedAnalyzer) -> TestApp {
    spawn_app_with_store(RecordingStore::default(), analyzer).await
}

pub async fn spawn_app_with_store(store: RecordingStore, analyzer: ScriptedAnalyzer) -> TestApp {
    let shared: Arc<dyn ReportStore> = Arc::new(store.clone());
    let pipeline = pipeline_with(shared.clone(), analyzer);
    let app = community_risk::app::create_app(shared, pipeline);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        addr: format!("http://{}", addr),
        client: Client::new(),
        store,
    }
}

/// Submit a report over HTTP and return its id.
pub async fn create_test_report(app: &TestApp, category: &str, severity: &str) -> i64 {
    let resp = app
        .client
        .post(app.url("/reports"))
        .json(&serde_json::json!({
            "date_reported": "2024-06-01T09:15:00Z",
            "location": "North Ward",
            "category": category,
            "severity": severity,
            "description": "Sewage overflowing into the playground"
        }))
        .send()
        .await
        .expect("Failed to create report");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse response");
    if status != 201 {
        panic!("Failed to create report: status={}, body={}", status, body);
    }

    body["data"]["report_id"]
        .as_i64()
        .expect("Response missing report_id")
}
