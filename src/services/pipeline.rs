use crate::config::pipeline::PipelineConfig;
use crate::models::{EnrichmentResult, ReportModel};
use crate::scoring::{
    calculate_risk_score, round2, RiskLevel, DEFAULT_RISK_LEVEL, DEFAULT_RISK_SCORE,
};
use crate::services::enrichment::{extract_signals, within, SignalExtraction, Staged};
use crate::services::store::ReportStore;
use crate::services::text_analysis::TextAnalyzer;
use std::panic::{catch_unwind, UnwindSafe};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            score: DEFAULT_RISK_SCORE,
            level: DEFAULT_RISK_LEVEL,
        }
    }
}

/// Result of one pipeline run as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Success {
        report_id: i32,
        enrichment: EnrichmentResult,
    },
    NotFound {
        report_id: i32,
    },
    /// Enrichment was computed but could not be saved; it is discarded.
    PersistenceFailure {
        report_id: i32,
        error: String,
    },
    /// The store could not be read, as opposed to the report being absent.
    FetchFailure {
        report_id: i32,
        error: String,
    },
    InvalidInput {
        message: String,
    },
}

/// Run a scoring computation, turning a panic or a non-finite score into the
/// 50.00 / Medium failover assessment. The score is rounded to two decimals
/// before classification so the level always agrees with the emitted score.
pub fn guarded_fusion<F>(compute: F) -> Staged<RiskAssessment>
where
    F: FnOnce() -> f64 + UnwindSafe,
{
    match catch_unwind(compute) {
        Ok(score) if score.is_finite() => {
            let score = round2(score);
            Staged::completed(RiskAssessment {
                score,
                level: RiskLevel::from_score(score),
            })
        }
        Ok(score) => Staged::degraded(
            RiskAssessment::default(),
            format!("risk score was not finite: {}", score),
        ),
        Err(_) => Staged::degraded(RiskAssessment::default(), "risk scoring panicked"),
    }
}

/// Score a report from its metadata and extracted signals.
pub fn assess(report: &ReportModel, signals: &SignalExtraction) -> Staged<RiskAssessment> {
    let category = report.category.as_str();
    let severity = report.severity.as_str();
    let urgency = signals.sentiment.value.urgency;
    let sentiment = signals.sentiment.value.label.as_str();

    guarded_fusion(move || calculate_risk_score(category, severity, urgency, sentiment))
}

/// fetch -> extract -> fuse -> classify -> persist, for one report at a time.
#[derive(Clone)]
pub struct ReportPipeline {
    store: Arc<dyn ReportStore>,
    analyzer: Arc<dyn TextAnalyzer>,
    config: PipelineConfig,
}

impl ReportPipeline {
    pub fn new(
        store: Arc<dyn ReportStore>,
        analyzer: Arc<dyn TextAnalyzer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            analyzer,
            config,
        }
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.provider()
    }

    pub async fn process(&self, report_id: i32) -> ProcessOutcome {
        if report_id <= 0 {
            return ProcessOutcome::InvalidInput {
                message: "report_id must be a positive integer".to_string(),
            };
        }

        tracing::info!(report_id, "Processing report");

        let limit = self.config.stage_timeout;
        let fetched = within(limit, "report fetch", async {
            self.store
                .fetch_report(report_id)
                .await
                .map_err(anyhow::Error::from)
        })
        .await;

        let report = match fetched {
            Ok(Some(report)) => report,
            Ok(None) => {
                tracing::info!(report_id, "Report not found");
                return ProcessOutcome::NotFound { report_id };
            }
            Err(e) => {
                tracing::error!(report_id, error = %e, "Failed to fetch report");
                return ProcessOutcome::FetchFailure {
                    report_id,
                    error: e.to_string(),
                };
            }
        };

        let signals = extract_signals(
            self.analyzer.as_ref(),
            &report.description,
            &self.config.locale,
            limit,
        )
        .await;
        if let Some(reason) = signals.keywords.reason() {
            tracing::warn!(report_id, reason, "Keyword extraction degraded to failover value");
        }
        if let Some(reason) = signals.sentiment.reason() {
            tracing::warn!(report_id, reason, "Sentiment analysis degraded to failover value");
        }
        tracing::debug!(
            report_id,
            keywords = %signals.keywords.value,
            sentiment = %signals.sentiment.value.label,
            urgency = signals.sentiment.value.urgency,
            degraded = signals.is_degraded(),
            "Signals extracted"
        );

        let assessment = assess(&report, &signals);
        if let Some(reason) = assessment.reason() {
            tracing::error!(report_id, reason, "Risk scoring defect, using failover score");
        }

        let enrichment = EnrichmentResult {
            keywords: signals.keywords.value,
            sentiment: signals.sentiment.value.label,
            urgency_score: round2(signals.sentiment.value.urgency),
            risk_score: assessment.value.score,
            risk_level: assessment.value.level,
        };
        tracing::info!(
            report_id,
            risk_score = enrichment.risk_score,
            risk_level = %enrichment.risk_level,
            "Risk assessed"
        );

        let persisted = within(limit, "enrichment persistence", async {
            self.store
                .persist_enrichment(report_id, &enrichment)
                .await
                .map_err(anyhow::Error::from)
        })
        .await;

        match persisted {
            Ok(()) => {
                tracing::info!(report_id, "Enrichment saved");
                ProcessOutcome::Success {
                    report_id,
                    enrichment,
                }
            }
            Err(e) => {
                tracing::error!(report_id, error = %e, "Failed to save enrichment");
                ProcessOutcome::PersistenceFailure {
                    report_id,
                    error: e.to_string(),
                }
            }
        }
    }
}
