use crate::{
    error::{AppError, AppResult},
    models::{EnrichmentResult, NewReport, ReportModel},
    services::store::{ReportFilter, ReportStore},
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// Process-local report store used when no database is configured.
///
/// Identifiers are assigned sequentially from 1. Concurrent enrichment of the
/// same report is last-writer-wins, matching the database store.
#[derive(Clone, Default)]
pub struct MemoryReportStore {
    reports: Arc<DashMap<i32, ReportModel>>,
    next_id: Arc<AtomicI32>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn insert_report(&self, new: NewReport) -> AppResult<ReportModel> {
        let report_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let model = ReportModel {
            report_id,
            date_reported: new.date_reported,
            location: new.location,
            category: new.category,
            severity: new.severity,
            reporter_type: new.reporter_type,
            description: new.description,
            image_url: new.image_url,
            ai_keywords: None,
            ai_sentiment: None,
            ai_urgency_score: None,
            risk_score: None,
            predicted_risk_level: None,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: None,
        };
        self.reports.insert(report_id, model.clone());
        Ok(model)
    }

    async fn fetch_report(&self, report_id: i32) -> AppResult<Option<ReportModel>> {
        Ok(self.reports.get(&report_id).map(|r| r.value().clone()))
    }

    async fn list_reports(
        &self,
        filter: &ReportFilter,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<ReportModel>, u64)> {
        let mut matching: Vec<ReportModel> = self
            .reports
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|r| match filter.risk_level {
                Some(level) => r.predicted_risk_level.as_deref() == Some(level.as_str()),
                None => true,
            })
            .collect();

        matching.sort_by(|a, b| {
            b.date_reported
                .cmp(&a.date_reported)
                .then(b.report_id.cmp(&a.report_id))
        });

        let total = matching.len() as u64;
        let offset = page.saturating_sub(1).saturating_mul(per_page) as usize;
        let items = matching
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect();
        Ok((items, total))
    }

    async fn persist_enrichment(
        &self,
        report_id: i32,
        enrichment: &EnrichmentResult,
    ) -> AppResult<()> {
        let mut entry = self.reports.get_mut(&report_id).ok_or_else(|| {
            AppError::Storage(format!("report {} no longer exists", report_id))
        })?;

        let report = entry.value_mut();
        report.ai_keywords = Some(enrichment.keywords.clone());
        report.ai_sentiment = Some(enrichment.sentiment.clone());
        report.ai_urgency_score = Some(enrichment.urgency_score);
        report.risk_score = Some(enrichment.risk_score);
        report.predicted_risk_level = Some(enrichment.risk_level.as_str().to_string());
        report.updated_at = Some(chrono::Utc::now().naive_utc());
        Ok(())
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RiskLevel;
    use chrono::NaiveDate;

    fn submission(day: u32, category: &str) -> NewReport {
        NewReport {
            date_reported: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            location: "Riverside".to_string(),
            category: category.to_string(),
            severity: "Medium".to_string(),
            reporter_type: "Anonymous".to_string(),
            description: "Overflowing drain near the school".to_string(),
            image_url: None,
        }
    }

    fn enrichment(level: RiskLevel) -> EnrichmentResult {
        EnrichmentResult {
            keywords: "drain, school".to_string(),
            sentiment: "negative".to_string(),
            urgency_score: 0.8,
            risk_score: 72.0,
            risk_level: level,
        }
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = MemoryReportStore::new();
        let a = store.insert_report(submission(1, "Health")).await.unwrap();
        let b = store.insert_report(submission(2, "Safety")).await.unwrap();
        assert_eq!(a.report_id, 1);
        assert_eq!(b.report_id, 2);
        let (_, total) = store
            .list_reports(&ReportFilter::default(), 1, 20)
            .await
            .unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn fetch_missing_is_none() {
        let store = MemoryReportStore::new();
        assert!(store.fetch_report(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paginated() {
        let store = MemoryReportStore::new();
        for day in [3, 1, 2] {
            store.insert_report(submission(day, "Social")).await.unwrap();
        }

        let (page1, total) = store
            .list_reports(&ReportFilter::default(), 1, 2)
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(page1.len(), 2);
        assert!(page1[0].date_reported > page1[1].date_reported);

        let (page2, _) = store
            .list_reports(&ReportFilter::default(), 2, 2)
            .await
            .unwrap();
        assert_eq!(page2.len(), 1);
    }

    #[tokio::test]
    async fn enrichment_is_merged_and_filterable() {
        let store = MemoryReportStore::new();
        let r = store.insert_report(submission(1, "Health")).await.unwrap();
        store.insert_report(submission(2, "Social")).await.unwrap();

        store
            .persist_enrichment(r.report_id, &enrichment(RiskLevel::High))
            .await
            .unwrap();

        let saved = store.fetch_report(r.report_id).await.unwrap().unwrap();
        assert_eq!(saved.predicted_risk_level.as_deref(), Some("High"));
        assert_eq!(saved.ai_keywords.as_deref(), Some("drain, school"));
        assert!(saved.updated_at.is_some());
        assert_eq!(saved.description, "Overflowing drain near the school");

        let filter = ReportFilter {
            risk_level: Some(RiskLevel::High),
        };
        let (items, total) = store.list_reports(&filter, 1, 20).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].report_id, r.report_id);
    }

    #[tokio::test]
    async fn persisting_unknown_report_fails() {
        let store = MemoryReportStore::new();
        let err = store
            .persist_enrichment(7, &enrichment(RiskLevel::Low))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
