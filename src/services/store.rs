use crate::{
    error::AppResult,
    models::{report, EnrichmentResult, NewReport, Report, ReportModel},
    scoring::RiskLevel,
};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Statement,
};

/// Optional narrowing for report listings.
#[derive(Clone, Debug, Default)]
pub struct ReportFilter {
    pub risk_level: Option<RiskLevel>,
}

/// Persistence capability consumed by the services and the scoring pipeline.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn insert_report(&self, report: NewReport) -> AppResult<ReportModel>;

    /// `Ok(None)` when no report carries this identifier.
    async fn fetch_report(&self, report_id: i32) -> AppResult<Option<ReportModel>>;

    /// One page of reports, newest `date_reported` first, plus the total match count.
    async fn list_reports(
        &self,
        filter: &ReportFilter,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<ReportModel>, u64)>;

    /// Merge enrichment fields into an existing report. Fails if the report is gone.
    async fn persist_enrichment(
        &self,
        report_id: i32,
        enrichment: &EnrichmentResult,
    ) -> AppResult<()>;

    async fn ping(&self) -> bool;
}

/// PostgreSQL-backed store over the `community_reports` table.
#[derive(Clone)]
pub struct DbReportStore {
    db: DatabaseConnection,
}

impl DbReportStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportStore for DbReportStore {
    async fn insert_report(&self, new: NewReport) -> AppResult<ReportModel> {
        let now = chrono::Utc::now().naive_utc();
        let model = report::ActiveModel {
            date_reported: Set(new.date_reported),
            location: Set(new.location),
            category: Set(new.category),
            severity: Set(new.severity),
            reporter_type: Set(new.reporter_type),
            description: Set(new.description),
            image_url: Set(new.image_url),
            created_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        Ok(saved)
    }

    async fn fetch_report(&self, report_id: i32) -> AppResult<Option<ReportModel>> {
        let found = Report::find_by_id(report_id).one(&self.db).await?;
        Ok(found)
    }

    async fn list_reports(
        &self,
        filter: &ReportFilter,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<ReportModel>, u64)> {
        let mut query = Report::find();

        if let Some(level) = filter.risk_level {
            query = query.filter(report::Column::PredictedRiskLevel.eq(level.as_str()));
        }

        let paginator = query
            .order_by_desc(report::Column::DateReported)
            .order_by_desc(report::Column::ReportId)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let reports = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((reports, total))
    }

    async fn persist_enrichment(
        &self,
        report_id: i32,
        enrichment: &EnrichmentResult,
    ) -> AppResult<()> {
        let now = chrono::Utc::now().naive_utc();
        let active = report::ActiveModel {
            report_id: Set(report_id),
            ai_keywords: Set(Some(enrichment.keywords.clone())),
            ai_sentiment: Set(Some(enrichment.sentiment.clone())),
            ai_urgency_score: Set(Some(enrichment.urgency_score)),
            risk_score: Set(Some(enrichment.risk_score)),
            predicted_risk_level: Set(Some(enrichment.risk_level.as_str().to_string())),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        // RecordNotUpdated surfaces as a database error when the row is gone.
        active.update(&self.db).await?;
        Ok(())
    }

    async fn ping(&self) -> bool {
        self.db
            .query_one(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await
            .is_ok()
    }
}
