use crate::error::{AppError, AppResult};
use crate::models::ReportModel;
use crate::response::{ApiResponse, PaginatedResponse};
use crate::scoring::RiskLevel;
use crate::services::pipeline::{ProcessOutcome, ReportPipeline};
use crate::services::report::{ReportService, ReportSubmission};
use crate::services::store::{ReportFilter, ReportStore};
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReportRequest {
    /// When the incident was observed (RFC 3339)
    #[serde(alias = "timestamp")]
    pub date_reported: Option<String>,
    /// Where the incident was observed (max 200 characters)
    #[validate(length(max = 200))]
    pub location: Option<String>,
    /// Health, Environmental, Safety, Infrastructure, Social or free text (max 50)
    #[validate(length(max = 50))]
    pub category: Option<String>,
    /// High, Medium, Low or free text (max 20)
    #[validate(length(max = 20))]
    pub severity: Option<String>,
    /// Reporter classification, defaults to Anonymous (max 50)
    #[serde(alias = "reporterType")]
    #[validate(length(max = 50))]
    pub reporter_type: Option<String>,
    /// Free-text incident description
    pub description: Option<String>,
    /// Optional image reference (max 500)
    #[serde(alias = "imageUrl")]
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateReportResponse {
    /// Identifier assigned to the new report
    pub report_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListReportsQuery {
    /// Filter by predicted risk level (High, Medium, Low)
    pub risk_level: Option<String>,
    /// Page number
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessReportRequest {
    /// Report to score (positive integer or numeric string)
    #[schema(value_type = i32)]
    pub report_id: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub report_id: i32,
    pub date_reported: String,
    pub location: String,
    pub category: String,
    pub severity: String,
    pub reporter_type: String,
    pub description: String,
    pub image_url: Option<String>,
    pub ai_keywords: Option<String>,
    pub ai_sentiment: Option<String>,
    pub ai_urgency_score: Option<f64>,
    pub risk_score: Option<f64>,
    pub predicted_risk_level: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<ReportModel> for ReportResponse {
    fn from(r: ReportModel) -> Self {
        Self {
            report_id: r.report_id,
            date_reported: r.date_reported.and_utc().to_rfc3339(),
            location: r.location,
            category: r.category,
            severity: r.severity,
            reporter_type: r.reporter_type,
            description: r.description,
            image_url: r.image_url,
            ai_keywords: r.ai_keywords,
            ai_sentiment: r.ai_sentiment,
            ai_urgency_score: r.ai_urgency_score,
            risk_score: r.risk_score,
            predicted_risk_level: r.predicted_risk_level,
            created_at: r.created_at.and_utc().to_rfc3339(),
            updated_at: r.updated_at.map(|t| t.and_utc().to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AiResults {
    pub keywords: String,
    pub sentiment: String,
    /// Two decimal places
    pub urgency_score: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MlResults {
    /// Two decimal places, 0-100
    pub risk_score: f64,
    pub predicted_risk_level: RiskLevel,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessReportResponse {
    pub report_id: i32,
    pub ai_results: AiResults,
    pub ml_results: MlResults,
}

/// Accepts a positive integer or a string holding one.
pub fn parse_report_id(value: Option<&Value>) -> Result<i32, String> {
    let parsed = match value {
        None | Some(Value::Null) => return Err("report_id is required".to_string()),
        Some(Value::Number(n)) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(id) if id > 0 => Ok(id),
        _ => Err("report_id must be a positive integer".to_string()),
    }
}

fn error_body(status: StatusCode, message: String, detail: Option<String>) -> Response {
    let body = match detail {
        Some(detail) => json!({ "error": message, "detail": detail }),
        None => json!({ "error": message }),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ProcessOutcome {
    fn into_response(self) -> Response {
        match self {
            ProcessOutcome::Success {
                report_id,
                enrichment,
            } => ApiResponse::ok(ProcessReportResponse {
                report_id,
                ai_results: AiResults {
                    keywords: enrichment.keywords,
                    sentiment: enrichment.sentiment,
                    urgency_score: enrichment.urgency_score,
                },
                ml_results: MlResults {
                    risk_score: enrichment.risk_score,
                    predicted_risk_level: enrichment.risk_level,
                },
            })
            .into_response(),
            ProcessOutcome::NotFound { report_id } => error_body(
                StatusCode::NOT_FOUND,
                format!("Report with ID {} not found", report_id),
                None,
            ),
            ProcessOutcome::PersistenceFailure { error, .. } => error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update database".to_string(),
                Some(error),
            ),
            ProcessOutcome::FetchFailure { error, .. } => error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read report".to_string(),
                Some(error),
            ),
            ProcessOutcome::InvalidInput { message } => {
                error_body(StatusCode::BAD_REQUEST, message, None)
            }
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report created", body = CreateReportResponse),
        (status = 400, description = "Validation error", body = AppError),
    ),
    tag = "reports"
)]
pub async fn create_report(
    Extension(store): Extension<Arc<dyn ReportStore>>,
    Json(payload): Json<CreateReportRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ReportService::new(store);
    let report = service
        .create_report(ReportSubmission {
            date_reported: payload.date_reported.as_deref(),
            location: payload.location.as_deref(),
            category: payload.category.as_deref(),
            severity: payload.severity.as_deref(),
            reporter_type: payload.reporter_type.as_deref(),
            description: payload.description.as_deref(),
            image_url: payload.image_url.as_deref(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(
            CreateReportResponse {
                report_id: report.report_id,
            },
            "Report inserted successfully".to_string(),
        ),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports",
    params(
        ("risk_level" = Option<String>, Query, description = "Filter by predicted risk level"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "List of reports", body = PaginatedResponse<ReportResponse>),
        (status = 400, description = "Invalid filter", body = AppError),
    ),
    tag = "reports"
)]
pub async fn list_reports(
    Extension(store): Extension<Arc<dyn ReportStore>>,
    Query(params): Query<ListReportsQuery>,
) -> AppResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);
    let risk_level = params
        .risk_level
        .as_deref()
        .map(str::parse::<RiskLevel>)
        .transpose()
        .map_err(AppError::Validation)?;

    let service = ReportService::new(store);
    let (reports, total) = service
        .list_reports(&ReportFilter { risk_level }, page, per_page)
        .await?;
    let items = reports.into_iter().map(ReportResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    params(("id" = i32, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report", body = ReportResponse),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "reports"
)]
pub async fn get_report(
    Extension(store): Extension<Arc<dyn ReportStore>>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(store);
    let report = service.get_report(id).await?;
    Ok(ApiResponse::ok(ReportResponse::from(report)))
}

#[utoipa::path(
    post,
    path = "/api/v1/aiml-process",
    request_body = ProcessReportRequest,
    responses(
        (status = 200, description = "Report enriched and scored", body = ProcessReportResponse),
        (status = 400, description = "Missing or malformed report_id", body = AppError),
        (status = 404, description = "Report not found", body = AppError),
        (status = 500, description = "Enrichment could not be saved", body = AppError),
    ),
    tag = "processing"
)]
pub async fn process_report(
    Extension(pipeline): Extension<ReportPipeline>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ProcessOutcome {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return ProcessOutcome::InvalidInput {
                message: rejection.body_text(),
            }
        }
    };

    match parse_report_id(body.get("report_id")) {
        Ok(report_id) => pipeline.process(report_id).await,
        Err(message) => ProcessOutcome::InvalidInput { message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_report_id(Some(&json!(12))), Ok(12));
        assert_eq!(parse_report_id(Some(&json!(" 7 "))), Ok(7));
    }

    #[test]
    fn report_id_rejects_missing_and_malformed() {
        assert!(parse_report_id(None).is_err());
        assert!(parse_report_id(Some(&Value::Null)).is_err());
        assert!(parse_report_id(Some(&json!(0))).is_err());
        assert!(parse_report_id(Some(&json!(-3))).is_err());
        assert!(parse_report_id(Some(&json!(1.5))).is_err());
        assert!(parse_report_id(Some(&json!("abc"))).is_err());
        assert!(parse_report_id(Some(&json!([1]))).is_err());
        assert!(parse_report_id(Some(&json!(i64::MAX))).is_err());
    }

    #[test]
    fn length_limits_are_validated() {
        let req = CreateReportRequest {
            date_reported: Some("2024-01-01T00:00:00Z".into()),
            location: Some("x".repeat(201)),
            category: Some("Health".into()),
            severity: Some("High".into()),
            reporter_type: None,
            description: Some("desc".into()),
            image_url: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn frontend_field_names_are_accepted() {
        let req: CreateReportRequest = serde_json::from_value(json!({
            "timestamp": "2024-01-01T00:00:00Z",
            "location": "Park",
            "category": "Social",
            "severity": "Low",
            "reporterType": "Resident",
            "description": "Broken bench"
        }))
        .unwrap();
        assert_eq!(req.date_reported.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(req.reporter_type.as_deref(), Some("Resident"));
    }

    #[test]
    fn not_found_outcome_is_404() {
        let resp = ProcessOutcome::NotFound { report_id: 3 }.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn persistence_failure_outcome_is_500() {
        let resp = ProcessOutcome::PersistenceFailure {
            report_id: 3,
            error: "connection reset".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
