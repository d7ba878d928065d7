use crate::{
    error::{AppError, AppResult},
    models::{NewReport, ReportModel},
    services::store::{ReportFilter, ReportStore},
};
use chrono::{DateTime, NaiveDateTime};
use std::sync::Arc;

pub const DEFAULT_REPORTER_TYPE: &str = "Anonymous";
pub const REQUIRED_FIELDS: &[&str] = &[
    "date_reported",
    "location",
    "category",
    "severity",
    "description",
];

/// Raw submission fields as they arrive from a client.
#[derive(Debug, Default, Clone)]
pub struct ReportSubmission<'a> {
    pub date_reported: Option<&'a str>,
    pub location: Option<&'a str>,
    pub category: Option<&'a str>,
    pub severity: Option<&'a str>,
    pub reporter_type: Option<&'a str>,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

pub struct ReportService {
    store: Arc<dyn ReportStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    pub async fn create_report(&self, submission: ReportSubmission<'_>) -> AppResult<ReportModel> {
        let new = validate_submission(&submission)?;
        let saved = self.store.insert_report(new).await?;
        tracing::info!(report_id = saved.report_id, category = %saved.category, "Report ingested");
        Ok(saved)
    }

    pub async fn get_report(&self, report_id: i32) -> AppResult<ReportModel> {
        self.store
            .fetch_report(report_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_reports(
        &self,
        filter: &ReportFilter,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<ReportModel>, u64)> {
        self.store.list_reports(filter, page, per_page).await
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts RFC 3339 (what browsers send) or a bare `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_date_reported(raw: &str) -> AppResult<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| {
            AppError::Validation(format!("date_reported is not a valid timestamp: {}", raw))
        })
}

/// Check required fields and normalize the submission. Category and severity
/// are stored verbatim; unknown values only matter at scoring time.
pub fn validate_submission(submission: &ReportSubmission<'_>) -> AppResult<NewReport> {
    let date_reported = present(submission.date_reported);
    let location = present(submission.location);
    let category = present(submission.category);
    let severity = present(submission.severity);
    let description = present(submission.description);

    let (Some(date_reported), Some(location), Some(category), Some(severity), Some(description)) =
        (date_reported, location, category, severity, description)
    else {
        return Err(AppError::Validation(format!(
            "Missing required fields, required: {}",
            REQUIRED_FIELDS.join(", ")
        )));
    };

    let reporter_type = present(submission.reporter_type).unwrap_or(DEFAULT_REPORTER_TYPE);
    let image_url = present(submission.image_url);

    Ok(NewReport {
        date_reported: parse_date_reported(date_reported)?,
        location: location.to_string(),
        category: category.to_string(),
        severity: severity.to_string(),
        reporter_type: reporter_type.to_string(),
        description: description.to_string(),
        image_url: image_url.map(|s| s.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete<'a>() -> ReportSubmission<'a> {
        ReportSubmission {
            date_reported: Some("2024-05-01T08:30:00Z"),
            location: Some("Market Square"),
            category: Some("Safety"),
            severity: Some("High"),
            reporter_type: None,
            description: Some("Loose scaffolding over the footpath"),
            image_url: None,
        }
    }

    #[test]
    fn complete_submission_is_accepted() {
        let new = validate_submission(&complete()).unwrap();
        assert_eq!(new.reporter_type, DEFAULT_REPORTER_TYPE);
        assert_eq!(new.category, "Safety");
        assert_eq!(new.date_reported.to_string(), "2024-05-01 08:30:00");
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut sub = complete();
        sub.location = Some("   ");
        let err = validate_submission(&sub).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("date_reported, location")));
    }

    #[test]
    fn unknown_category_is_stored_verbatim() {
        let mut sub = complete();
        sub.category = Some("Wildlife");
        assert_eq!(validate_submission(&sub).unwrap().category, "Wildlife");
    }

    #[test]
    fn reporter_type_and_image_are_trimmed() {
        let mut sub = complete();
        sub.reporter_type = Some(" Resident ");
        sub.image_url = Some("");
        let new = validate_submission(&sub).unwrap();
        assert_eq!(new.reporter_type, "Resident");
        assert_eq!(new.image_url, None);
    }

    #[test]
    fn offset_timestamps_are_normalized_to_utc() {
        let dt = parse_date_reported("2024-05-01T10:30:00+02:00").unwrap();
        assert_eq!(dt.to_string(), "2024-05-01 08:30:00");
    }

    #[test]
    fn naive_timestamps_are_accepted() {
        assert!(parse_date_reported("2024-05-01T08:30").is_ok());
        assert!(parse_date_reported("2024-05-01 08:30:00").is_ok());
        assert!(parse_date_reported("yesterday").is_err());
    }
}
