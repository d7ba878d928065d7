use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope shared by every report endpoint.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_last_page_counts() {
        let resp = PaginatedResponse::<u32>::new(vec![], 41, 1, 20);
        assert_eq!(resp.total_pages, 3);
    }

    #[test]
    fn exact_pages() {
        let resp = PaginatedResponse::<u32>::new(vec![], 40, 2, 20);
        assert_eq!(resp.total_pages, 2);
    }

    #[test]
    fn no_reports_means_no_pages() {
        assert_eq!(PaginatedResponse::<u32>::new(vec![], 0, 1, 20).total_pages, 0);
        assert_eq!(PaginatedResponse::<u32>::new(vec![], 5, 1, 0).total_pages, 0);
    }

    #[test]
    fn envelope_serializes_message() {
        let body = serde_json::to_value(ApiResponse::with_message(7, "saved".to_string())).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], 7);
        assert_eq!(body["message"], "saved");
    }
}
