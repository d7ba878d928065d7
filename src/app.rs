use crate::routes;
use crate::services::pipeline::ReportPipeline;
use crate::services::store::ReportStore;
use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::env;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        crate::handlers::report::create_report,
        crate::handlers::report::list_reports,
        crate::handlers::report::get_report,
        crate::handlers::report::process_report,
    ),
    components(
        schemas(
            crate::response::ApiResponse<serde_json::Value>,
            crate::response::PaginatedResponse<serde_json::Value>,
            crate::error::AppError,
            crate::scoring::RiskLevel,
            crate::handlers::report::CreateReportRequest,
            crate::handlers::report::CreateReportResponse,
            crate::handlers::report::ReportResponse,
            crate::handlers::report::ListReportsQuery,
            crate::handlers::report::ProcessReportRequest,
            crate::handlers::report::ProcessReportResponse,
            crate::handlers::report::AiResults,
            crate::handlers::report::MlResults,
        )
    ),
    tags(
        (name = "reports", description = "Community report ingestion and retrieval"),
        (name = "processing", description = "Text enrichment and risk scoring"),
    )
)]
pub struct ApiDoc;

pub fn build_cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins_str == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// The full HTTP surface with its collaborators attached.
pub fn create_app(store: Arc<dyn ReportStore>, pipeline: ReportPipeline) -> Router {
    Router::new()
        .route("/", get(health_check))
        .merge(routes::create_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer())
                .layer(Extension(store))
                .layer(Extension(pipeline)),
        )
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check successful", body = serde_json::Value)
    )
)]
async fn health_check(
    Extension(store): Extension<Arc<dyn ReportStore>>,
    Extension(pipeline): Extension<ReportPipeline>,
) -> impl IntoResponse {
    let storage_ok = store.ping().await;
    let status = if storage_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "Community Risk API",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage_ok,
        "text_analysis": pipeline.analyzer_name(),
    }))
}
