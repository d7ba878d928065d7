use crate::handlers;
use axum::{routing, Router};

pub fn create_routes() -> Router {
    Router::new().nest("/api/v1", api_routes())
}

fn api_routes() -> Router {
    Router::new()
        .route(
            "/reports",
            routing::post(handlers::report::create_report).get(handlers::report::list_reports),
        )
        .route("/reports/{id}", routing::get(handlers::report::get_report))
        .route(
            "/aiml-process",
            routing::post(handlers::report::process_report),
        )
}
