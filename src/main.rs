use community_risk::app::create_app;
use community_risk::config::{self, analysis::TextAnalysisConfig, pipeline::PipelineConfig};
use community_risk::migration;
use community_risk::services::memory_store::MemoryReportStore;
use community_risk::services::pipeline::ReportPipeline;
use community_risk::services::store::{DbReportStore, ReportStore};
use community_risk::services::text_analysis::{
    LanguageServiceAnalyzer, TextAnalyzer, UnconfiguredAnalyzer,
};
use sea_orm_migration::MigratorTrait;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    tracing::info!("Starting Community Risk API v{}...", env!("CARGO_PKG_VERSION"));

    let store = build_store().await?;
    let analyzer = build_analyzer()?;
    let pipeline_config = PipelineConfig::from_env();
    tracing::info!(
        locale = %pipeline_config.locale,
        stage_timeout_secs = pipeline_config.stage_timeout.as_secs(),
        "Pipeline configured"
    );
    let pipeline = ReportPipeline::new(store.clone(), analyzer, pipeline_config);

    let app = create_app(store, pipeline);

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "community_risk=debug,tower_http=debug,axum=debug".into());
    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory store.
async fn build_store() -> anyhow::Result<Arc<dyn ReportStore>> {
    match config::database::database_url() {
        Some(url) => {
            let db = config::database::get_database(&url).await?;
            tracing::info!("Database connected successfully");

            migration::Migrator::up(&db, None).await?;
            tracing::info!("Database migrations applied successfully");

            Ok(Arc::new(DbReportStore::new(db)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, reports are kept in memory only");
            Ok(Arc::new(MemoryReportStore::new()))
        }
    }
}

/// Text analysis is optional; without it every report is scored from failover signals.
fn build_analyzer() -> anyhow::Result<Arc<dyn TextAnalyzer>> {
    match TextAnalysisConfig::from_env() {
        Some(cfg) => {
            let analyzer = LanguageServiceAnalyzer::new(&cfg)?;
            tracing::info!(endpoint = %cfg.endpoint, "Language service configured");
            Ok(Arc::new(analyzer))
        }
        None => {
            tracing::warn!(
                "AI_LANGUAGE_ENDPOINT/AI_LANGUAGE_KEY not set, text analysis will use failover values"
            );
            Ok(Arc::new(UnconfiguredAnalyzer))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
