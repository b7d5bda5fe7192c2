mod analysis;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod state;
mod storage;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::{KeywordAnalyzer, MockAnalyzer, ResumeAnalyzer};
use crate::config::{AnalyzerBackend, Config, ReportStoreKind};
use crate::db::{create_pool, ensure_schema};
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;
use crate::storage::{MemoryReportStore, MockReportStore, PgReportStore, ReportStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so RUST_LOG from .env reaches the filter
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting {} v{} (debug: {})",
        config.api_title, config.api_version, config.debug
    );

    let analyzer: Arc<dyn ResumeAnalyzer> = match config.analyzer_backend {
        AnalyzerBackend::Mock => Arc::new(MockAnalyzer),
        AnalyzerBackend::Keyword => Arc::new(KeywordAnalyzer::new(
            config.min_keyword_length,
            config.max_keywords,
            config.max_extracted_size,
        )),
    };
    info!("Analyzer backend: {}", analyzer.backend());

    let reports = build_report_store(&config).await?;
    info!("Report store: {}", reports.name());

    if config.analyzer_backend == AnalyzerBackend::Keyword
        && config.report_store == ReportStoreKind::Mock
    {
        warn!("Keyword analysis is enabled but reports are not persisted (REPORT_STORE=mock)");
    }

    let cors = cors_layer(&config.cors_origins)?;
    info!("CORS origins: {}", config.cors_origins.join(", "));

    let state = AppState {
        config: config.clone(),
        analyzer,
        reports,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down {}", config.api_title);
    Ok(())
}

async fn build_report_store(config: &Config) -> Result<Arc<dyn ReportStore>> {
    Ok(match config.report_store {
        ReportStoreKind::Mock => Arc::new(MockReportStore),
        ReportStoreKind::Memory => Arc::new(MemoryReportStore::new(config.memory_store_capacity)),
        ReportStoreKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required when REPORT_STORE=postgres")?;
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgReportStore::new(pool))
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
