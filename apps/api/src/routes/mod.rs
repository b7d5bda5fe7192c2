pub mod health;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{request::Parts, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::analysis::handlers;
use crate::errors::AppError;
use crate::state::AppState;

/// Room for multipart framing and the job description on top of the file itself.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_size.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(health::root_handler))
        .route("/docs", get(health::docs_handler))
        .route("/api/v1/health", get(health::health_handler))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/report/:report_id", get(handlers::handle_get_report))
        .route("/api/v1/reports", get(handlers::handle_list_reports))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Builds the CORS layer from configured origins. `*` allows any origin;
/// entries like `https://*.vercel.app` match any single subdomain.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::permissive());
    }

    let allow_origin = if origins.iter().any(|o| o.contains("*.")) {
        let patterns = origins.to_vec();
        AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
            origin
                .to_str()
                .map(|origin| patterns.iter().any(|p| origin_matches(p, origin)))
                .unwrap_or(false)
        })
    } else {
        let values = origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin '{o}'"))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Matches an origin against an exact origin or a `scheme://*.domain` pattern.
fn origin_matches(pattern: &str, origin: &str) -> bool {
    match pattern.split_once("*.") {
        Some((prefix, suffix)) => origin
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(suffix))
            .and_then(|label| label.strip_suffix('.'))
            .is_some_and(|label| !label.is_empty() && !label.contains(['/', '.'])),
        None => pattern == origin,
    }
}
