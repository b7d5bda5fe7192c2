use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::models::report::HealthResponse;
use crate::state::AppState;

/// GET /api/v1/health
/// Returns service status, version, and whether the analyzer is ready.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.config.api_version.clone(),
        service: state.config.api_title.clone(),
        ml_model_loaded: state.analyzer.is_loaded(),
    })
}

/// GET /
/// Service banner.
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": format!("{} API", state.config.api_title),
        "version": state.config.api_version,
        "status": "running",
        "docs": "/docs"
    }))
}

/// GET /docs
/// Lists the public endpoints.
pub async fn docs_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "title": format!("{} API", state.config.api_title),
        "version": state.config.api_version,
        "endpoints": [
            { "method": "GET", "path": "/api/v1/health", "description": "Service health" },
            { "method": "POST", "path": "/api/v1/analyze", "description": "Analyze a resume (multipart: resume_file, job_description)" },
            { "method": "GET", "path": "/api/v1/report/{report_id}", "description": "Fetch a report" },
            { "method": "GET", "path": "/api/v1/reports?skip&limit", "description": "List reports" }
        ]
    }))
}
