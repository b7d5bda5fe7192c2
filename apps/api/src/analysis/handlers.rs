//! Axum route handlers for the analysis and report API.

use axum::{
    extract::{rejection::QueryRejection, Multipart, Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::analysis::upload::read_analyze_request;
use crate::errors::AppError;
use crate::models::report::{AtsReport, ReportDetail, ReportListResponse};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// POST /api/v1/analyze
///
/// Multipart: `resume_file` (PDF/DOCX/DOC) + `job_description` (text).
/// Returns the ATS report and stores it for later retrieval.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AtsReport>, AppError> {
    let request = read_analyze_request(multipart, &state.config).await?;

    let report = state
        .analyzer
        .analyze(&request.resume, &request.job_description)
        .await
        .inspect_err(|e| error!("Error during analysis of {}: {e}", request.resume.filename))?;

    state
        .reports
        .save(&report, Some(&request.resume.filename))
        .await?;

    info!(
        "Analysis completed: report {} (score {}, backend {})",
        report.report_id,
        report.ats_score,
        state.analyzer.backend()
    );
    Ok(Json(report))
}

/// GET /api/v1/report/:report_id
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<Json<ReportDetail>, AppError> {
    let report = state
        .reports
        .get(&report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {report_id} not found")))?;
    Ok(Json(report))
}

/// GET /api/v1/reports?skip=0&limit=10
///
/// Any integer `skip`/`limit` is accepted and echoed back; the store decides
/// how much it actually fetches. Non-integer values are a 400.
pub async fn handle_list_reports(
    State(state): State<AppState>,
    query: Result<Query<ListReportsQuery>, QueryRejection>,
) -> Result<Json<ReportListResponse>, AppError> {
    let Query(params) = query.map_err(|e| AppError::Validation(e.body_text()))?;

    let page = state.reports.list(params.skip, params.limit).await?;
    Ok(Json(page))
}
