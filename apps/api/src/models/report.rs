use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Result of analyzing one resume against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    /// Overall ATS score, 0 – 100.
    pub ats_score: f64,
    /// Share of JD keywords found in the resume, 0 – 100.
    pub skill_match_percentage: f64,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub report_id: String,
}

/// A stored report, as returned by the report endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReportDetail {
    pub report_id: String,
    pub ats_score: f64,
    pub skill_match_percentage: f64,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub summary: String,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_filename: Option<String>,
}

impl ReportDetail {
    pub fn from_report(
        report: &AtsReport,
        resume_filename: Option<&str>,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            report_id: report.report_id.clone(),
            ats_score: report.ats_score,
            skill_match_percentage: report.skill_match_percentage,
            matched_keywords: report.matched_keywords.clone(),
            missing_keywords: report.missing_keywords.clone(),
            summary: report.summary.clone(),
            recommendations: report.recommendations.clone(),
            created_at,
            resume_filename: resume_filename.map(String::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportListResponse {
    pub total: i64,
    pub reports: Vec<ReportDetail>,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub ml_model_loaded: bool,
}
