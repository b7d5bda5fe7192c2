//! Resume analyzers: a pluggable trait that turns an upload and a job
//! description into an `AtsReport`.
//!
//! Default: `MockAnalyzer` (fixed payload, no parsing).
//! Opt-in: `KeywordAnalyzer` (text extraction + JD keyword coverage).
//!
//! `AppState` holds an `Arc<dyn ResumeAnalyzer>`, selected at startup via
//! `ANALYZER_BACKEND`.

use std::collections::HashSet;

use anyhow::anyhow;
use async_trait::async_trait;
use uuid::Uuid;

use crate::analysis::extract::extract_text;
use crate::analysis::impact::{summarize_impact, ImpactSummary};
use crate::analysis::keywords::{extract_keywords, tokenize, KeywordEntry};
use crate::analysis::upload::ResumeUpload;
use crate::errors::AppError;
use crate::models::report::AtsReport;

/// Strength at or above which a keyword counts as matched.
const MATCH_THRESHOLD: f32 = 0.4;
/// Strength of a whole-token match.
const TOKEN_MATCH: f32 = 1.0;
/// Strength of a substring-only match, e.g. `react` inside `react.js`.
const SUBSTRING_MATCH: f32 = 0.6;
/// Shorter keywords only match whole tokens (`go` must not match `google`).
const MIN_SUBSTRING_LEN: usize = 3;

const KEYWORD_WEIGHT: f64 = 0.8;
const IMPACT_WEIGHT: f64 = 0.2;
/// Below this share of quantified statements, a metrics recommendation is added.
const IMPACT_TARGET: f64 = 0.5;
const MAX_GAP_RECOMMENDATIONS: usize = 5;

/// The analyzer trait. Implement this to swap backends without touching
/// the endpoint or handler code.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        upload: &ResumeUpload,
        job_description: &str,
    ) -> Result<AtsReport, AppError>;

    /// Short label for logs and health output.
    fn backend(&self) -> &'static str;

    /// Whether the analyzer's model/resources are ready to serve requests.
    fn is_loaded(&self) -> bool {
        true
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MockAnalyzer
// ────────────────────────────────────────────────────────────────────────────

/// Returns the same report for every accepted upload.
pub struct MockAnalyzer;

pub const MOCK_REPORT_ID: &str = "temp_report_123";

impl MockAnalyzer {
    pub fn report() -> AtsReport {
        AtsReport {
            ats_score: 75.5,
            skill_match_percentage: 68.3,
            matched_keywords: strings(&[
                "Python",
                "FastAPI",
                "React",
                "PostgreSQL",
                "Machine Learning",
                "REST API",
            ]),
            missing_keywords: strings(&["Docker", "Kubernetes", "AWS", "CI/CD", "TensorFlow"]),
            summary: "Your resume shows strong alignment with the job requirements, particularly in backend development and API design. Consider adding more keywords related to DevOps and cloud technologies.".to_string(),
            recommendations: strings(&[
                "Add Docker and containerization experience to your resume",
                "Include specific cloud platform experience (AWS/Azure/GCP)",
                "Highlight CI/CD pipeline implementation",
                "Mention any experience with scalable system design",
                "Add metrics and quantifiable achievements",
            ]),
            report_id: MOCK_REPORT_ID.to_string(),
        }
    }
}

#[async_trait]
impl ResumeAnalyzer for MockAnalyzer {
    async fn analyze(
        &self,
        _upload: &ResumeUpload,
        _job_description: &str,
    ) -> Result<AtsReport, AppError> {
        Ok(Self::report())
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordAnalyzer
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic keyword-coverage analyzer. No model, no network.
///
/// Algorithm:
/// 1. Extract resume text (PDF / DOCX / plain text)
/// 2. Build the JD keyword inventory
/// 3. Per keyword: whole-token match → 1.0, substring match → 0.6, else 0.0
/// 4. ats_score = (0.8 × weighted coverage + 0.2 × quantified-statement ratio) × 100
pub struct KeywordAnalyzer {
    min_keyword_length: usize,
    max_keywords: usize,
    max_document_bytes: usize,
}

impl KeywordAnalyzer {
    pub fn new(min_keyword_length: usize, max_keywords: usize, max_document_bytes: usize) -> Self {
        Self {
            min_keyword_length,
            max_keywords,
            max_document_bytes,
        }
    }
}

#[async_trait]
impl ResumeAnalyzer for KeywordAnalyzer {
    async fn analyze(
        &self,
        upload: &ResumeUpload,
        job_description: &str,
    ) -> Result<AtsReport, AppError> {
        if job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "job_description cannot be empty".to_string(),
            ));
        }

        let data = upload.data.clone();
        let extension = upload.extension.clone();
        let limit = self.max_document_bytes;
        let resume_text = tokio::task::spawn_blocking(move || extract_text(&data, &extension, limit))
            .await
            .map_err(|e| AppError::Internal(anyhow!("text extraction task failed: {e}")))??;

        tracing::debug!(
            "Extracted {} characters from {}",
            resume_text.len(),
            upload.filename
        );

        let keywords = extract_keywords(job_description, self.min_keyword_length, self.max_keywords);
        let report_id = format!("rpt_{}", Uuid::new_v4().simple());

        Ok(score_resume(&resume_text, &keywords, report_id))
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core scoring
// ────────────────────────────────────────────────────────────────────────────

fn keyword_strength(keyword: &str, resume_tokens: &HashSet<String>, resume_lower: &str) -> f32 {
    if resume_tokens.contains(keyword) {
        TOKEN_MATCH
    } else if keyword.chars().count() >= MIN_SUBSTRING_LEN && resume_lower.contains(keyword) {
        SUBSTRING_MATCH
    } else {
        0.0
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn score_resume(resume_text: &str, keywords: &[KeywordEntry], report_id: String) -> AtsReport {
    if keywords.is_empty() {
        return AtsReport {
            ats_score: 0.0,
            skill_match_percentage: 0.0,
            matched_keywords: vec![],
            missing_keywords: vec![],
            summary: "No keywords could be extracted from the job description, so the resume cannot be scored."
                .to_string(),
            recommendations: vec![
                "Provide a more detailed job description with concrete skills and requirements"
                    .to_string(),
            ],
            report_id,
        };
    }

    let resume_lower = resume_text.to_lowercase();
    let resume_tokens: HashSet<String> = tokenize(&resume_lower).map(String::from).collect();

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut total_weighted = 0.0_f64;
    let mut total_score = 0.0_f64;

    for entry in keywords {
        let strength = keyword_strength(&entry.normalized(), &resume_tokens, &resume_lower);
        total_weighted += entry.weighted_score as f64;
        total_score += strength as f64 * entry.weighted_score as f64;

        if strength >= MATCH_THRESHOLD {
            matched.push(entry.keyword.clone());
        } else {
            missing.push(entry.keyword.clone());
        }
    }

    let coverage = if total_weighted > 0.0 {
        total_score / total_weighted
    } else {
        0.0
    };
    let impact = summarize_impact(resume_text);

    let ats_score =
        round1(((KEYWORD_WEIGHT * coverage + IMPACT_WEIGHT * impact.ratio()) * 100.0).clamp(0.0, 100.0));
    let skill_match_percentage =
        round1((matched.len() as f64 / keywords.len() as f64 * 100.0).clamp(0.0, 100.0));

    let summary = build_summary(ats_score, matched.len(), keywords.len(), &missing);
    let recommendations = build_recommendations(&missing, &impact);

    AtsReport {
        ats_score,
        skill_match_percentage,
        matched_keywords: matched,
        missing_keywords: missing,
        summary,
        recommendations,
        report_id,
    }
}

/// Builds a human-readable summary from score and gaps.
fn build_summary(score: f64, matched: usize, total: usize, missing: &[String]) -> String {
    let top_gaps: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();

    if score >= 80.0 {
        format!(
            "Strong alignment with the job requirements. Your resume covers {matched} of {total} key terms."
        )
    } else if top_gaps.is_empty() {
        format!("Partial alignment ({score}/100). Strengthen how your existing skills are presented.")
    } else if score >= 60.0 {
        format!(
            "Moderate alignment ({score}/100). Consider adding: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Low alignment ({score}/100). Significant gaps: {}.",
            top_gaps.join(", ")
        )
    }
}

fn build_recommendations(missing: &[String], impact: &ImpactSummary) -> Vec<String> {
    let mut recommendations: Vec<String> = missing
        .iter()
        .take(MAX_GAP_RECOMMENDATIONS)
        .map(|kw| format!("Add {kw} experience to your resume"))
        .collect();

    if impact.ratio() < IMPACT_TARGET {
        recommendations.push("Add metrics and quantifiable achievements".to_string());
    }
    if let Some(verb) = impact.vague_verbs.first() {
        recommendations.push(format!(
            "Replace vague phrasing such as '{verb}' with measurable outcomes"
        ));
    }
    if recommendations.is_empty() {
        recommendations.push(
            "Your resume covers the key requirements; tailor the summary section to this role"
                .to_string(),
        );
    }
    recommendations
}
