use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::report::{AtsReport, ReportDetail, ReportListResponse};
use crate::storage::{page_bounds, ReportStore};

const REPORT_COLUMNS: &str = "report_id, ats_score, skill_match_percentage, matched_keywords, \
     missing_keywords, summary, recommendations, created_at, resume_filename";

/// Reports persisted in the `ats_reports` table.
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn save(&self, report: &AtsReport, resume_filename: Option<&str>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO ats_reports
                (report_id, ats_score, skill_match_percentage, matched_keywords,
                 missing_keywords, summary, recommendations, resume_filename)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&report.report_id)
        .bind(report.ats_score)
        .bind(report.skill_match_percentage)
        .bind(&report.matched_keywords)
        .bind(&report.missing_keywords)
        .bind(&report.summary)
        .bind(&report.recommendations)
        .bind(resume_filename)
        .execute(&self.pool)
        .await?;

        info!("Stored report {}", report.report_id);
        Ok(())
    }

    async fn get(&self, report_id: &str) -> Result<Option<ReportDetail>, AppError> {
        let query = format!("SELECT {REPORT_COLUMNS} FROM ats_reports WHERE report_id = $1");
        Ok(sqlx::query_as::<_, ReportDetail>(&query)
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<ReportListResponse, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ats_reports")
            .fetch_one(&self.pool)
            .await?;

        let (offset, count) = page_bounds(skip, limit);
        let query = format!(
            "SELECT {REPORT_COLUMNS} FROM ats_reports ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let reports = sqlx::query_as::<_, ReportDetail>(&query)
            .bind(count)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(ReportListResponse {
            total,
            reports,
            skip,
            limit,
        })
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
