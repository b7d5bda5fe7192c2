use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the reports table and its listing index if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ats_reports (
            report_id              TEXT PRIMARY KEY,
            ats_score              DOUBLE PRECISION NOT NULL
                                   CHECK (ats_score BETWEEN 0 AND 100),
            skill_match_percentage DOUBLE PRECISION NOT NULL
                                   CHECK (skill_match_percentage BETWEEN 0 AND 100),
            matched_keywords       TEXT[] NOT NULL DEFAULT '{}',
            missing_keywords       TEXT[] NOT NULL DEFAULT '{}',
            summary                TEXT NOT NULL,
            recommendations        TEXT[] NOT NULL DEFAULT '{}',
            resume_filename        TEXT,
            created_at             TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS ats_reports_created_at_idx ON ats_reports (created_at DESC)",
    )
    .execute(pool)
    .await?;

    info!("Report schema ready");
    Ok(())
}
