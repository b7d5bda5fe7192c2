//! Report persistence behind a pluggable `ReportStore` trait.
//!
//! `AppState` holds an `Arc<dyn ReportStore>`, selected via `REPORT_STORE`.

pub mod postgres;

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::report::{AtsReport, ReportDetail, ReportListResponse};

pub use postgres::PgReportStore;

/// Most reports a single `list` call fetches.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Fetchable `(offset, count)` for a requested page. Negative values fetch
/// nothing past the start; responses still echo the request as given.
pub fn page_bounds(skip: i64, limit: i64) -> (i64, i64) {
    (skip.max(0), limit.clamp(0, MAX_PAGE_SIZE))
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn save(&self, report: &AtsReport, resume_filename: Option<&str>)
        -> Result<(), AppError>;

    async fn get(&self, report_id: &str) -> Result<Option<ReportDetail>, AppError>;

    /// Newest first. `skip` and `limit` are echoed exactly as requested;
    /// implementations fetch within `page_bounds`.
    async fn list(&self, skip: i64, limit: i64) -> Result<ReportListResponse, AppError>;

    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// MockReportStore
// ────────────────────────────────────────────────────────────────────────────

/// Stores nothing. `get` echoes the requested id into a fixed report and
/// `list` is always empty.
pub struct MockReportStore;

impl MockReportStore {
    pub fn report(report_id: &str) -> ReportDetail {
        ReportDetail {
            report_id: report_id.to_string(),
            ats_score: 75.5,
            skill_match_percentage: 68.3,
            matched_keywords: vec!["Python".into(), "FastAPI".into(), "React".into()],
            missing_keywords: vec!["Docker".into(), "Kubernetes".into()],
            summary: "Mock report data".to_string(),
            recommendations: vec!["Add Docker experience".into()],
            created_at: None,
            resume_filename: None,
        }
    }
}

#[async_trait]
impl ReportStore for MockReportStore {
    async fn save(&self, _report: &AtsReport, _resume_filename: Option<&str>) -> Result<(), AppError> {
        Ok(())
    }

    async fn get(&self, report_id: &str) -> Result<Option<ReportDetail>, AppError> {
        Ok(Some(Self::report(report_id)))
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<ReportListResponse, AppError> {
        Ok(ReportListResponse {
            total: 0,
            reports: vec![],
            skip,
            limit,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryReportStore
// ────────────────────────────────────────────────────────────────────────────

const DEFAULT_CAPACITY: usize = 1000;

/// Process-local store for development and single-instance demos. Reports
/// are lost on restart; beyond `capacity` the oldest are evicted.
pub struct MemoryReportStore {
    capacity: usize,
    /// Newest first.
    reports: RwLock<VecDeque<ReportDetail>>,
}

impl MemoryReportStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            reports: RwLock::new(VecDeque::new()),
        }
    }
}

impl Default for MemoryReportStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn save(&self, report: &AtsReport, resume_filename: Option<&str>) -> Result<(), AppError> {
        let detail = ReportDetail::from_report(report, resume_filename, Some(Utc::now()));
        let mut reports = self.reports.write().await;
        if let Some(pos) = reports.iter().position(|r| r.report_id == detail.report_id) {
            reports.remove(pos);
        }
        reports.push_front(detail);
        reports.truncate(self.capacity);
        Ok(())
    }

    async fn get(&self, report_id: &str) -> Result<Option<ReportDetail>, AppError> {
        let reports = self.reports.read().await;
        Ok(reports.iter().find(|r| r.report_id == report_id).cloned())
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<ReportListResponse, AppError> {
        let (offset, count) = page_bounds(skip, limit);
        let reports = self.reports.read().await;
        let page = reports
            .iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(count).unwrap_or(0))
            .cloned()
            .collect();

        Ok(ReportListResponse {
            total: reports.len() as i64,
            reports: page,
            skip,
            limit,
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, score: f64) -> AtsReport {
        AtsReport {
            ats_score: score,
            skill_match_percentage: 50.0,
            matched_keywords: vec!["Rust".into()],
            missing_keywords: vec!["Kafka".into()],
            summary: "summary".into(),
            recommendations: vec!["Add Kafka experience to your resume".into()],
            report_id: id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_store_echoes_id() {
        let store = MockReportStore;
        let detail = store.get("abc-123").await.unwrap().unwrap();
        assert_eq!(detail.report_id, "abc-123");
        assert_eq!(detail.summary, "Mock report data");
        assert_eq!(detail.ats_score, 75.5);
    }

    #[tokio::test]
    async fn test_mock_store_list_is_empty_and_echoes_paging() {
        let store = MockReportStore;
        store.save(&report("r1", 10.0), None).await.unwrap();
        let page = store.list(5, 20).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.reports.is_empty());
        assert_eq!(page.skip, 5);
        assert_eq!(page.limit, 20);
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryReportStore::default();
        store.save(&report("r1", 42.0), Some("cv.pdf")).await.unwrap();

        let detail = store.get("r1").await.unwrap().unwrap();
        assert_eq!(detail.ats_score, 42.0);
        assert_eq!(detail.resume_filename.as_deref(), Some("cv.pdf"));
        assert!(detail.created_at.is_some());
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_lists_newest_first_with_paging() {
        let store = MemoryReportStore::default();
        for (i, id) in ["r1", "r2", "r3"].iter().enumerate() {
            store.save(&report(id, i as f64), None).await.unwrap();
        }

        let page = store.list(0, 2).await.unwrap();
        assert_eq!(page.total, 3);
        let ids: Vec<_> = page.reports.iter().map(|r| r.report_id.as_str()).collect();
        assert_eq!(ids, vec!["r3", "r2"]);

        let page = store.list(2, 10).await.unwrap();
        assert_eq!(page.reports.len(), 1);
        assert_eq!(page.reports[0].report_id, "r1");

        let page = store.list(10, 10).await.unwrap();
        assert!(page.reports.is_empty());
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn test_memory_store_resave_replaces() {
        let store = MemoryReportStore::default();
        store.save(&report("r1", 1.0), None).await.unwrap();
        store.save(&report("r1", 2.0), None).await.unwrap();
        let page = store.list(0, 10).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.reports[0].ats_score, 2.0);
    }

    #[tokio::test]
    async fn test_memory_store_evicts_oldest_past_capacity() {
        let store = MemoryReportStore::new(2);
        for id in ["r1", "r2", "r3"] {
            store.save(&report(id, 1.0), None).await.unwrap();
        }
        let page = store.list(0, 10).await.unwrap();
        assert_eq!(page.total, 2);
        let ids: Vec<_> = page.reports.iter().map(|r| r.report_id.as_str()).collect();
        assert_eq!(ids, vec!["r3", "r2"]);
        assert!(store.get("r1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_echoes_out_of_range_paging() {
        let store = MemoryReportStore::default();
        for id in ["r1", "r2", "r3"] {
            store.save(&report(id, 1.0), None).await.unwrap();
        }

        let page = store.list(-2, 500).await.unwrap();
        assert_eq!(page.skip, -2);
        assert_eq!(page.limit, 500);
        assert_eq!(page.reports.len(), 3);

        let page = store.list(0, -1).await.unwrap();
        assert_eq!(page.limit, -1);
        assert!(page.reports.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_page_bounds_clamps_fetch_window() {
        assert_eq!(page_bounds(5, 20), (5, 20));
        assert_eq!(page_bounds(-3, 10), (0, 10));
        assert_eq!(page_bounds(0, -7), (0, 0));
        assert_eq!(page_bounds(0, 500), (0, MAX_PAGE_SIZE));
    }
}
