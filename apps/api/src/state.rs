use std::sync::Arc;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::config::Config;
use crate::storage::ReportStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable analyzer. Default: MockAnalyzer. Swap via ANALYZER_BACKEND.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
    /// Pluggable report store. Default: MockReportStore. Swap via REPORT_STORE.
    pub reports: Arc<dyn ReportStore>,
}
