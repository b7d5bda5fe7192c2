// Resume analysis: upload intake, text extraction, JD keywords, scoring.
// Handlers depend only on the `ResumeAnalyzer` trait, never on a backend.

pub mod analyzer;
pub mod extract;
pub mod handlers;
pub mod impact;
pub mod keywords;
pub mod upload;
