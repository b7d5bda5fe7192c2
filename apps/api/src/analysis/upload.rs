//! Multipart intake for `POST /api/v1/analyze`.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;

pub const RESUME_FIELD: &str = "resume_file";
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// An uploaded resume whose extension has passed validation.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    /// Lowercased and dot-prefixed, e.g. `.pdf`.
    pub extension: String,
    pub data: Bytes,
}

#[derive(Debug)]
pub struct AnalyzeRequest {
    pub resume: ResumeUpload,
    pub job_description: String,
}

/// Checks `filename` against the allowed extensions and returns the
/// normalized extension (the suffix after the last `.`). Names without a
/// dot are rejected.
pub fn validate_extension(filename: &str, allowed: &[String]) -> Result<String, AppError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, suffix)| format!(".{}", suffix.to_lowercase()))
        .filter(|ext| allowed.contains(ext));

    extension.ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid file format. Allowed: {}",
            allowed.join(", ")
        ))
    })
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum allowed size".to_string())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", e.body_text()))
    }
}

/// Reads the resume file and job description out of the multipart body.
/// The extension is validated before the file bytes are read.
pub async fn read_analyze_request(
    mut multipart: Multipart,
    config: &Config,
) -> Result<AnalyzeRequest, AppError> {
    let mut resume: Option<ResumeUpload> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let filename = field
                    .file_name()
                    .map(String::from)
                    .filter(|f| !f.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::Validation(format!("{RESUME_FIELD} must include a filename"))
                    })?;
                info!("Received resume: {filename}");

                let extension = validate_extension(&filename, &config.allowed_extensions)?;
                let data = field.bytes().await.map_err(multipart_error)?;
                if data.len() > config.max_upload_size {
                    return Err(AppError::PayloadTooLarge(format!(
                        "File size {} bytes exceeds the limit of {} bytes",
                        data.len(),
                        config.max_upload_size
                    )));
                }
                info!("File size: {} bytes", data.len());

                resume = Some(ResumeUpload {
                    filename,
                    extension,
                    data,
                });
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let resume =
        resume.ok_or_else(|| AppError::Validation(format!("{RESUME_FIELD} is required")))?;
    let job_description = job_description
        .ok_or_else(|| AppError::Validation(format!("{JOB_DESCRIPTION_FIELD} is required")))?;

    Ok(AnalyzeRequest {
        resume,
        job_description,
    })
}
