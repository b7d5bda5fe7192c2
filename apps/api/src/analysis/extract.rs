//! Resume text extraction for the supported upload formats.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::errors::AppError;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Text extraction is not supported for '{0}' files")]
    Unsupported(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not read DOCX: {0}")]
    Docx(String),

    #[error("Resume is not valid UTF-8 text")]
    Encoding,

    #[error("No readable text found in the resume")]
    Empty,
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        AppError::UnprocessableEntity(e.to_string())
    }
}

/// Extracts plain text from an uploaded resume. `extension` is the
/// lowercased, dot-prefixed suffix produced by upload validation.
/// `max_document_bytes` bounds how much compressed content may expand to.
pub fn extract_text(
    bytes: &[u8],
    extension: &str,
    max_document_bytes: usize,
) -> Result<String, ExtractError> {
    let text = match extension {
        ".pdf" => extract_pdf(bytes)?,
        ".docx" => extract_docx(bytes, max_document_bytes)?,
        ".txt" | ".md" => String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::Encoding)?,
        other => return Err(ExtractError::Unsupported(other.to_string())),
    };

    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed documents instead of erroring.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(_) => Err(ExtractError::Pdf("malformed document".to_string())),
    }
}

fn docx_run_regex() -> &'static Regex {
    static RUN: OnceLock<Regex> = OnceLock::new();
    RUN.get_or_init(|| Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").expect("valid regex"))
}

fn too_large() -> ExtractError {
    ExtractError::Docx("document too large".to_string())
}

fn extract_docx(bytes: &[u8], max_document_bytes: usize) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let document = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    let limit = max_document_bytes as u64;
    if document.size() > limit {
        return Err(too_large());
    }

    // The declared size is attacker-controlled; the read itself stays bounded.
    let mut raw = Vec::new();
    document
        .take(limit + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    if raw.len() as u64 > limit {
        return Err(too_large());
    }

    let xml = String::from_utf8(raw).map_err(|_| ExtractError::Docx("invalid UTF-8".to_string()))?;
    Ok(document_xml_to_text(&xml))
}

/// Joins the text runs of each `<w:p>` paragraph, one paragraph per line.
fn document_xml_to_text(xml: &str) -> String {
    let run = docx_run_regex();
    xml.split("</w:p>")
        .map(|paragraph| {
            run.captures_iter(paragraph)
                .filter_map(|c| c.get(1))
                .map(|m| unescape_xml(m.as_str()))
                .collect::<String>()
        })
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Builds a minimal DOCX container with one paragraph per entry.
#[cfg(test)]
pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let body: String = paragraphs
        .iter()
        .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1024 * 1024;

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let docx = build_docx(&["Jane Doe", "Senior Rust Engineer", "Reduced latency by 40%"]);
        let text = extract_text(&docx, ".docx", LIMIT).unwrap();
        assert_eq!(
            text,
            "Jane Doe\nSenior Rust Engineer\nReduced latency by 40%"
        );
    }

    #[test]
    fn test_docx_runs_in_one_paragraph_are_joined() {
        let xml = r#"<w:body><w:p><w:r><w:t>Post</w:t></w:r><w:r><w:t xml:space="preserve">greSQL &amp; Redis</w:t></w:r></w:p><w:tbl/></w:body>"#;
        assert_eq!(document_xml_to_text(xml), "PostgreSQL & Redis");
    }

    #[test]
    fn test_docx_without_document_xml_fails() {
        let err = extract_text(b"not a zip archive", ".docx", LIMIT).unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }

    #[test]
    fn test_garbage_pdf_fails_cleanly() {
        let err = extract_text(b"dummy pdf content", ".pdf", LIMIT).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn test_legacy_doc_is_unsupported() {
        let err = extract_text(b"\xD0\xCF\x11\xE0", ".doc", LIMIT).unwrap_err();
        assert!(matches!(err, ExtractError::Unsupported(ext) if ext == ".doc"));
    }

    #[test]
    fn test_plain_text_requires_utf8() {
        assert!(matches!(
            extract_text(&[0xff, 0xfe, 0x00], ".txt", LIMIT).unwrap_err(),
            ExtractError::Encoding
        ));
        assert_eq!(extract_text(b"Rust, Tokio", ".txt", LIMIT).unwrap(), "Rust, Tokio");
    }

    #[test]
    fn test_blank_document_is_empty() {
        let docx = build_docx(&["   "]);
        assert!(matches!(
            extract_text(&docx, ".docx", LIMIT).unwrap_err(),
            ExtractError::Empty
        ));
    }

    #[test]
    fn test_extract_error_maps_to_422() {
        let err: AppError = ExtractError::Empty.into();
        assert_eq!(err.status(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_docx_expanding_past_limit_is_rejected() {
        let body = "Rust Tokio PostgreSQL ".repeat(20_000);
        let docx = build_docx(&[&body]);
        assert!(docx.len() < body.len() / 10);

        let err = extract_text(&docx, ".docx", 64 * 1024).unwrap_err();
        assert!(matches!(err, ExtractError::Docx(msg) if msg == "document too large"));

        let text = extract_text(&docx, ".docx", LIMIT).unwrap();
        assert_eq!(text.trim_end(), body.trim_end());
    }
}
