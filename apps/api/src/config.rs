use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which analyzer backs `POST /api/v1/analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerBackend {
    /// Fixed payload for any accepted upload.
    Mock,
    /// Text extraction + JD keyword matching.
    Keyword,
}

impl FromStr for AnalyzerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "keyword" => Ok(Self::Keyword),
            other => bail!("ANALYZER_BACKEND must be 'mock' or 'keyword', got '{other}'"),
        }
    }
}

/// Where generated reports are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStoreKind {
    Mock,
    Memory,
    Postgres,
}

impl FromStr for ReportStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => bail!("REPORT_STORE must be 'mock', 'memory' or 'postgres', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every value has a default; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub api_title: String,
    pub api_version: String,
    pub debug: bool,
    pub database_url: Option<String>,
    /// Lowercased, dot-prefixed extensions, e.g. `.pdf`.
    pub allowed_extensions: Vec<String>,
    pub max_upload_size: usize,
    /// Cap on decompressed document text read during extraction.
    pub max_extracted_size: usize,
    pub cors_origins: Vec<String>,
    pub analyzer_backend: AnalyzerBackend,
    pub report_store: ReportStoreKind,
    pub min_keyword_length: usize,
    pub max_keywords: usize,
    /// Reports kept by the in-memory store before the oldest are evicted.
    pub memory_store_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a closure over fixed values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let debug = get("DEBUG")
            .map(|v| parse_bool(&v).with_context(|| format!("DEBUG must be a boolean, got '{v}'")))
            .transpose()?
            .unwrap_or(false);

        let database_url = get("DATABASE_URL");
        if let Some(url) = &database_url {
            if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                bail!("DATABASE_URL must start with postgresql:// or postgres://");
            }
        }

        let allowed_extensions = get("ALLOWED_EXTENSIONS")
            .map(|v| parse_list(&v))
            .unwrap_or_else(|| vec![".pdf".into(), ".docx".into(), ".doc".into()])
            .into_iter()
            .map(|ext| normalize_extension(&ext))
            .collect::<Vec<_>>();
        if allowed_extensions.is_empty() {
            bail!("ALLOWED_EXTENSIONS cannot be empty");
        }

        let min_keyword_length = parse_or(&get, "MIN_KEYWORD_LENGTH", 2usize)?;
        let max_keywords = parse_or(&get, "MAX_KEYWORDS", 50usize)?;
        if max_keywords == 0 {
            bail!("MAX_KEYWORDS must be greater than zero");
        }

        let max_upload_size = parse_or(&get, "MAX_UPLOAD_SIZE", 10 * 1024 * 1024usize)?;
        let max_extracted_size =
            parse_or(&get, "MAX_EXTRACTED_SIZE", max_upload_size.saturating_mul(8))?;
        if max_extracted_size == 0 {
            bail!("MAX_EXTRACTED_SIZE must be greater than zero");
        }

        let memory_store_capacity = parse_or(&get, "MEMORY_STORE_CAPACITY", 1000usize)?;
        if memory_store_capacity == 0 {
            bail!("MEMORY_STORE_CAPACITY must be greater than zero");
        }

        Ok(Config {
            port: parse_or(&get, "PORT", 8000u16)?,
            rust_log: get("RUST_LOG")
                .unwrap_or_else(|| (if debug { "debug" } else { "info" }).to_string()),
            api_title: get("API_TITLE").unwrap_or_else(|| "ATS Resume Analyzer".to_string()),
            api_version: get("API_VERSION").unwrap_or_else(|| "1.0.0".to_string()),
            debug,
            database_url,
            allowed_extensions,
            max_upload_size,
            max_extracted_size,
            cors_origins: get("CORS_ORIGINS")
                .map(|v| parse_list(&v))
                .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]),
            analyzer_backend: get("ANALYZER_BACKEND")
                .map(|v| v.parse::<AnalyzerBackend>())
                .transpose()?
                .unwrap_or(AnalyzerBackend::Mock),
            report_store: get("REPORT_STORE")
                .map(|v| v.parse::<ReportStoreKind>())
                .transpose()?
                .unwrap_or(ReportStoreKind::Mock),
            min_keyword_length,
            max_keywords,
            memory_store_capacity,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("not a boolean"),
    }
}

/// Splits a comma-separated list, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}
