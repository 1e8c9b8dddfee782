use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// What happens to an uploaded résumé file after its text has been extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Leave the file in the uploads directory (batch-matcher behavior).
    Keep,
    /// Remove the file once extraction has run.
    Delete,
}

/// One course catalog source: a platform label plus the CSV file backing it.
/// The order of sources in `Config::catalog_sources` is the lookup priority.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    pub platform: String,
    pub path: PathBuf,
}

/// Application configuration loaded from environment variables.
/// Every variable has a default suitable for local single-operator use.
#[derive(Debug, Clone)]
pub struct Config {
    pub upload_dir: PathBuf,
    pub store_path: PathBuf,
    pub retention: RetentionPolicy,
    pub top_k: usize,
    /// Ordered list: the first source that yields a course wins.
    pub catalog_sources: Vec<CatalogSource>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let retention = match optional_env("RETENTION_POLICY", "keep").to_lowercase().as_str() {
            "keep" => RetentionPolicy::Keep,
            "delete" => RetentionPolicy::Delete,
            other => bail!("RETENTION_POLICY must be 'keep' or 'delete', got '{other}'"),
        };

        Ok(Config {
            upload_dir: PathBuf::from(optional_env("UPLOAD_DIR", "uploads")),
            store_path: PathBuf::from(optional_env("STORE_PATH", "users.json")),
            retention,
            top_k: optional_env("TOP_K", "3")
                .parse::<usize>()
                .context("TOP_K must be a positive integer")?,
            catalog_sources: parse_catalog_sources(&optional_env(
                "CATALOG_SOURCES",
                "Coursera=data/coursera.csv,Udemy=data/udemy.csv",
            ))?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses `CATALOG_SOURCES` of the form `Platform=path.csv,Platform2=path2.csv`.
/// Order is preserved: it defines the primary/secondary fallback priority.
fn parse_catalog_sources(raw: &str) -> Result<Vec<CatalogSource>> {
    let mut sources = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (platform, path) = part
            .split_once('=')
            .with_context(|| format!("Catalog source '{part}' must be 'Platform=path.csv'"))?;
        sources.push(CatalogSource {
            platform: platform.trim().to_string(),
            path: PathBuf::from(path.trim()),
        });
    }
    if sources.is_empty() {
        bail!("CATALOG_SOURCES must name at least one source");
    }
    Ok(sources)
}
