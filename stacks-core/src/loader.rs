//! Catalog loading: fetch the manifest, fan out over every listed entry
//! concurrently, and publish the catalog once after all fetches settle.

use crate::catalog::{Catalog, CatalogEntry};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Manifest filename at the root of a catalog source.
pub const MANIFEST_NAME: &str = "db.json";
/// Subdirectory holding the per-entry JSON files.
pub const ENTRIES_DIR: &str = "books";

/// Transport-level failure from a [`CatalogSource`].
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where catalog bytes come from.
///
/// Abstracts over HTTP and on-disk layouts so the loader (and its tests)
/// never care about transport. `fetch_entry` returns `Ok(None)` when the
/// resource is simply absent (e.g. a 404), which the loader treats as a
/// skippable per-entry condition rather than a failure.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// The ordered list of entry filenames.
    async fn fetch_manifest(&self) -> Result<Vec<String>, SourceError>;

    /// The raw body of one entry file, or `None` if it does not exist.
    async fn fetch_entry(&self, filename: &str) -> Result<Option<String>, SourceError>;
}

/// HTTP-backed source: manifest at `<base>/db.json`, entries at
/// `<base>/books/<filename>`.
pub struct HttpCatalogSource {
    base_url: String,
    http: reqwest::Client,
}

impl HttpCatalogSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpCatalogSource {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_manifest(&self) -> Result<Vec<String>, SourceError> {
        let url = format!("{}/{}", self.base_url, MANIFEST_NAME);
        let resp = self.http.get(&url).send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }

    async fn fetch_entry(&self, filename: &str) -> Result<Option<String>, SourceError> {
        let url = format!("{}/{}/{}", self.base_url, ENTRIES_DIR, filename);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        Ok(Some(resp.text().await?))
    }
}

/// Directory-backed source with the same layout as [`HttpCatalogSource`],
/// used by the headless server to read the catalog it serves.
pub struct DirCatalogSource {
    root: PathBuf,
}

impl DirCatalogSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirCatalogSource { root: root.into() }
    }
}

#[async_trait]
impl CatalogSource for DirCatalogSource {
    async fn fetch_manifest(&self) -> Result<Vec<String>, SourceError> {
        let text = tokio::fs::read_to_string(self.root.join(MANIFEST_NAME)).await?;
        serde_json::from_str(&text).map_err(|e| {
            SourceError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    async fn fetch_entry(&self, filename: &str) -> Result<Option<String>, SourceError> {
        match tokio::fs::read_to_string(self.root.join(ENTRIES_DIR).join(filename)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Fatal load outcomes. Per-entry problems never appear here; they are
/// resolved locally (skip or placeholder) and logged.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("manifest unavailable: {0}")]
    ManifestUnavailable(String),
    #[error("load cancelled")]
    Cancelled,
}

/// Load a full catalog from `source`.
pub async fn load(source: &dyn CatalogSource) -> Result<Catalog, LoadError> {
    load_with_cancel(source, &CancellationToken::new()).await
}

/// Load a full catalog, bailing out early if `cancel` fires (e.g. the view
/// that requested the load went away). A cancelled load publishes nothing.
pub async fn load_with_cancel(
    source: &dyn CatalogSource,
    cancel: &CancellationToken,
) -> Result<Catalog, LoadError> {
    let manifest = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(LoadError::Cancelled),
        result = source.fetch_manifest() => {
            result.map_err(|e| LoadError::ManifestUnavailable(e.to_string()))?
        }
    };

    // Fan out over every entry at once; join_all waits for every outcome,
    // so one slow or failing fetch never drops the others' results.
    let fetches = manifest.iter().map(|filename| async move {
        (filename.as_str(), source.fetch_entry(filename).await)
    });
    let outcomes = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(LoadError::Cancelled),
        outcomes = futures::future::join_all(fetches) => outcomes,
    };

    let mut catalog = Catalog::new();
    for (filename, outcome) in outcomes {
        let id = entry_id(filename);
        match outcome {
            Ok(Some(body)) if body.trim().is_empty() => {
                warn!("Entry {filename} has an empty body, skipping");
            }
            Ok(Some(body)) => match parse_entry(&body) {
                Some(entry) => catalog.insert(id, entry),
                None => {
                    warn!("Entry {filename} failed to parse, inserting placeholder");
                    catalog.insert(id, CatalogEntry::placeholder());
                }
            },
            Ok(None) => {
                warn!("Entry {filename} unavailable, skipping");
            }
            Err(e) => {
                warn!("Fetching entry {filename} failed: {e}, skipping");
            }
        }
    }

    info!(
        "Catalog loaded: {} of {} manifest entries",
        catalog.len(),
        manifest.len()
    );
    Ok(catalog)
}

/// Entry id: the manifest filename with its `.json` suffix removed.
pub fn entry_id(filename: &str) -> &str {
    filename.strip_suffix(".json").unwrap_or(filename)
}

/// Parse one entry body, tolerating the usual copy-paste damage (BOM,
/// stray newlines/tabs, non-breaking spaces). Returns `None` when the
/// cleaned text still is not a valid entry object.
pub fn parse_entry(body: &str) -> Option<CatalogEntry> {
    serde_json::from_str(&sanitize(body)).ok()
}

fn sanitize(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut cleaned = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        let c = match c {
            '\r' | '\n' | '\t' => continue,
            '\u{a0}' => ' ',
            c => c,
        };
        if c == ' ' {
            pending_space = !cleaned.is_empty();
            continue;
        }
        if pending_space {
            cleaned.push(' ');
            pending_space = false;
        }
        cleaned.push(c);
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_strips_json_suffix() {
        assert_eq!(entry_id("dune.json"), "dune");
        assert_eq!(entry_id("the.hobbit.json"), "the.hobbit");
        assert_eq!(entry_id("readme.txt"), "readme.txt");
    }

    #[test]
    fn sanitize_strips_bom_and_collapses_whitespace() {
        assert_eq!(sanitize("\u{feff}{\"a\":1}"), "{\"a\":1}");
        assert_eq!(sanitize("  {\r\n\t\"a\":  1\n}  "), "{\"a\": 1}");
        assert_eq!(sanitize("{\u{a0}\"a\":1}"), "{ \"a\":1}");
    }

    #[test]
    fn parse_entry_accepts_partial_objects() {
        let entry = parse_entry("{\"title\": \"Dune\"}").unwrap();
        assert_eq!(entry.title, "Dune");
        assert_eq!(entry.author, "");
        assert_eq!(entry.shared_by, None);
    }

    #[test]
    fn parse_entry_rejects_non_objects() {
        assert!(parse_entry("{not json").is_none());
        assert!(parse_entry("[1, 2]").is_none());
        assert!(parse_entry("\"just a string\"").is_none());
    }

    #[test]
    fn parse_entry_tolerates_bom_and_newlines() {
        let body = "\u{feff}{\n  \"title\": \"Dune\",\n  \"sharedBy\": \"Sam\"\n}\n";
        let entry = parse_entry(body).unwrap();
        assert_eq!(entry.title, "Dune");
        assert_eq!(entry.shared_by.as_deref(), Some("Sam"));
    }
}
