//! Corpus import from JSON exports.
//!
//! Walks `[import].root`, keeps files matching the include globs and not
//! the exclude globs, and upserts every document they hold. A file holds
//! either one document object or an array of them:
//!
//! ```json
//! {
//!   "id": 42,
//!   "title": "Sourdough basics",
//!   "body": "<p>...</p>",
//!   "type": "post",
//!   "status": "publish",
//!   "slug": "sourdough-basics",
//!   "published_at": "2024-03-01T09:00:00Z",
//!   "meta": { "_yoast_wpseo_meta-robots-noindex": "1" }
//! }
//! ```
//!
//! Only `id` is required. Files are processed in path order, so when two
//! files carry the same id the later path wins.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use linkpilot_core::models::{DocumentId, DocumentMeta, DocumentStatus};

use crate::config::{Config, ImportConfig};
use crate::sqlite_store::{SqliteStore, StoredDocument};

#[derive(Debug, Deserialize)]
pub struct ImportRecord {
    pub id: DocumentId,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "content")]
    pub body: String,
    #[serde(default = "default_doc_type", rename = "type", alias = "post_type")]
    pub doc_type: String,
    #[serde(default = "default_status")]
    pub status: DocumentStatus,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meta: DocumentMeta,
}

fn default_doc_type() -> String {
    "post".to_string()
}

fn default_status() -> DocumentStatus {
    DocumentStatus::Publish
}

impl ImportRecord {
    fn to_stored(&self) -> StoredDocument {
        StoredDocument {
            id: self.id,
            title: self.title.clone(),
            body: self.body.clone(),
            doc_type: self.doc_type.clone(),
            status: self.status,
            slug: self.slug.clone(),
            published_at: self.published_at.map_or(0, |dt| dt.timestamp()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Many(Vec<ImportRecord>),
    One(Box<ImportRecord>),
}

impl ImportFile {
    fn into_records(self) -> Vec<ImportRecord> {
        match self {
            ImportFile::Many(records) => records,
            ImportFile::One(record) => vec![*record],
        }
    }
}

/// Totals reported by [`import_corpus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub files: usize,
    pub documents: usize,
}

/// Parse one export file.
pub fn parse_file(path: &Path) -> Result<Vec<ImportRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file: ImportFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(file.into_records())
}

/// Files under the import root selected by the globs, sorted by path.
pub fn scan_files(import: &ImportConfig) -> Result<Vec<PathBuf>> {
    let root = &import.root;
    if !root.exists() {
        bail!("Import root does not exist: {}", root.display());
    }

    let include_set = build_globset(&import.include_globs)?;
    let exclude_set = build_globset(&import.exclude_globs)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy();

        if exclude_set.is_match(rel_str.as_ref()) || !include_set.is_match(rel_str.as_ref()) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Import every selected file into the database.
pub async fn import_corpus(config: &Config) -> Result<ImportStats> {
    let import = config
        .import
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Import not configured: add an [import] section"))?;

    let files = scan_files(import)?;
    let store = SqliteStore::open(config).await?;

    let mut stats = ImportStats::default();
    for path in &files {
        let records = parse_file(path)?;
        for record in &records {
            store.upsert_document(&record.to_stored()).await?;
            store.replace_meta(record.id, &record.meta).await?;
        }
        tracing::debug!(file = %path.display(), documents = records.len(), "imported file");
        stats.files += 1;
        stats.documents += records.len();
    }

    tracing::info!(
        files = stats.files,
        documents = stats.documents,
        "import complete"
    );
    Ok(stats)
}

pub async fn run_import(config: &Config) -> Result<()> {
    let stats = import_corpus(config).await?;
    println!("files: {}", stats.files);
    println!("imported documents: {}", stats.documents);
    println!("ok");
    Ok(())
}
