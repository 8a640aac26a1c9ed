//! Core data models shared by the engine, the stores, and the transport layer.
//!
//! Everything here is a plain value: documents are read fresh from a
//! [`DocumentStore`](crate::store::DocumentStore) for each request and the
//! result types are serialized as-is by the HTTP and CLI frontends.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Corpus-unique document identifier.
pub type DocumentId = i64;

/// Free-form per-document metadata, keyed by meta name.
///
/// Sourced from the store's metadata layer and consumed by
/// [`IndexSignal`](crate::signals::IndexSignal) providers.
pub type DocumentMeta = HashMap<String, serde_json::Value>;

/// Content types scored and counted when the caller does not say otherwise.
pub const PRIMARY_TYPES: [&str; 2] = ["post", "page"];

/// Returns [`PRIMARY_TYPES`] as owned strings.
pub fn primary_types() -> Vec<String> {
    PRIMARY_TYPES.iter().map(|t| t.to_string()).collect()
}

/// Publication status of a document.
///
/// Only [`DocumentStatus::Publish`] documents take part in scoring and in
/// the link graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentStatus {
    Publish,
    Draft,
    Pending,
    Private,
    Trash,
    AutoDraft,
    Inherit,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Publish => "publish",
            DocumentStatus::Draft => "draft",
            DocumentStatus::Pending => "pending",
            DocumentStatus::Private => "private",
            DocumentStatus::Trash => "trash",
            DocumentStatus::AutoDraft => "auto-draft",
            DocumentStatus::Inherit => "inherit",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(DocumentStatus::Publish),
            "draft" => Ok(DocumentStatus::Draft),
            "pending" => Ok(DocumentStatus::Pending),
            "private" => Ok(DocumentStatus::Private),
            "trash" => Ok(DocumentStatus::Trash),
            "auto-draft" => Ok(DocumentStatus::AutoDraft),
            "inherit" => Ok(DocumentStatus::Inherit),
            other => anyhow::bail!("unknown document status: '{}'", other),
        }
    }
}

/// Immutable document snapshot used for one analysis or scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    /// Raw markup; may embed anchor tags and shortcodes.
    pub body: String,
    pub doc_type: String,
    /// Publication time as Unix seconds.
    pub published_at: i64,
    /// Canonical URL, derived by the store.
    pub url: String,
    pub status: DocumentStatus,
}

impl Document {
    pub fn is_published(&self) -> bool {
        self.status == DocumentStatus::Publish
    }
}

/// One ranked entry of a [`TermSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Keywords and phrases extracted from one document.
///
/// Both lists are ranked by count (descending); equal counts keep the order
/// in which the term was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSet {
    pub single_terms: Vec<TermCount>,
    pub phrases: Vec<TermCount>,
}

impl TermSet {
    pub fn is_empty(&self) -> bool {
        self.single_terms.is_empty() && self.phrases.is_empty()
    }
}

/// A scored internal-link suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub id: DocumentId,
    pub title: String,
    pub url: String,
    pub doc_type: String,
    /// Sum of every matched term's contribution.
    pub score: u64,
    /// Terms that surfaced this document, unique, in match order.
    pub matching_terms: Vec<String>,
}

/// Result of [`Engine::analyze`](crate::Engine::analyze).
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub keywords: TermSet,
    pub suggestions: Vec<Candidate>,
}

/// A document with no inbound internal links.
///
/// Edit links are left to the admin UI, which knows its own routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanEntry {
    pub id: DocumentId,
    pub title: String,
    pub doc_type: String,
    /// Publication time (ISO 8601).
    pub date: String,
    pub url: String,
    /// Always 0 for an orphan.
    pub incoming_links: usize,
}

impl From<&Document> for OrphanEntry {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            title: doc.title.clone(),
            doc_type: doc.doc_type.clone(),
            date: format_ts_iso(doc.published_at),
            url: doc.url.clone(),
            incoming_links: 0,
        }
    }
}

/// One page of the orphan list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanResult {
    pub posts: Vec<OrphanEntry>,
    pub total: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

/// Link counts for a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub outgoing_count: usize,
    pub incoming_count: usize,
    pub outgoing_links: Vec<String>,
}

/// Format a Unix timestamp as ISO 8601.
pub fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            DocumentStatus::Publish,
            DocumentStatus::Draft,
            DocumentStatus::AutoDraft,
            DocumentStatus::Trash,
        ] {
            assert_eq!(status.as_str().parse::<DocumentStatus>().unwrap(), status);
        }
        assert!("published".parse::<DocumentStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_kebab_case() {
        let json = serde_json::to_string(&DocumentStatus::AutoDraft).unwrap();
        assert_eq!(json, "\"auto-draft\"");
    }

    #[test]
    fn test_format_ts_iso() {
        assert_eq!(format_ts_iso(0), "1970-01-01T00:00:00Z");
        assert_eq!(format_ts_iso(1_700_000_000), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_orphan_entry_from_document() {
        let doc = Document {
            id: 7,
            title: "Lonely page".to_string(),
            body: String::new(),
            doc_type: "page".to_string(),
            published_at: 0,
            url: "https://example.com/lonely/".to_string(),
            status: DocumentStatus::Publish,
        };
        let entry = OrphanEntry::from(&doc);
        assert_eq!(entry.date, "1970-01-01T00:00:00Z");
        assert_eq!(entry.incoming_links, 0);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["incoming_links"], 0);
        assert_eq!(json["url"], "https://example.com/lonely/");
    }
}
