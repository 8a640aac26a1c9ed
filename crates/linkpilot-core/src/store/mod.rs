//! Document store abstraction.
//!
//! The [`DocumentStore`] trait is the engine's only window onto the corpus.
//! Every method is a read; the engine never writes back. Implementations
//! must be `Send + Sync` to work with async runtimes.
//!
//! # Operations
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`list_published`](DocumentStore::list_published) | Published documents of the given types, newest first |
//! | [`get_by_id`](DocumentStore::get_by_id) | One document regardless of status |
//! | [`canonical_url`](DocumentStore::canonical_url) | Canonical URL of a document |
//! | [`find_containing`](DocumentStore::find_containing) | Published documents whose title or body contains a term |
//! | [`count_referencing`](DocumentStore::count_referencing) | Published documents whose body contains a string |
//! | [`document_meta`](DocumentStore::document_meta) | Metadata consumed by index signals |

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Document, DocumentId, DocumentMeta};

/// Read-only access to a corpus snapshot.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Published documents whose type is in `types`, ordered by publish
    /// date (newest first), then id (ascending).
    async fn list_published(&self, types: &[String]) -> Result<Vec<Document>>;

    /// A single document by id, whatever its status.
    async fn get_by_id(&self, id: DocumentId) -> Result<Option<Document>>;

    /// Canonical URL of a document, if it exists.
    async fn canonical_url(&self, id: DocumentId) -> Result<Option<String>> {
        Ok(self.get_by_id(id).await?.map(|doc| doc.url))
    }

    /// Published documents of `types`, other than `exclude`, whose title or
    /// body contains `term` (case-insensitive). Ordered by id, at most
    /// `limit` rows.
    async fn find_containing(
        &self,
        term: &str,
        types: &[String],
        exclude: DocumentId,
        limit: usize,
    ) -> Result<Vec<Document>>;

    /// Number of published documents of `types`, other than `exclude`, whose
    /// body contains `needle` (case-insensitive).
    async fn count_referencing(
        &self,
        needle: &str,
        types: &[String],
        exclude: DocumentId,
    ) -> Result<usize>;

    /// Metadata for a document. Unknown documents have empty metadata.
    async fn document_meta(&self, id: DocumentId) -> Result<DocumentMeta>;
}
