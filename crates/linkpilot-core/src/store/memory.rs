//! In-memory [`DocumentStore`] implementation for tests and embedding.
//!
//! Uses `Vec` and `HashMap` behind `std::sync::RwLock`. Term and substring
//! lookups are brute-force scans over every stored document.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Document, DocumentId, DocumentMeta};

use super::DocumentStore;

/// In-memory corpus.
pub struct InMemoryStore {
    docs: RwLock<Vec<Document>>,
    meta: RwLock<HashMap<DocumentId, DocumentMeta>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
            meta: RwLock::new(HashMap::new()),
        }
    }

    /// Build a store holding `docs`.
    pub fn with_documents(docs: impl IntoIterator<Item = Document>) -> Self {
        let store = Self::new();
        for doc in docs {
            store.insert(doc);
        }
        store
    }

    /// Insert a document, replacing any with the same id.
    pub fn insert(&self, doc: Document) {
        let mut docs = self.docs.write().unwrap_or_else(PoisonError::into_inner);
        docs.retain(|d| d.id != doc.id);
        docs.push(doc);
    }

    /// Set one metadata value on a document.
    pub fn set_meta(&self, id: DocumentId, key: &str, value: serde_json::Value) {
        let mut meta = self.meta.write().unwrap_or_else(PoisonError::into_inner);
        meta.entry(id).or_default().insert(key.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.docs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn published_of<'a>(
        docs: &'a [Document],
        types: &'a [String],
        exclude: Option<DocumentId>,
    ) -> impl Iterator<Item = &'a Document> {
        docs.iter().filter(move |d| {
            d.is_published() && types.contains(&d.doc_type) && Some(d.id) != exclude
        })
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_published(&self, types: &[String]) -> Result<Vec<Document>> {
        let docs = self.docs.read().unwrap_or_else(PoisonError::into_inner);
        let mut published: Vec<Document> = Self::published_of(&docs, types, None)
            .cloned()
            .collect();
        published.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then(a.id.cmp(&b.id))
        });
        Ok(published)
    }

    async fn get_by_id(&self, id: DocumentId) -> Result<Option<Document>> {
        let docs = self.docs.read().unwrap_or_else(PoisonError::into_inner);
        Ok(docs.iter().find(|d| d.id == id).cloned())
    }

    async fn find_containing(
        &self,
        term: &str,
        types: &[String],
        exclude: DocumentId,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let needle = term.to_ascii_lowercase();
        let docs = self.docs.read().unwrap_or_else(PoisonError::into_inner);
        let mut matches: Vec<Document> = Self::published_of(&docs, types, Some(exclude))
            .filter(|d| {
                d.title.to_ascii_lowercase().contains(&needle)
                    || d.body.to_ascii_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matches.sort_by_key(|d| d.id);
        matches.truncate(limit);
        Ok(matches)
    }

    async fn count_referencing(
        &self,
        needle: &str,
        types: &[String],
        exclude: DocumentId,
    ) -> Result<usize> {
        let needle = needle.to_ascii_lowercase();
        let docs = self.docs.read().unwrap_or_else(PoisonError::into_inner);
        Ok(Self::published_of(&docs, types, Some(exclude))
            .filter(|d| d.body.to_ascii_lowercase().contains(&needle))
            .count())
    }

    async fn document_meta(&self, id: DocumentId) -> Result<DocumentMeta> {
        let meta = self.meta.read().unwrap_or_else(PoisonError::into_inner);
        Ok(meta.get(&id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{primary_types, DocumentStatus};

    fn doc(id: DocumentId, title: &str, body: &str, published_at: i64) -> Document {
        Document {
            id,
            title: title.to_string(),
            body: body.to_string(),
            doc_type: "post".to_string(),
            published_at,
            url: format!("https://example.com/doc-{}/", id),
            status: DocumentStatus::Publish,
        }
    }

    #[tokio::test]
    async fn test_list_published_newest_first() {
        let mut draft = doc(4, "Draft", "", 500);
        draft.status = DocumentStatus::Draft;
        let mut attachment = doc(5, "Attachment", "", 600);
        attachment.doc_type = "attachment".to_string();
        let store = InMemoryStore::with_documents(vec![
            doc(1, "Old", "", 100),
            doc(2, "New", "", 300),
            doc(3, "Same time", "", 100),
            draft,
            attachment,
        ]);

        let ids: Vec<DocumentId> = store
            .list_published(&primary_types())
            .await
            .unwrap()
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_find_containing_is_case_insensitive_and_capped() {
        let store = InMemoryStore::with_documents(vec![
            doc(3, "Gardening", "", 1),
            doc(1, "Intro", "all about GARDENING", 1),
            doc(2, "Other", "nothing here", 1),
            doc(9, "Source", "gardening", 1),
        ]);
        let found = store
            .find_containing("gardening", &primary_types(), 9, 50)
            .await
            .unwrap();
        assert_eq!(found.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 3]);

        let capped = store
            .find_containing("gardening", &primary_types(), 9, 1)
            .await
            .unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn test_count_referencing_excludes_self() {
        let store = InMemoryStore::with_documents(vec![
            doc(1, "Target", "see https://example.com/doc-1/", 1),
            doc(2, "A", "<a href=\"https://EXAMPLE.com/doc-1/\">x</a>", 1),
            doc(3, "B", "no link", 1),
        ]);
        let n = store
            .count_referencing("https://example.com/doc-1/", &primary_types(), 1)
            .await
            .unwrap();
        assert_eq!(n, 1);
    }

    #[tokio::test]
    async fn test_meta_defaults_to_empty() {
        let store = InMemoryStore::new();
        store.set_meta(1, "k", serde_json::json!("v"));
        assert_eq!(store.document_meta(1).await.unwrap().len(), 1);
        assert!(store.document_meta(2).await.unwrap().is_empty());
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let store = InMemoryStore::new();
        store.insert(doc(1, "First", "", 1));
        store.insert(doc(1, "Second", "", 1));
        assert_eq!(store.len(), 1);
    }
}
