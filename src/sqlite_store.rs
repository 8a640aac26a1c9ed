//! SQLite-backed [`DocumentStore`] implementation.
//!
//! Reads go through the `documents` and `document_meta` tables created by
//! [`migrate`](crate::migrate). Substring matching uses `LIKE` with escaped
//! wildcards, which SQLite treats case-insensitively for ASCII text.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use linkpilot_core::models::{Document, DocumentId, DocumentMeta, DocumentStatus};
use linkpilot_core::store::DocumentStore;

use crate::config::Config;
use crate::db;

const DOCUMENT_COLUMNS: &str = "id, title, body, doc_type, status, slug, published_at";

/// A document row as written by the importer.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub title: String,
    pub body: String,
    pub doc_type: String,
    pub status: DocumentStatus,
    pub slug: Option<String>,
    pub published_at: i64,
}

/// SQLite implementation of the [`DocumentStore`] trait.
///
/// Holds the site base URL so canonical URLs can be derived from slugs.
pub struct SqliteStore {
    pool: SqlitePool,
    base_url: String,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool, base_url: impl Into<String>) -> Self {
        Self {
            pool,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Connect to the configured database.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await?;
        Ok(Self::new(pool, config.site.base_url.as_str()))
    }

    pub async fn upsert_document(&self, doc: &StoredDocument) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (id, title, body, doc_type, status, slug, published_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                doc_type = excluded.doc_type,
                status = excluded.status,
                slug = excluded.slug,
                published_at = excluded.published_at
            "#,
        )
        .bind(doc.id)
        .bind(&doc.title)
        .bind(&doc.body)
        .bind(&doc.doc_type)
        .bind(doc.status.as_str())
        .bind(&doc.slug)
        .bind(doc.published_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replace all metadata of a document.
    pub async fn replace_meta(&self, id: DocumentId, meta: &DocumentMeta) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM document_meta WHERE document_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let mut entries: Vec<_> = meta.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in entries {
            sqlx::query(
                "INSERT INTO document_meta (document_id, meta_key, meta_value) VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(key)
            .bind(value.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    fn row_to_document(&self, row: &SqliteRow) -> Result<Document> {
        let id: i64 = row.try_get("id")?;
        let slug: Option<String> = row.try_get("slug")?;
        let status: String = row.try_get("status")?;

        Ok(Document {
            id,
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            doc_type: row.try_get("doc_type")?,
            published_at: row.try_get("published_at")?,
            url: canonical_url(&self.base_url, id, slug.as_deref()),
            status: status.parse()?,
        })
    }
}

/// `{base}/{slug}/`, or `{base}/?p={id}` for documents without a slug.
pub fn canonical_url(base_url: &str, id: DocumentId, slug: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    match slug.map(|s| s.trim_matches('/')) {
        Some(slug) if !slug.is_empty() => format!("{}/{}/", base, slug),
        _ => format!("{}/?p={}", base, id),
    }
}

/// `%term%` with LIKE wildcards escaped by `\`.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// `?, ?, ?` for an `IN (...)` list.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list_published(&self, types: &[String]) -> Result<Vec<Document>> {
        if types.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM documents WHERE status = 'publish' AND doc_type IN ({}) \
             ORDER BY published_at DESC, id ASC",
            DOCUMENT_COLUMNS,
            placeholders(types.len())
        );
        let mut query = sqlx::query(&sql);
        for t in types {
            query = query.bind(t.as_str());
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(|row| self.row_to_document(row)).collect()
    }

    async fn get_by_id(&self, id: DocumentId) -> Result<Option<Document>> {
        let sql = format!("SELECT {} FROM documents WHERE id = ?", DOCUMENT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| self.row_to_document(&r)).transpose()
    }

    async fn canonical_url(&self, id: DocumentId) -> Result<Option<String>> {
        let row = sqlx::query("SELECT slug FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => {
                let slug: Option<String> = r.try_get("slug")?;
                Ok(Some(canonical_url(&self.base_url, id, slug.as_deref())))
            }
            None => Ok(None),
        }
    }

    async fn find_containing(
        &self,
        term: &str,
        types: &[String],
        exclude: DocumentId,
        limit: usize,
    ) -> Result<Vec<Document>> {
        if types.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM documents \
             WHERE status = 'publish' AND doc_type IN ({}) AND id != ? \
             AND (title LIKE ? ESCAPE '\\' OR body LIKE ? ESCAPE '\\') \
             ORDER BY id ASC LIMIT ?",
            DOCUMENT_COLUMNS,
            placeholders(types.len())
        );
        let pattern = like_pattern(term);
        let mut query = sqlx::query(&sql);
        for t in types {
            query = query.bind(t.as_str());
        }
        let rows = query
            .bind(exclude)
            .bind(&pattern)
            .bind(&pattern)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| self.row_to_document(row)).collect()
    }

    async fn count_referencing(
        &self,
        needle: &str,
        types: &[String],
        exclude: DocumentId,
    ) -> Result<usize> {
        if types.is_empty() || needle.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "SELECT COUNT(*) FROM documents \
             WHERE status = 'publish' AND doc_type IN ({}) AND id != ? \
             AND body LIKE ? ESCAPE '\\'",
            placeholders(types.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for t in types {
            query = query.bind(t.as_str());
        }
        let count = query
            .bind(exclude)
            .bind(like_pattern(needle))
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as usize)
    }

    async fn document_meta(&self, id: DocumentId) -> Result<DocumentMeta> {
        let rows =
            sqlx::query("SELECT meta_key, meta_value FROM document_meta WHERE document_id = ?")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        let mut meta = DocumentMeta::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("meta_key")?;
            let raw: String = row.try_get("meta_value")?;
            let value = serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw));
            meta.insert(key, value);
        }
        Ok(meta)
    }
}
