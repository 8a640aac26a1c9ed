//! SQLite connection pool shared by migrations, import, and the store.
//!
//! The pool runs in WAL mode with foreign keys on, so deleting a document
//! cascades to its `document_meta` rows.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::Config;

pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_connect_creates_parent_and_enables_pragmas() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("nested/data/linkpilot.sqlite");
        let config: Config = toml::from_str(&format!(
            "[db]\npath = \"{}\"\n\n[site]\nbase_url = \"https://example.com\"\n",
            db_path.display()
        ))
        .unwrap();

        let pool = connect(&config).await.unwrap();
        assert!(db_path.exists());

        let foreign_keys: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(foreign_keys, 1);

        let journal: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(journal, "wal");
        pool.close().await;
    }
}
