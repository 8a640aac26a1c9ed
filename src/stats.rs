//! `linkpilot stats`: link counts for a single document.
//!
//! Outgoing links are the deduplicated internal anchors in the document
//! body. The incoming count is approximate: it counts other published
//! documents whose body mentions the canonical URL anywhere, anchor or not.

use anyhow::Result;

use linkpilot_core::models::{DocumentId, LinkStats};
use linkpilot_core::Engine;

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

pub async fn document_stats(config: &Config, document_id: DocumentId) -> Result<LinkStats> {
    let store = SqliteStore::open(config).await?;
    let site = config.site_context()?;
    let signals = config.exclusion_signals();
    let settings = config.engine_settings();

    Engine::new(&store, &site, &signals, &settings)
        .get_stats(document_id)
        .await
}

/// Run the stats command and print a summary.
pub async fn run_stats(config: &Config, document_id: DocumentId, json: bool) -> Result<()> {
    let stats = document_stats(config, document_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Link stats for document {}", document_id);
    println!("  Outgoing:    {}", stats.outgoing_count);
    for link in &stats.outgoing_links {
        println!("    {}", link);
    }
    println!("  Incoming:    {}", stats.incoming_count);
    Ok(())
}
