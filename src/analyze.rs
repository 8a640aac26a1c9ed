//! `linkpilot analyze`: keywords and link suggestions for one document.

use anyhow::{Context, Result};
use std::path::PathBuf;

use linkpilot_core::models::{Analysis, DocumentId};
use linkpilot_core::store::DocumentStore;
use linkpilot_core::{Engine, EngineError};

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// Where the text to analyze comes from.
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// The document's stored body.
    Stored,
    Inline(String),
    File(PathBuf),
}

async fn load_content(
    store: &SqliteStore,
    document_id: DocumentId,
    source: ContentSource,
) -> Result<String> {
    match source {
        ContentSource::Inline(content) => Ok(content),
        ContentSource::File(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        ContentSource::Stored => {
            let doc = store
                .get_by_id(document_id)
                .await?
                .ok_or(EngineError::NotFound(document_id))?;
            Ok(doc.body)
        }
    }
}

pub async fn analyze_document(
    config: &Config,
    document_id: DocumentId,
    source: ContentSource,
) -> Result<Analysis> {
    let store = SqliteStore::open(config).await?;
    let site = config.site_context()?;
    let signals = config.exclusion_signals();
    let settings = config.engine_settings();

    let content = load_content(&store, document_id, source).await?;
    Engine::new(&store, &site, &signals, &settings)
        .analyze(document_id, &content)
        .await
}

pub async fn run_analyze(
    config: &Config,
    document_id: DocumentId,
    source: ContentSource,
    json: bool,
) -> Result<()> {
    let analysis = analyze_document(config, document_id, source).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("Keywords:");
    for tc in &analysis.keywords.single_terms {
        println!("  {:<24} {}", tc.term, tc.count);
    }
    if !analysis.keywords.phrases.is_empty() {
        println!("Phrases:");
        for tc in &analysis.keywords.phrases {
            println!("  {:<24} {}", tc.term, tc.count);
        }
    }

    println!();
    if analysis.suggestions.is_empty() {
        println!("No link suggestions.");
        return Ok(());
    }

    println!("Suggestions:");
    for (i, c) in analysis.suggestions.iter().enumerate() {
        println!(
            "{}. [{}] {} (score {})",
            i + 1,
            c.doc_type,
            c.title,
            c.score
        );
        println!("    url: {}", c.url);
        println!("    matched: {}", c.matching_terms.join(", "));
    }
    Ok(())
}
