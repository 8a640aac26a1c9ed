//! Per-request engine facade.
//!
//! [`Engine`] bundles the collaborators one request needs (a store, the
//! site context, the exclusion signals, and tuning settings) behind the
//! three operations the transport layer calls. It holds only shared
//! references and is cheap to build for each request.
//!
//! # Example
//!
//! ```rust
//! use linkpilot_core::links::SiteContext;
//! use linkpilot_core::signals::ExclusionSignals;
//! use linkpilot_core::store::memory::InMemoryStore;
//! use linkpilot_core::{Engine, EngineSettings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = InMemoryStore::new();
//! let site = SiteContext::new("https://example.com")?;
//! let signals = ExclusionSignals::with_defaults();
//! let settings = EngineSettings::default();
//!
//! let engine = Engine::new(&store, &site, &signals, &settings);
//! let analysis = engine.analyze(1, "<p>Sourdough starters need patience.</p>").await?;
//! assert!(analysis.suggestions.is_empty());
//! # Ok(())
//! # }
//! ```

use anyhow::Result;

use crate::error::EngineError;
use crate::graph::{find_orphans, link_stats, OrphanQuery};
use crate::links::SiteContext;
use crate::models::{primary_types, Analysis, DocumentId, LinkStats, OrphanResult};
use crate::score::{find_suggestions, SuggestParams};
use crate::signals::ExclusionSignals;
use crate::store::DocumentStore;
use crate::terms::{extract_keywords, DEFAULT_KEYWORD_LIMIT};

/// Tuning knobs for the engine operations.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Single terms kept by keyword extraction.
    pub keyword_limit: usize,
    /// Candidate retrieval and ranking.
    pub suggest: SuggestParams,
    /// Document types counted as inbound referrers by [`Engine::get_stats`].
    pub stats_types: Vec<String>,
    /// Types scanned by [`Engine::list_orphans`] when the caller names none.
    pub orphan_types: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            suggest: SuggestParams::default(),
            stats_types: primary_types(),
            orphan_types: primary_types(),
        }
    }
}

/// Stateless engine bound to one request's collaborators.
pub struct Engine<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    site: &'a SiteContext,
    signals: &'a ExclusionSignals,
    settings: &'a EngineSettings,
}

impl<'a, S: DocumentStore + ?Sized> Engine<'a, S> {
    pub fn new(
        store: &'a S,
        site: &'a SiteContext,
        signals: &'a ExclusionSignals,
        settings: &'a EngineSettings,
    ) -> Self {
        Self {
            store,
            site,
            signals,
            settings,
        }
    }

    /// Extract keywords from `content` and suggest documents to link to.
    ///
    /// Fails with [`EngineError::InvalidInput`] when `content` is empty or
    /// whitespace only. Such content has no terms to extract.
    pub async fn analyze(&self, document_id: DocumentId, content: &str) -> Result<Analysis> {
        if content.trim().is_empty() {
            return Err(EngineError::InvalidInput("content must not be empty".to_string()).into());
        }

        let keywords = extract_keywords(content, self.settings.keyword_limit);
        let suggestions = find_suggestions(
            self.store,
            self.signals,
            document_id,
            &keywords,
            &self.settings.suggest,
        )
        .await?;

        Ok(Analysis {
            keywords,
            suggestions,
        })
    }

    /// One page of published documents with no inbound internal links.
    ///
    /// An empty `types` slice scans the configured default types. Blocks
    /// while the link graph is built; see [`find_orphans`].
    pub async fn list_orphans(
        &self,
        types: &[String],
        page: usize,
        page_size: usize,
    ) -> Result<OrphanResult> {
        let types = if types.is_empty() {
            self.settings.orphan_types.clone()
        } else {
            types.to_vec()
        };
        let query = OrphanQuery {
            types,
            page_size,
            page,
        };
        find_orphans(self.store, self.site, &query).await
    }

    /// Outgoing links and approximate inbound count for one document.
    pub async fn get_stats(&self, document_id: DocumentId) -> Result<LinkStats> {
        link_stats(
            self.store,
            self.site,
            document_id,
            &self.settings.stats_types,
        )
        .await
    }
}
