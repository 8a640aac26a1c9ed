//! Corpus link graph and orphan detection.
//!
//! # Algorithm
//!
//! 1. Index every document's canonical URL, with and without its trailing
//!    slash, to the document id.
//! 2. For every source document, extract internal links, strip trailing
//!    slashes, and look each one up with and without a trailing slash.
//! 3. A hit on a different document records an inbound edge
//!    (target ← source), deduplicated per pair.
//! 4. Documents whose inbound set is empty are orphans.
//!
//! Step 2 runs per document on the rayon pool; edges are merged into the
//! graph sequentially afterwards. Nothing is cached between scans: the
//! graph is rebuilt from the store on every call, in O(documents × links).

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use anyhow::Result;
use rayon::prelude::*;

use crate::error::EngineError;
use crate::links::{extract_internal_links, SiteContext};
use crate::models::{primary_types, Document, DocumentId, LinkStats, OrphanEntry, OrphanResult};
use crate::store::DocumentStore;

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Inbound edges per document: target id → distinct source ids.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    inbound: HashMap<DocumentId, BTreeSet<DocumentId>>,
}

impl LinkGraph {
    fn add_edge(&mut self, source: DocumentId, target: DocumentId) {
        if source != target {
            self.inbound.entry(target).or_default().insert(source);
        }
    }

    /// Documents linking to `id`, if any.
    pub fn inbound(&self, id: DocumentId) -> Option<&BTreeSet<DocumentId>> {
        self.inbound.get(&id)
    }

    pub fn inbound_count(&self, id: DocumentId) -> usize {
        self.inbound.get(&id).map_or(0, BTreeSet::len)
    }

    pub fn is_orphan(&self, id: DocumentId) -> bool {
        self.inbound_count(id) == 0
    }

    /// Total number of distinct (source, target) edges.
    pub fn edge_count(&self) -> usize {
        self.inbound.values().map(BTreeSet::len).sum()
    }
}

/// Canonical URL (and its slash-stripped variant) → document id.
struct UrlIndex<'a> {
    by_url: HashMap<&'a str, DocumentId>,
}

impl<'a> UrlIndex<'a> {
    fn new(docs: &'a [Document]) -> Self {
        let mut by_url = HashMap::with_capacity(docs.len() * 2);
        for doc in docs {
            by_url.insert(doc.url.as_str(), doc.id);
            by_url.insert(doc.url.trim_end_matches('/'), doc.id);
        }
        Self { by_url }
    }

    /// Ids matching a slash-stripped URL, tried bare and with one slash.
    fn lookup(&self, normalized: &str) -> impl Iterator<Item = DocumentId> + '_ {
        let bare = self.by_url.get(normalized).copied();
        let slashed = self.by_url.get(format!("{}/", normalized).as_str()).copied();
        bare.into_iter().chain(slashed)
    }
}

/// Documents `source` links to, other than itself.
fn outbound_targets(
    source: &Document,
    index: &UrlIndex<'_>,
    site: &SiteContext,
) -> BTreeSet<DocumentId> {
    let mut targets = BTreeSet::new();
    for link in extract_internal_links(&source.body, site) {
        let resolved = site.resolve(&link);
        let normalized = resolved.trim_end_matches('/');
        for target in index.lookup(normalized) {
            if target != source.id {
                targets.insert(target);
            }
        }
    }
    targets
}

/// Build the inbound link graph over `docs`.
///
/// Runs on the rayon pool and blocks the calling thread until every
/// document has been scanned.
pub fn build_link_graph(docs: &[Document], site: &SiteContext) -> LinkGraph {
    let index = UrlIndex::new(docs);

    let edges: Vec<(DocumentId, DocumentId)> = docs
        .par_iter()
        .filter(|source| !source.body.is_empty())
        .flat_map_iter(|source| {
            outbound_targets(source, &index, site)
                .into_iter()
                .map(move |target| (source.id, target))
        })
        .collect();

    let mut graph = LinkGraph::default();
    for (source, target) in edges {
        graph.add_edge(source, target);
    }
    graph
}

/// Orphaned documents in input order.
pub fn orphans<'a>(docs: &'a [Document], graph: &LinkGraph) -> Vec<&'a Document> {
    docs.iter().filter(|d| graph.is_orphan(d.id)).collect()
}

/// `ceil(total / page_size)`.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Index range of the 1-based `page`, clamped to `total`.
pub fn page_range(total: usize, page_size: usize, page: usize) -> Range<usize> {
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

/// Parameters for [`find_orphans`].
#[derive(Debug, Clone)]
pub struct OrphanQuery {
    pub types: Vec<String>,
    pub page_size: usize,
    /// 1-based.
    pub page: usize,
}

impl Default for OrphanQuery {
    fn default() -> Self {
        Self {
            types: primary_types(),
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

/// Paginate a full orphan list.
pub fn paginate(orphans: &[OrphanEntry], page_size: usize, page: usize) -> OrphanResult {
    let total = orphans.len();
    OrphanResult {
        posts: orphans[page_range(total, page_size, page)].to_vec(),
        total,
        total_pages: total_pages(total, page_size),
        current_page: page,
    }
}

/// Scan the published corpus and return one page of orphans.
///
/// An empty corpus is not an error: the result is empty with zero pages.
///
/// The graph build is synchronous CPU work (see [`build_link_graph`]).
/// Async callers serving other requests should run this on a blocking
/// thread.
pub async fn find_orphans<S: DocumentStore + ?Sized>(
    store: &S,
    site: &SiteContext,
    query: &OrphanQuery,
) -> Result<OrphanResult> {
    if query.page_size == 0 {
        return Err(EngineError::InvalidInput("page size must be >= 1".to_string()).into());
    }
    if query.page == 0 {
        return Err(EngineError::InvalidInput("page must be >= 1".to_string()).into());
    }

    let mut docs = store.list_published(&query.types).await?;
    docs.retain(Document::is_published);

    if docs.is_empty() {
        tracing::debug!(types = ?query.types, "no published documents to scan");
        return Ok(paginate(&[], query.page_size, query.page));
    }

    let graph = build_link_graph(&docs, site);
    let entries: Vec<OrphanEntry> = orphans(&docs, &graph)
        .into_iter()
        .map(OrphanEntry::from)
        .collect();

    tracing::debug!(
        documents = docs.len(),
        edges = graph.edge_count(),
        orphans = entries.len(),
        "built link graph"
    );

    Ok(paginate(&entries, query.page_size, query.page))
}

/// Outgoing internal links and an approximate inbound count for one document.
///
/// Inbound links are counted by substring search for the canonical URL in
/// other published documents of `types`, not by a graph traversal.
pub async fn link_stats<S: DocumentStore + ?Sized>(
    store: &S,
    site: &SiteContext,
    id: DocumentId,
    types: &[String],
) -> Result<LinkStats> {
    let doc = store
        .get_by_id(id)
        .await?
        .ok_or(EngineError::NotFound(id))?;

    let outgoing_links = extract_internal_links(&doc.body, site);

    let url = store.canonical_url(id).await?.unwrap_or(doc.url);
    let incoming_count = if url.is_empty() {
        0
    } else {
        store.count_referencing(&url, types, id).await?
    };

    Ok(LinkStats {
        outgoing_count: outgoing_links.len(),
        incoming_count,
        outgoing_links,
    })
}
