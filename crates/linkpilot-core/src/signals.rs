//! "Excluded from indexing" signals.
//!
//! SEO plugins and other metadata layers each record a noindex flag in
//! their own meta key and value shape. The scorer does not know about any
//! of them: it asks an [`ExclusionSignals`] chain, which probes every
//! registered [`IndexSignal`] in order and excludes the document as soon
//! as one returns true.
//!
//! # Example
//!
//! ```rust
//! use linkpilot_core::models::DocumentMeta;
//! use linkpilot_core::signals::{ExclusionSignals, MetaEquals};
//!
//! let mut signals = ExclusionSignals::new();
//! signals.register(Box::new(MetaEquals::new("robots_noindex", "1")));
//!
//! let mut meta = DocumentMeta::new();
//! meta.insert("robots_noindex".into(), serde_json::json!("1"));
//! assert!(signals.excludes(&meta));
//! ```

use anyhow::Result;
use serde_json::Value;

use crate::models::{DocumentId, DocumentMeta};
use crate::store::DocumentStore;

/// A single source of "do not index this document" information.
pub trait IndexSignal: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Returns true if `meta` marks the document as excluded.
    fn excludes(&self, meta: &DocumentMeta) -> bool;
}

/// Meta value equals a string (numbers and booleans are compared by their
/// JSON text, so `1` matches `"1"`).
#[derive(Debug, Clone)]
pub struct MetaEquals {
    key: String,
    value: String,
}

impl MetaEquals {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl IndexSignal for MetaEquals {
    fn name(&self) -> &str {
        &self.key
    }

    fn excludes(&self, meta: &DocumentMeta) -> bool {
        match meta.get(&self.key) {
            Some(Value::String(s)) => *s == self.value,
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string() == self.value,
            _ => false,
        }
    }
}

/// Meta value is an array containing a string member.
#[derive(Debug, Clone)]
pub struct MetaContains {
    key: String,
    member: String,
}

impl MetaContains {
    pub fn new(key: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            member: member.into(),
        }
    }
}

impl IndexSignal for MetaContains {
    fn name(&self) -> &str {
        &self.key
    }

    fn excludes(&self, meta: &DocumentMeta) -> bool {
        match meta.get(&self.key) {
            Some(Value::Array(items)) => items
                .iter()
                .any(|v| v.as_str() == Some(self.member.as_str())),
            _ => false,
        }
    }
}

/// Ordered chain of [`IndexSignal`] providers.
#[derive(Default)]
pub struct ExclusionSignals {
    providers: Vec<Box<dyn IndexSignal>>,
}

impl ExclusionSignals {
    /// An empty chain; nothing is ever excluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The flags written by the common SEO plugins.
    pub fn with_defaults() -> Self {
        let mut chain = Self::new();
        chain.register(Box::new(MetaEquals::new("_yoast_wpseo_meta-robots-noindex", "1")));
        chain.register(Box::new(MetaContains::new("rank_math_robots", "noindex")));
        chain.register(Box::new(MetaEquals::new("_aioseo_noindex", "1")));
        chain.register(Box::new(MetaEquals::new("_seopress_robots_index", "yes")));
        chain
    }

    pub fn register(&mut self, signal: Box<dyn IndexSignal>) {
        self.providers.push(signal);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Returns true if any provider excludes `meta`.
    pub fn excludes(&self, meta: &DocumentMeta) -> bool {
        self.providers.iter().any(|p| p.excludes(meta))
    }

    /// Look up the document's metadata and probe the chain.
    ///
    /// An empty chain answers false without touching the store.
    pub async fn is_excluded_from_index<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        id: DocumentId,
    ) -> Result<bool> {
        if self.is_empty() {
            return Ok(false);
        }
        let meta = store.document_meta(id).await?;
        Ok(self.excludes(&meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(pairs: &[(&str, Value)]) -> DocumentMeta {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_meta_equals_string_and_number() {
        let signal = MetaEquals::new("noindex", "1");
        assert!(signal.excludes(&meta(&[("noindex", json!("1"))])));
        assert!(signal.excludes(&meta(&[("noindex", json!(1))])));
        assert!(!signal.excludes(&meta(&[("noindex", json!("0"))])));
        assert!(!signal.excludes(&meta(&[])));
    }

    #[test]
    fn test_meta_contains_array_member() {
        let signal = MetaContains::new("robots", "noindex");
        assert!(signal.excludes(&meta(&[("robots", json!(["index", "noindex"]))])));
        assert!(!signal.excludes(&meta(&[("robots", json!(["index"]))])));
        // A bare string is not an array.
        assert!(!signal.excludes(&meta(&[("robots", json!("noindex"))])));
    }

    #[test]
    fn test_default_chain_any_provider_excludes() {
        let chain = ExclusionSignals::with_defaults();
        assert_eq!(chain.len(), 4);
        assert!(chain.excludes(&meta(&[("_seopress_robots_index", json!("yes"))])));
        assert!(chain.excludes(&meta(&[("rank_math_robots", json!(["noindex"]))])));
        assert!(!chain.excludes(&meta(&[("_aioseo_noindex", json!("0"))])));
    }

    #[test]
    fn test_empty_chain_excludes_nothing() {
        let chain = ExclusionSignals::new();
        assert!(chain.is_empty());
        assert!(!chain.excludes(&meta(&[("_aioseo_noindex", json!("1"))])));
    }
}
