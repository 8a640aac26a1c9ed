//! Relevance scoring for internal-link suggestions.
//!
//! # Scoring Algorithm
//!
//! 1. Merge the [`TermSet`] into weighted terms: a single term weighs its
//!    count, a phrase weighs `count × 2`.
//! 2. For each term, fetch up to `per_term_limit` published documents whose
//!    title or body contains it (never the source document).
//! 3. Skip documents excluded from indexing.
//! 4. Add `(title_hits × 10 + body_hits) × weight` to the document's
//!    running score and record the term once.
//! 5. Stable sort by score (desc); equal scores keep discovery order.
//! 6. Truncate to `limit`.

use std::collections::HashMap;

use anyhow::Result;

use crate::models::{primary_types, Candidate, Document, DocumentId, TermSet};
use crate::signals::ExclusionSignals;
use crate::store::DocumentStore;

/// A title occurrence is worth this many body occurrences.
pub const TITLE_WEIGHT: u64 = 10;

/// Phrase weight multiplier relative to single terms.
pub const PHRASE_WEIGHT: u64 = 2;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Cap on documents fetched per term query.
pub const DEFAULT_PER_TERM_LIMIT: usize = 50;

/// Tuning for [`find_suggestions`].
#[derive(Debug, Clone)]
pub struct SuggestParams {
    /// Maximum suggestions returned.
    pub limit: usize,
    /// Maximum documents fetched per term.
    pub per_term_limit: usize,
    /// Document types eligible as candidates.
    pub types: Vec<String>,
}

impl Default for SuggestParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUGGESTION_LIMIT,
            per_term_limit: DEFAULT_PER_TERM_LIMIT,
            types: primary_types(),
        }
    }
}

/// A search term with its scoring weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedTerm {
    pub term: String,
    pub weight: u64,
}

/// Single terms followed by phrases, each with its weight.
pub fn weighted_terms(terms: &TermSet) -> Vec<WeightedTerm> {
    let singles = terms.single_terms.iter().map(|tc| WeightedTerm {
        term: tc.term.clone(),
        weight: tc.count as u64,
    });
    let phrases = terms.phrases.iter().map(|tc| WeightedTerm {
        term: tc.term.clone(),
        weight: tc.count as u64 * PHRASE_WEIGHT,
    });
    singles.chain(phrases).collect()
}

/// ASCII case-insensitive, non-overlapping substring count.
pub fn count_occurrences(haystack: &str, needle: &str) -> u64 {
    if needle.is_empty() {
        return 0;
    }
    let needle = needle.to_ascii_lowercase();
    haystack.to_ascii_lowercase().matches(needle.as_str()).count() as u64
}

/// Contribution of one term to one document's score.
pub fn term_score(doc: &Document, term: &str, weight: u64) -> u64 {
    let title_hits = count_occurrences(&doc.title, term);
    let body_hits = count_occurrences(&doc.body, term);
    (title_hits * TITLE_WEIGHT + body_hits) * weight
}

/// Score corpus documents against `terms` and return the best `params.limit`.
///
/// `exclude_id` (the document being edited) is never returned. An empty
/// term set yields an empty list.
pub async fn find_suggestions<S: DocumentStore + ?Sized>(
    store: &S,
    signals: &ExclusionSignals,
    exclude_id: DocumentId,
    terms: &TermSet,
    params: &SuggestParams,
) -> Result<Vec<Candidate>> {
    let weighted = weighted_terms(terms);
    if weighted.is_empty() {
        return Ok(Vec::new());
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut slot: HashMap<DocumentId, usize> = HashMap::new();
    let mut excluded: HashMap<DocumentId, bool> = HashMap::new();

    for wt in &weighted {
        let matches = store
            .find_containing(&wt.term, &params.types, exclude_id, params.per_term_limit)
            .await?;

        for doc in matches {
            if doc.id == exclude_id || !doc.is_published() {
                continue;
            }

            let is_excluded = match excluded.get(&doc.id) {
                Some(&flag) => flag,
                None => {
                    let flag = signals.is_excluded_from_index(store, doc.id).await?;
                    excluded.insert(doc.id, flag);
                    flag
                }
            };
            if is_excluded {
                continue;
            }

            let idx = *slot.entry(doc.id).or_insert_with(|| {
                candidates.push(Candidate {
                    id: doc.id,
                    title: doc.title.clone(),
                    url: doc.url.clone(),
                    doc_type: doc.doc_type.clone(),
                    score: 0,
                    matching_terms: Vec::new(),
                });
                candidates.len() - 1
            });

            let candidate = &mut candidates[idx];
            candidate.score += term_score(&doc, &wt.term, wt.weight);
            if !candidate.matching_terms.contains(&wt.term) {
                candidate.matching_terms.push(wt.term.clone());
            }
        }
    }

    tracing::debug!(
        terms = weighted.len(),
        candidates = candidates.len(),
        "scored link suggestions"
    );

    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(params.limit);
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentStatus, TermCount};

    fn doc(title: &str, body: &str) -> Document {
        Document {
            id: 1,
            title: title.to_string(),
            body: body.to_string(),
            doc_type: "post".to_string(),
            published_at: 0,
            url: String::new(),
            status: DocumentStatus::Publish,
        }
    }

    #[test]
    fn test_weighted_terms_doubles_phrases() {
        let set = TermSet {
            single_terms: vec![TermCount {
                term: "rust".into(),
                count: 3,
            }],
            phrases: vec![TermCount {
                term: "rust compiler".into(),
                count: 2,
            }],
        };
        assert_eq!(
            weighted_terms(&set),
            vec![
                WeightedTerm {
                    term: "rust".into(),
                    weight: 3
                },
                WeightedTerm {
                    term: "rust compiler".into(),
                    weight: 4
                },
            ]
        );
    }

    #[test]
    fn test_count_occurrences() {
        assert_eq!(count_occurrences("Rust, rust and RUST", "rust"), 3);
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("anything", ""), 0);
        assert_eq!(count_occurrences("", "rust"), 0);
    }

    #[test]
    fn test_count_occurrences_folds_ascii_only() {
        // U+212A KELVIN SIGN is not an upper-case 'k'.
        assert_eq!(count_occurrences("\u{212A}elvin scale", "kelvin"), 0);
        assert_eq!(count_occurrences("KELVIN scale", "kelvin"), 1);
    }

    #[test]
    fn test_term_score_weights_title() {
        let d = doc("Rust tips", "learn rust. more rust.");
        // (1 × 10 + 2) × 3
        assert_eq!(term_score(&d, "rust", 3), 36);
    }

    #[test]
    fn test_extra_title_occurrence_increases_score() {
        let base = doc("Rust tips", "rust body");
        let more = doc("Rust tips for Rust", "rust body");
        for weight in [1, 2, 7] {
            assert!(term_score(&more, "rust", weight) > term_score(&base, "rust", weight));
        }
    }
}
