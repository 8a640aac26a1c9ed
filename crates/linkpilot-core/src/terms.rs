//! Keyword and phrase extraction.
//!
//! Produces a [`TermSet`] from raw document content:
//!
//! - **Single terms**: tokens from [`tokenize`](crate::tokenize::tokenize)
//!   counted per distinct word, ranked by count, truncated to `limit`.
//! - **Phrases**: adjacent word pairs of the normalized text. A pair is
//!   skipped if either word is a stop word or shorter than
//!   [`MIN_PHRASE_WORD_LEN`]; pairs seen only once are dropped; the rest
//!   are ranked and truncated to [`PHRASE_LIMIT`].
//!
//! Phrase filtering is stricter than unigram filtering (length ≥ 3 rather
//! than > 2, and a frequency above one).
//!
//! Ranking is a stable sort on count, so equal counts keep first-seen order.

use std::collections::HashMap;

use crate::models::{TermCount, TermSet};
use crate::tokenize::{is_stop_word, normalize, tokenize, words};

/// Default number of single terms kept by [`extract_keywords`].
pub const DEFAULT_KEYWORD_LIMIT: usize = 20;

/// Maximum number of phrases kept.
pub const PHRASE_LIMIT: usize = 10;

/// Both words of a phrase must be at least this long.
pub const MIN_PHRASE_WORD_LEN: usize = 3;

/// Extract ranked single terms (up to `limit`) and phrases from `content`.
pub fn extract_keywords(content: &str, limit: usize) -> TermSet {
    let normalized = normalize(content);

    let single_terms = rank(count_in_order(tokenize(content)), limit);
    let phrases = extract_bigrams(&normalized, PHRASE_LIMIT);

    TermSet {
        single_terms,
        phrases,
    }
}

/// Extract recurring two-word phrases from already normalized text.
pub fn extract_bigrams(normalized: &str, limit: usize) -> Vec<TermCount> {
    let tokens: Vec<&str> = words(normalized).collect();

    let pairs = tokens.windows(2).filter_map(|pair| {
        let (w1, w2) = (pair[0], pair[1]);
        if !is_phrase_word(w1) || !is_phrase_word(w2) {
            return None;
        }
        Some(format!("{} {}", w1, w2))
    });

    let recurring: Vec<TermCount> = count_in_order(pairs)
        .into_iter()
        .filter(|tc| tc.count > 1)
        .collect();

    rank(recurring, limit)
}

fn is_phrase_word(word: &str) -> bool {
    word.len() >= MIN_PHRASE_WORD_LEN && !is_stop_word(word)
}

/// Count occurrences, keeping entries in first-seen order.
fn count_in_order<I>(items: I) -> Vec<TermCount>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<TermCount> = Vec::new();

    for item in items {
        match index.get(&item) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push(TermCount {
                    term: item,
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Stable sort by count (descending), then truncate.
fn rank(mut counts: Vec<TermCount>, limit: usize) -> Vec<TermCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[TermCount]) -> Vec<(&str, usize)> {
        list.iter().map(|tc| (tc.term.as_str(), tc.count)).collect()
    }

    #[test]
    fn test_cats_and_dogs_ranking() {
        let set = extract_keywords(
            "<p>Cats are great. Cats are fun. Dogs are great too.</p>",
            DEFAULT_KEYWORD_LIMIT,
        );
        assert_eq!(
            terms(&set.single_terms),
            vec![("cats", 2), ("great", 2), ("fun", 1), ("dogs", 1)]
        );
        // Every adjacent pair either contains a stop word or occurs once.
        assert!(set.phrases.is_empty());
    }

    #[test]
    fn test_limit_truncates_single_terms() {
        let set = extract_keywords("alpha bravo charlie delta echo alpha", 2);
        assert_eq!(terms(&set.single_terms), vec![("alpha", 2), ("bravo", 1)]);
    }

    #[test]
    fn test_recurring_phrases_are_kept() {
        let text = "rust compiler rocks. the rust compiler is fast. rust compiler again";
        let set = extract_keywords(text, DEFAULT_KEYWORD_LIMIT);
        assert_eq!(terms(&set.phrases), vec![("rust compiler", 3)]);
    }

    #[test]
    fn test_phrases_require_three_letter_words() {
        // "go" survives nothing; pairs containing it are skipped.
        let set = extract_keywords("go fast go fast go fast", DEFAULT_KEYWORD_LIMIT);
        assert!(set.phrases.is_empty());
    }

    #[test]
    fn test_stop_words_break_phrases() {
        // "coffee and beans" never forms "coffee beans".
        let normalized = normalize("coffee and beans, coffee and beans");
        assert!(extract_bigrams(&normalized, PHRASE_LIMIT).is_empty());
    }

    #[test]
    fn test_phrase_ties_keep_first_seen_order() {
        let text = "green tea green tea black coffee black coffee";
        let normalized = normalize(text);
        let phrases = extract_bigrams(&normalized, PHRASE_LIMIT);
        assert_eq!(
            terms(&phrases),
            vec![("green tea", 2), ("black coffee", 2)]
        );
    }

    #[test]
    fn test_phrase_limit() {
        let mut text = String::new();
        for i in 0..15 {
            let pair = format!("word{i:02} thing{i:02} ");
            text.push_str(&pair);
            text.push_str("and ");
            text.push_str(&pair);
            text.push_str("and ");
        }
        let phrases = extract_bigrams(&normalize(&text), PHRASE_LIMIT);
        assert_eq!(phrases.len(), PHRASE_LIMIT);
        assert_eq!(phrases[0].term, "word00 thing00");
    }

    #[test]
    fn test_bigrams_deterministic() {
        let normalized = normalize("data pipeline design and data pipeline tests, data pipeline");
        let first = extract_bigrams(&normalized, PHRASE_LIMIT);
        let second = extract_bigrams(&normalized, PHRASE_LIMIT);
        assert_eq!(first, second);
        assert_eq!(terms(&first), vec![("data pipeline", 3)]);
    }

    #[test]
    fn test_empty_content() {
        let set = extract_keywords("", DEFAULT_KEYWORD_LIMIT);
        assert!(set.is_empty());
    }
}
