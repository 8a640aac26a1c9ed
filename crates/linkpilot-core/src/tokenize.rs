//! Markup-aware word tokenizer.
//!
//! Turns raw document markup into lower-case ASCII word tokens suitable for
//! frequency counting.
//!
//! # Pipeline
//!
//! 1. Remove shortcode directives (`[gallery ids="1,2"]`, `[/caption]`).
//!    Only the names in [`SHORTCODE_NAMES`] count; other bracketed text
//!    such as `[credit Jane Smith]` is ordinary prose.
//! 2. Strip markup: `<script>`/`<style>` blocks with their contents, every
//!    other tag, and character entities. Each is replaced by a space so
//!    that adjacent block elements do not glue words together.
//! 3. ASCII lower-case.
//! 4. Drop every character outside `[a-z0-9]` and ASCII whitespace
//!    (vertical tab included, mapped to a space).
//! 5. Split on whitespace runs.
//!
//! [`tokenize`] then keeps only tokens longer than two characters that are
//! not stop words. [`normalize`] exposes steps 1–4 on their own so the
//! bigram pass in [`terms`](crate::terms) sees exactly the same text.
//!
//! # Example
//!
//! ```rust
//! use linkpilot_core::tokenize::tokenize;
//!
//! let tokens = tokenize("<p>The <b>Rust</b> compiler is fast!</p>");
//! assert_eq!(tokens, vec!["rust", "compiler", "fast"]);
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Tokens must be longer than this many characters to count as keywords.
pub const MIN_TOKEN_LEN: usize = 2;

/// Common English function words ignored by keyword and phrase extraction.
const STOP_WORD_LIST: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "back", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "come", "could", "did", "do", "does", "doing", "down", "during",
    "each", "else", "even", "every", "few", "for", "from", "further", "get", "gets", "got", "had",
    "has", "have", "having", "he", "her", "here", "him", "his", "how", "i", "if", "in", "into",
    "is", "it", "its", "just", "like", "made", "make", "makes", "may", "me", "might", "more",
    "most", "must", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "other",
    "our", "out", "over", "own", "same", "shall", "she", "should", "so", "some", "still", "such",
    "take", "than", "that", "the", "their", "them", "then", "there", "they", "this", "through",
    "to", "too", "under", "until", "up", "us", "use", "used", "using", "very", "was", "way", "we",
    "well", "were", "what", "when", "where", "which", "while", "who", "why", "will", "with",
    "would", "you", "your",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORD_LIST.iter().copied().collect());

/// Shortcodes whose opening and closing markers are stripped. Text between
/// a pair is kept.
pub const SHORTCODE_NAMES: &[&str] = &[
    "audio",
    "caption",
    "embed",
    "gallery",
    "playlist",
    "video",
    "wp_caption",
];

static SHORTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"\[\[?/?(?:{})\b[^\[\]]*\]\]?", SHORTCODE_NAMES.join("|"));
    Regex::new(&pattern).unwrap_or_else(|_| panic!("Invalid Regex"))
});
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap_or_else(|_| panic!("Invalid Regex")));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:[A-Za-z]+|#[0-9]+|#[xX][0-9A-Fa-f]+);")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Returns true if `word` is in the stop-word set. Expects lower-case input.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Returns true if `word` survives the unigram filter.
pub fn is_keyword_token(word: &str) -> bool {
    word.len() > MIN_TOKEN_LEN && !is_stop_word(word)
}

/// Remove shortcodes and markup, leaving space-separated plain text.
pub fn strip_markup(raw: &str) -> String {
    let text = SHORTCODE_RE.replace_all(raw, " ");
    let text = SCRIPT_STYLE_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, " ");
    ENTITY_RE.replace_all(&text, " ").into_owned()
}

/// Steps 1–4 of the pipeline: plain, lower-case, `[a-z0-9\s]` only.
pub fn normalize(raw: &str) -> String {
    strip_markup(raw)
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '\x0B' { ' ' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_ascii_whitespace())
        .collect()
}

/// Split normalized text into words without any filtering.
pub fn words(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_ascii_whitespace()
}

/// Tokenize raw markup into filtered keyword tokens, in document order.
pub fn tokenize(raw: &str) -> Vec<String> {
    let normalized = normalize(raw);
    words(&normalized)
        .filter(|w| is_keyword_token(w))
        .map(str::to_string)
        .collect()
}
