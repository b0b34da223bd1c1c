//! Text normalization for the label classifier.
//!
//! The classifier works on unique stems: words are split on non-word
//! characters, case-folded, stripped of diacritics, optionally stemmed and
//! filtered, then deduplicated in order of first appearance.

use std::collections::HashSet;

use parlance_core::TokenFilter;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Case-fold a word and strip combining diacritical marks.
pub fn clean_word(word: &str) -> String {
    word.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Split `text` into cleaned tokens.
///
/// Word boundaries follow Unicode segmentation, so `{location}` placeholders
/// tokenize to `location` and punctuation never reaches the classifier.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(clean_word).collect()
}

/// Drop duplicate tokens, keeping first appearances in order.
pub fn dedup_tokens(tokens: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// English stopword filter.
///
/// Honors the [`TokenFilter`] fallback contract: if filtering would leave
/// fewer than `min_tokens` tokens, the input is returned unchanged so the
/// classifier never sees an emptied document.
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    stopwords: HashSet<String>,
    min_tokens: usize,
}

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from",
    "had", "has", "have", "he", "her", "his", "i", "in", "is", "it", "its",
    "me", "my", "of", "on", "or", "our", "she", "so", "that", "the", "their",
    "them", "they", "this", "to", "was", "we", "were", "will", "with", "you",
    "your",
];

impl StopwordFilter {
    /// Filter over the built-in English stopword list.
    pub fn english() -> Self {
        Self::new(ENGLISH_STOPWORDS.iter().map(|s| s.to_string()))
    }

    /// Filter over a caller-supplied stopword list.
    pub fn new(stopwords: impl IntoIterator<Item = String>) -> Self {
        Self {
            stopwords: stopwords.into_iter().map(|s| clean_word(&s)).collect(),
            min_tokens: 1,
        }
    }

    /// Raise the minimum viable token count guarding the no-op fallback.
    pub fn with_min_tokens(mut self, min_tokens: usize) -> Self {
        self.min_tokens = min_tokens;
        self
    }
}

impl TokenFilter for StopwordFilter {
    fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        let kept: Vec<String> = tokens
            .iter()
            .filter(|t| !self.stopwords.contains(*t))
            .cloned()
            .collect();
        if kept.len() < self.min_tokens {
            tokens
        } else {
            kept
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_folds_case_and_punctuation() {
        assert_eq!(tokenize("Hello, World!"), ["hello", "world"]);
    }

    #[test]
    fn test_tokenize_placeholders() {
        assert_eq!(
            tokenize("buy {number} tickets to {location}"),
            ["buy", "number", "tickets", "to", "location"]
        );
    }

    #[test]
    fn test_clean_word_strips_diacritics() {
        assert_eq!(clean_word("Café"), "cafe");
        assert_eq!(clean_word("naïve"), "naive");
    }

    #[test]
    fn test_dedup_keeps_first_appearance() {
        let tokens = vec!["b".into(), "a".into(), "b".into(), "c".into(), "a".into()];
        assert_eq!(dedup_tokens(tokens), ["b", "a", "c"]);
    }

    #[test]
    fn test_stopword_filter_drops_noise() {
        let filter = StopwordFilter::english();
        let tokens = vec!["the".into(), "big".into(), "apple".into()];
        assert_eq!(filter.filter(tokens), ["big", "apple"]);
    }

    #[test]
    fn test_stopword_filter_noop_fallback() {
        let filter = StopwordFilter::english();
        let tokens: Vec<String> = vec!["the".into(), "and".into()];
        // Filtering would empty the list entirely, so the input comes back.
        assert_eq!(filter.filter(tokens.clone()), tokens);
    }
}
