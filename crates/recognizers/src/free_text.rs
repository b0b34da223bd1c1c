//! Free-text capture for strict-order alignment.
//!
//! A free-text slot has no pattern of its own: during Sequential alignment
//! the engine hands it everything between its neighboring slots and then
//! asks this recognizer to trim the span down: configured leading prefixes
//! ("send", "tell"...), conjunctions ("to", "that"...) and trailing
//! punctuation are dropped.
//!
//! `find_matches` intentionally produces nothing: a whole-text candidate
//! would win every conflict-resolution pass and swallow all solid entities.
//! As a consequence, raw-sentence learning cannot discover free-text slots;
//! use tagged examples for intents that contain one.

use parlance_core::{EntityMatch, EntityRecognizer};
use serde_json::Value;

const TRAILING_PUNCTUATION: &str = ".,!?;:";

/// Expandable free-text recognizer.
pub struct FreeTextRecognizer {
    name: String,
    prefixes: Vec<String>,
    conjunctions: Vec<String>,
}

impl FreeTextRecognizer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefixes: Vec::new(),
            conjunctions: Vec::new(),
        }
    }

    /// Leading phrases to strip from a claimed span (e.g. "send", "say").
    pub fn with_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.prefixes = prefixes.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Connective words to strip from either end of a claimed span (e.g.
    /// "to", "that"). The text between two slots ends right before the next
    /// solid entity, so connectives show up at the tail as often as at the
    /// head.
    pub fn with_conjunctions(mut self, conjunctions: &[&str]) -> Self {
        self.conjunctions = conjunctions.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Length of a configured phrase at the start of `rest`, longest first.
    /// The phrase must end at a word boundary.
    fn leading_phrase_len(&self, rest: &str) -> Option<usize> {
        let mut phrases: Vec<&str> = self
            .prefixes
            .iter()
            .chain(self.conjunctions.iter())
            .map(String::as_str)
            .collect();
        phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));

        for phrase in phrases {
            let Some(head) = rest.get(..phrase.len()) else {
                continue;
            };
            if !head.eq_ignore_ascii_case(phrase) {
                continue;
            }
            let boundary = rest[phrase.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
            if boundary {
                return Some(phrase.len());
            }
        }
        None
    }

    /// Length of a configured conjunction at the end of `rest`, longest
    /// first, respecting word boundaries.
    fn trailing_conjunction_len(&self, rest: &str) -> Option<usize> {
        let mut words: Vec<&str> = self.conjunctions.iter().map(String::as_str).collect();
        words.sort_by_key(|w| std::cmp::Reverse(w.len()));

        for word in words {
            let Some(split) = rest.len().checked_sub(word.len()) else {
                continue;
            };
            let Some(tail) = rest.get(split..) else {
                continue;
            };
            if !tail.eq_ignore_ascii_case(word) {
                continue;
            }
            let boundary = rest[..split]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
            if boundary {
                return Some(word.len());
            }
        }
        None
    }
}

impl EntityRecognizer for FreeTextRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_matches(&self, _text: &str, _out: &mut Vec<EntityMatch>) {}

    fn supports_expansion(&self) -> bool {
        true
    }

    fn expand(&self, entity_match: &mut EntityMatch) {
        let original = std::mem::take(&mut entity_match.raw_text);
        let mut start = 0usize;

        loop {
            let rest = &original[start..];
            let trimmed = rest.trim_start();
            start += rest.len() - trimmed.len();
            match self.leading_phrase_len(trimmed) {
                Some(len) => start += len,
                None => break,
            }
        }

        fn trim_tail(s: &str) -> &str {
            s.trim_end_matches(|c: char| c.is_whitespace() || TRAILING_PUNCTUATION.contains(c))
        }
        let mut kept = trim_tail(&original[start..]);
        while let Some(len) = self.trailing_conjunction_len(kept) {
            kept = trim_tail(&kept[..kept.len() - len]);
        }

        entity_match.position += start;
        entity_match.raw_text = kept.to_string();
        entity_match.length = kept.len();
        entity_match.value = Value::String(kept.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expand(recognizer: &FreeTextRecognizer, raw: &str, position: usize) -> EntityMatch {
        let mut m = EntityMatch::new("message", Value::String(raw.to_string()), raw, position);
        recognizer.expand(&mut m);
        m
    }

    #[test]
    fn test_produces_no_candidates() {
        let recognizer = FreeTextRecognizer::new("message");
        let mut out = Vec::new();
        recognizer.find_matches("anything at all", &mut out);
        assert!(out.is_empty());
        assert!(recognizer.supports_expansion());
    }

    #[test]
    fn test_trims_prefixes_and_punctuation() {
        let recognizer = FreeTextRecognizer::new("message")
            .with_prefixes(&["send", "tell"])
            .with_conjunctions(&["to", "that"]);

        let m = expand(&recognizer, "Send that we are late!", 0);
        assert_eq!(m.raw_text, "we are late");
        assert_eq!(m.position, 10);
        assert_eq!(m.length, 11);
        assert_eq!(m.value, json!("we are late"));
    }

    #[test]
    fn test_offset_tracks_claimed_span() {
        let recognizer = FreeTextRecognizer::new("message").with_conjunctions(&["to"]);
        let m = expand(&recognizer, " to the moon.", 20);
        assert_eq!(m.raw_text, "the moon");
        assert_eq!(m.position, 24);
    }

    #[test]
    fn test_prefix_needs_word_boundary() {
        let recognizer = FreeTextRecognizer::new("message").with_prefixes(&["send"]);
        let m = expand(&recognizer, "sender details", 0);
        assert_eq!(m.raw_text, "sender details");
        assert_eq!(m.position, 0);
    }

    #[test]
    fn test_trims_trailing_conjunction() {
        let recognizer = FreeTextRecognizer::new("message")
            .with_prefixes(&["send"])
            .with_conjunctions(&["to"]);
        let m = expand(&recognizer, "send meet me at noon to ", 0);
        assert_eq!(m.raw_text, "meet me at noon");
        assert_eq!(m.position, 5);
    }

    #[test]
    fn test_all_prefix_span_empties() {
        let recognizer = FreeTextRecognizer::new("message").with_prefixes(&["send"]);
        let m = expand(&recognizer, "send ", 0);
        assert!(m.raw_text.is_empty());
    }
}
