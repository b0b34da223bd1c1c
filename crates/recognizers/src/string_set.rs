//! Enumerated-string entity recognizer.
//!
//! Maps a set of matchable strings to entity ids, e.g. `"big apple"` and
//! `"new york"` both to `ny`. Matching is case-insensitive and positional;
//! substring hits are intentional (`apple` inside `pineapple` is a valid
//! candidate) because overlap handling belongs to the conflict resolver.

use parlance_core::{EntityMatch, EntityRecognizer};
use regex::Regex;
use serde_json::json;
use tracing::warn;

/// Recognizer over an enumerated set of strings.
pub struct StringSetRecognizer {
    name: String,
    priority: i32,
    /// Entity id, matchable text (for introspection) and compiled pattern.
    entries: Vec<(String, String, Regex)>,
}

impl StringSetRecognizer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            entries: Vec::new(),
        }
    }

    /// Set the priority stamped on every produced match.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Register `text` as a match producing entity id `id`.
    ///
    /// May be called at any time to grow the vocabulary, but not while an
    /// engine using this recognizer is inside a `test` call; recognizers
    /// are assumed read-only during matching.
    pub fn add_match(&mut self, id: &str, text: &str) -> &mut Self {
        let pattern = format!("(?i){}", regex::escape(text));
        match Regex::new(&pattern) {
            Ok(regex) => {
                self.entries.push((id.to_string(), text.to_string(), regex));
            }
            Err(error) => {
                warn!(entity = %self.name, text, %error, "skipping unmatchable string");
            }
        }
        self
    }

    /// Builder-style variant of [`add_match`](Self::add_match).
    pub fn matching(mut self, id: &str, texts: &[&str]) -> Self {
        for text in texts {
            self.add_match(id, text);
        }
        self
    }
}

impl EntityRecognizer for StringSetRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_matches(&self, text: &str, out: &mut Vec<EntityMatch>) {
        for (id, _, regex) in &self.entries {
            for found in regex.find_iter(text) {
                out.push(
                    EntityMatch::new(&self.name, json!(id), found.as_str(), found.start())
                        .with_priority(self.priority),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_occurrences() {
        let recognizer = StringSetRecognizer::new("fruit").matching("apple", &["apple"]);
        let mut out = Vec::new();
        recognizer.find_matches("Apple pie, apple juice", &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, 0);
        assert_eq!(out[0].raw_text, "Apple");
        assert_eq!(out[1].position, 11);
    }

    #[test]
    fn test_substring_candidates_allowed() {
        let recognizer = StringSetRecognizer::new("logo").matching("apple", &["apple"]);
        let mut out = Vec::new();
        recognizer.find_matches("pineapple", &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].position, 4);
    }

    #[test]
    fn test_incremental_vocabulary() {
        let mut recognizer = StringSetRecognizer::new("city");
        recognizer.add_match("ny", "new york");
        recognizer.add_match("ny", "big apple");

        let mut out = Vec::new();
        recognizer.find_matches("the Big Apple", &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, json!("ny"));
    }
}
