//! Candidate entity matches produced by recognizers.
//!
//! An [`EntityMatch`] is a typed span of the input text together with the
//! value a recognizer extracted from it. Matches are ephemeral: they are
//! created for a single `test`/`learn_document` call, merged by the conflict
//! resolver, and discarded.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A candidate entity found by a recognizer over one input text.
///
/// `position` and `length` are byte offsets into the original text and must
/// lie on UTF-8 character boundaries (recognizers built on `regex` get this
/// for free).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMatch {
    /// Entity type name, matching the producing recognizer's `name()`.
    pub entity_type: String,
    /// Extracted value (number, string, enumerated id, ...).
    pub value: Value,
    /// The exact text span this match covers.
    pub raw_text: String,
    /// Byte offset of the span start in the original text.
    pub position: usize,
    /// Byte length of the span.
    pub length: usize,
    /// Tie-break weight between same-position, same-length candidates.
    /// Higher wins. Never overrides span length.
    pub priority: i32,
}

impl EntityMatch {
    /// Create a match over `raw_text` starting at `position`, priority 0.
    pub fn new(entity_type: impl Into<String>, value: Value, raw_text: impl Into<String>, position: usize) -> Self {
        let raw_text = raw_text.into();
        let length = raw_text.len();
        Self {
            entity_type: entity_type.into(),
            value,
            raw_text,
            position,
            length,
            priority: 0,
        }
    }

    /// Set the recognizer priority for this match.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Byte offset one past the end of the span.
    pub fn end(&self) -> usize {
        self.position + self.length
    }

    /// Whether this span overlaps another.
    pub fn overlaps(&self, other: &EntityMatch) -> bool {
        self.position < other.end() && other.position < self.end()
    }
}
