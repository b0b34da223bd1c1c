//! Pluggable-backend traits consumed by the matching engines.
//!
//! Recognizers, stemmers and token filters are collaborators: the engines
//! define what they need from them here and contain no per-language grammar
//! logic themselves.

use crate::entity::EntityMatch;

/// Produces candidate entity matches over raw text.
///
/// Implementations must be effectively read-only while any engine using them
/// is matching: engines perform no synchronization, so callers sharing one
/// recognizer across engines must not interleave its mutation operations
/// with `test` calls.
pub trait EntityRecognizer: Send + Sync {
    /// Entity type name this recognizer produces.
    fn name(&self) -> &str;

    /// Append all candidate matches found in `text` to `out`.
    ///
    /// Candidates may overlap each other and candidates from other
    /// recognizers; conflict resolution happens downstream. Matches must
    /// carry byte offsets into `text`.
    fn find_matches(&self, text: &str, out: &mut Vec<EntityMatch>);

    /// Whether [`expand`](Self::expand) does anything for this recognizer.
    ///
    /// Engines call `expand` only for slots backed by recognizers that
    /// return `true` here, and only in strict-order (Sequential) alignment.
    fn supports_expansion(&self) -> bool {
        false
    }

    /// Trim a greedily captured span in place.
    ///
    /// Implementations may shrink the span by consuming configured leading
    /// prefixes/conjunctions and trailing punctuation, updating `position`,
    /// `length`, `raw_text` and `value` together. Engines re-derive any
    /// dependent offsets after calling this.
    fn expand(&self, entity_match: &mut EntityMatch) {
        let _ = entity_match;
    }
}

/// Reduces a word to its stem. Pure: no state observable across calls.
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

impl<F> Stemmer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn stem(&self, word: &str) -> String {
        self(word)
    }
}

/// Drops uninformative tokens before classification.
///
/// Contract: when filtering would leave fewer tokens than a minimum viable
/// count, implementations must return the input unchanged rather than an
/// empty or near-empty list. Pure otherwise.
pub trait TokenFilter: Send + Sync {
    fn filter(&self, tokens: Vec<String>) -> Vec<String>;
}

impl<F> TokenFilter for F
where
    F: Fn(Vec<String>) -> Vec<String> + Send + Sync,
{
    fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        self(tokens)
    }
}
