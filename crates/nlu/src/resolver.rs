//! Conflict resolution over candidate entity matches.
//!
//! Recognizers work independently and freely propose overlapping spans. The
//! resolver merges all candidates for one input into a single ordered,
//! non-overlapping sequence and rewrites the input into its templated form,
//! which is the unit the label classifier scores.

use parlance_core::EntityMatch;
use tracing::warn;

/// A resolved, non-overlapping entity sequence with its templated text.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedText {
    /// Kept matches, position-ascending and pairwise disjoint.
    pub entities: Vec<EntityMatch>,
    /// Input text with each kept span replaced by `{entityType}`.
    pub templated_text: String,
}

/// Merge `candidates` into one non-overlapping sequence over `text`.
///
/// Candidates are ranked by `(position asc, length desc, priority desc)` and
/// kept greedily: a candidate survives only if it starts at or after the end
/// of the last kept one. Earliest start wins; among same-start candidates
/// the longest wins; priority breaks exact position+length ties and never
/// overrides length.
pub fn resolve(text: &str, mut candidates: Vec<EntityMatch>) -> ResolvedText {
    candidates.retain(|c| {
        if c.length == 0 {
            warn!(entity_type = %c.entity_type, position = c.position, "discarding zero-length match");
            return false;
        }
        true
    });
    candidates.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then(b.length.cmp(&a.length))
            .then(b.priority.cmp(&a.priority))
    });

    let mut kept: Vec<EntityMatch> = Vec::new();
    let mut cursor = 0usize;
    for candidate in candidates {
        if candidate.position >= cursor {
            cursor = candidate.end();
            kept.push(candidate);
        }
    }

    let templated_text = build_template(text, &kept);
    ResolvedText {
        entities: kept,
        templated_text,
    }
}

/// Rebuild `text` with each entity span replaced by its `{entityType}`
/// placeholder. `entities` must be position-ascending and non-overlapping.
pub fn build_template(text: &str, entities: &[EntityMatch]) -> String {
    let mut templated = String::with_capacity(text.len());
    let mut last = 0usize;
    for entity in entities {
        templated.push_str(&text[last..entity.position]);
        templated.push('{');
        templated.push_str(&entity.entity_type);
        templated.push('}');
        last = entity.end();
    }
    templated.push_str(&text[last..]);
    templated
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn m(entity_type: &str, raw: &str, position: usize) -> EntityMatch {
        EntityMatch::new(entity_type, json!(raw), raw, position)
    }

    #[test]
    fn test_empty_candidates() {
        let resolved = resolve("nothing to see", Vec::new());
        assert!(resolved.entities.is_empty());
        assert_eq!(resolved.templated_text, "nothing to see");
    }

    #[test]
    fn test_longest_wins_at_same_position() {
        let text = "big apple pie";
        let resolved = resolve(
            text,
            vec![m("logo", "big", 0), m("city", "big apple", 0)],
        );
        assert_eq!(resolved.entities.len(), 1);
        assert_eq!(resolved.entities[0].entity_type, "city");
        assert_eq!(resolved.templated_text, "{city} pie");
    }

    #[test]
    fn test_priority_breaks_exact_ties_only() {
        let text = "apple";
        // Same position and length: higher priority wins.
        let resolved = resolve(
            text,
            vec![
                m("fruit", "apple", 0),
                m("logo", "apple", 0).with_priority(10),
            ],
        );
        assert_eq!(resolved.entities[0].entity_type, "logo");

        // Priority never overrides length.
        let resolved = resolve(
            "apples",
            vec![
                m("plural", "apples", 0),
                m("logo", "apple", 0).with_priority(100),
            ],
        );
        assert_eq!(resolved.entities[0].entity_type, "plural");
    }

    #[test]
    fn test_overlap_discarded() {
        // "pineapple" covers the inner "apple"; the later standalone
        // occurrences survive.
        let text = "This pineapple works for Apple in the Big Apple";
        let resolved = resolve(
            text,
            vec![
                m("logo", "apple", 9),
                m("fruit", "pineapple", 5),
                m("logo", "Apple", 25),
                m("city", "Big Apple", 38),
                m("logo", "Apple", 42),
            ],
        );
        let kept: Vec<(&str, usize)> = resolved
            .entities
            .iter()
            .map(|e| (e.entity_type.as_str(), e.position))
            .collect();
        assert_eq!(kept, [("fruit", 5), ("logo", 25), ("city", 38)]);
        assert_eq!(
            resolved.templated_text,
            "This {fruit} works for {logo} in the {city}"
        );
    }

    #[test]
    fn test_non_overlap_invariant() {
        let text = "1 22 333 4444 55555";
        let candidates: Vec<EntityMatch> = (0..text.len())
            .flat_map(|p| {
                (1..=3).filter_map(move |l| {
                    text.get(p..p + l).map(|s| {
                        EntityMatch::new("chunk", json!(s), s, p)
                    })
                })
            })
            .collect();
        let resolved = resolve(text, candidates);
        for pair in resolved.entities.windows(2) {
            assert!(pair[0].position + pair[0].length <= pair[1].position);
        }
    }

    #[test]
    fn test_zero_length_discarded() {
        let mut ghost = m("ghost", "", 3);
        ghost.length = 0;
        let resolved = resolve("abc def", vec![ghost, m("word", "def", 4)]);
        assert_eq!(resolved.entities.len(), 1);
        assert_eq!(resolved.entities[0].entity_type, "word");
    }
}
