//! Test-time results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::EntityMatch;

/// How `test` should align entities against intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMode {
    /// Match against declared intents and their slot templates.
    #[default]
    Standard,
    /// Resolve against every registered entity type, ignore intent slot
    /// declarations, and report the single best-scoring label. Open-ended
    /// exploration.
    AnyEntity,
}

/// A successful intent match.
///
/// No-match is not an error and not a degenerate `MatchResult`: `test`
/// returns `None` for it, so the two outcomes differ by shape alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Root intent name.
    pub intent: String,
    /// Classifier confidence for this intent, in `[0, 1]`.
    pub score: f64,
    /// Bound entities in position order.
    pub entities: Vec<EntityMatch>,
    /// Bound entities keyed by slot id.
    pub slots: HashMap<String, EntityMatch>,
    /// Input text with entity spans replaced by `{entityType}` placeholders.
    pub templated_text: String,
    /// Number of entities bound to slots.
    pub found: usize,
    /// Fewer entities were resolved than the template declares.
    pub missing_entities: bool,
    /// More entities of a declared type were resolved than the template has
    /// slots for.
    pub exceed_entities: bool,
    /// Entities of an undeclared type were resolved.
    pub extra_entities: bool,
}

impl MatchResult {
    /// Bound entity for `slot_id`, if any.
    pub fn slot(&self, slot_id: &str) -> Option<&EntityMatch> {
        self.slots.get(slot_id)
    }

    /// Extracted value for `slot_id`, if the slot is bound.
    pub fn slot_value(&self, slot_id: &str) -> Option<&Value> {
        self.slots.get(slot_id).map(|m| &m.value)
    }
}
