//! Structured diagnostics for registry mutations.
//!
//! Learning operations can create intents and append slots as a side effect
//! of seeing a new example. Instead of logging those mutations and moving
//! on, the engines return them as values so callers can observe and test
//! the behavior. `tracing` output remains purely informational.

use serde::{Deserialize, Serialize};

/// One observable mutation performed while learning a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LearnEvent {
    /// A new intent template was created for this document.
    IntentCreated {
        intent_key: String,
        root_intent: String,
    },
    /// A slot declaration was appended to an existing template.
    SlotAdded {
        intent_key: String,
        entity_type: String,
        slot_id: String,
    },
    /// The templated sentence was submitted to the classifier.
    DocumentTrained { label: String },
}

/// Outcome of a successful `learn_document` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnReport {
    /// Registry key the document was filed under (root name for Fuzzy,
    /// `name~type...` sequence key for Sequential).
    pub intent_key: String,
    /// Caller-facing intent name.
    pub root_intent: String,
    /// The sentence with entity spans replaced by `{entityType}`
    /// placeholders, as submitted to the classifier.
    pub templated_text: String,
    /// Registry and classifier mutations, in order.
    pub events: Vec<LearnEvent>,
}

impl LearnReport {
    /// Whether this learn call created the intent it filed under.
    pub fn created_intent(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, LearnEvent::IntentCreated { .. }))
    }
}
