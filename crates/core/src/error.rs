//! Engine error types.
//!
//! Errors are reserved for setup failures (bad declarations, bad training
//! input). A test-time no-match is not an error: it is the `None` result.

use thiserror::Error;

/// Setup and learning failures.
///
/// Any operation returning one of these leaves the engine's registry and
/// classifier exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// An intent with this name (or sequence) is already declared.
    #[error("intent already declared: {name}")]
    DuplicateIntent { name: String },

    /// A document was linked to an intent that does not exist and the
    /// learn-new-intent option was not set.
    #[error("unknown intent: {name}")]
    UnknownIntent { name: String },

    /// A tagged training example referenced an entity type with no
    /// registered recognizer.
    #[error("no recognizer registered for entity type: {entity_type}")]
    UnknownEntity { entity_type: String },

    /// Intent names must not contain the sequence separator character.
    #[error("invalid intent name {name:?}: must not contain '~'")]
    InvalidIntentName { name: String },
}
