//! Core traits and types for the parlance intent-matching engine
//!
//! This crate provides foundational types used across all other crates:
//! - Candidate entity matches and match results
//! - Intent templates and slot declarations
//! - Traits for pluggable collaborators (recognizers, stemmers, token filters)
//! - Error types
//! - Structured learning diagnostics

pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod intent;
pub mod result;
pub mod traits;

pub use diagnostics::{LearnEvent, LearnReport};
pub use entity::EntityMatch;
pub use error::EngineError;
pub use intent::{IntentTemplate, SlotDeclaration, SlotSpec, SEQUENCE_SEPARATOR};
pub use result::{MatchResult, TestMode};
pub use traits::{EntityRecognizer, Stemmer, TokenFilter};
