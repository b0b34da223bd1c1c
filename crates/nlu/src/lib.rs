//! Intent matching for the parlance engine
//!
//! This crate turns free text into a structured intent match:
//! - **Conflict resolution**: merge overlapping candidate entity matches
//!   from independent recognizers into one ordered, non-overlapping
//!   sequence, and rewrite the input into its `{entityType}` templated form
//! - **Label classification**: an incremental word-frequency scorer giving
//!   an independent confidence per intent label
//! - **Alignment**: two engines binding resolved entities to intent slot
//!   templates, order-insensitive ([`FuzzyEngine`]) and strict-order
//!   ([`SequentialEngine`])
//! - **Intent learning**: growing slot templates from tagged or raw example
//!   sentences, with structured diagnostics for every registry mutation
//!
//! # Example
//!
//! ```ignore
//! use parlance_nlu::{FuzzyEngine, IntentEngine, LearnOptions};
//!
//! let mut engine = FuzzyEngine::new();
//! engine.register_entity(username_recognizer);
//! engine.learn_document("Hello {username}!", "greet", &LearnOptions::tagged())?;
//!
//! if let Some(result) = engine.test("hello mark") {
//!     println!("{} ({:.2})", result.intent, result.score);
//! }
//! ```
//!
//! Everything is synchronous and allocation-light; engines share nothing
//! and own their classifier and registry exclusively.

pub mod classifier;
pub mod engine;
pub mod fuzzy;
pub mod registry;
pub mod resolver;
pub mod sequential;
pub mod text;

pub use classifier::{LabelClassifier, LabelScores, Winner, NONE_LABEL};
pub use engine::{
    EngineOptions, IntentEngine, LearnOptions, DEFAULT_CONFIDENCE_THRESHOLD,
};
pub use fuzzy::FuzzyEngine;
pub use registry::IntentRegistry;
pub use resolver::{build_template, resolve, ResolvedText};
pub use sequential::SequentialEngine;
pub use text::StopwordFilter;

// Re-export the core types callers need to drive an engine.
pub use parlance_core::{
    EngineError, EntityMatch, EntityRecognizer, LearnEvent, LearnReport, MatchResult,
    SlotSpec, Stemmer, TestMode, TokenFilter,
};
