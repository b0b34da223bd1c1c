//! Declarative configuration for parlance agents
//!
//! Engines can be assembled entirely from code, but most agents are data:
//! a set of recognizers, a handful of intents and their example sentences.
//! This crate gives that data a serde model ([`AgentDefinition`]), a YAML
//! loader and a [`build`] function producing a ready engine.
//!
//! # Example
//!
//! ```ignore
//! use parlance_config::AgentDefinition;
//!
//! let definition = AgentDefinition::load("agent.yaml")?;
//! let engine = parlance_config::build(&definition)?;
//! let result = engine.test("hello mark");
//! ```

mod builder;
mod definition;
mod loader;

pub use builder::build;
pub use definition::{
    AgentDefinition, Algorithm, DocumentDefinition, EntityDefinition, EntityKind,
    IntentDefinition,
};

use parlance_core::EngineError;
use thiserror::Error;

/// Errors while loading or applying an agent definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Definition file not found at {0}: {1}")]
    FileNotFound(String, String),

    #[error("Failed to parse definition: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Engine rejected definition: {0}")]
    Engine(#[from] EngineError),
}
