//! Declarative agent definition model.
//!
//! An agent definition describes everything needed to assemble a working
//! engine: which recognizers to register, which intents to declare and
//! which example documents to learn. Definitions are plain serde data and
//! usually come from a YAML file.

use parlance_core::SlotSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which alignment engine a definition builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Fuzzy,
    Sequential,
}

/// Complete declarative description of one agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Alignment engine to build; defaults to fuzzy.
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Confidence threshold override; the engine default applies if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
    /// Recognizers to register, in order.
    #[serde(default)]
    pub entities: Vec<EntityDefinition>,
    /// Intents to declare explicitly before any document is learned.
    #[serde(default)]
    pub intents: Vec<IntentDefinition>,
    /// Example documents to learn, in order.
    #[serde(default)]
    pub documents: Vec<DocumentDefinition>,
}

/// One recognizer registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Entity type name.
    pub name: String,
    #[serde(flatten)]
    pub kind: EntityKind,
}

/// Recognizer flavor plus its configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    /// Enumerated strings mapped to entity ids.
    StringSet {
        #[serde(default)]
        priority: i32,
        /// Entity id to the strings producing it. Ordered map keeps engine
        /// assembly deterministic.
        matches: BTreeMap<String, Vec<String>>,
    },
    /// Regex patterns; the value is the first capture group (or the whole
    /// match when the pattern has no groups). Custom capture mapping needs
    /// code, not config.
    Pattern {
        #[serde(default)]
        priority: i32,
        patterns: Vec<String>,
    },
    /// Digit and English word numbers.
    Number {
        #[serde(default)]
        priority: i32,
    },
    /// Email addresses.
    Email {
        #[serde(default)]
        priority: i32,
    },
    /// Free-text capture for sequential alignment.
    FreeText {
        #[serde(default)]
        prefixes: Vec<String>,
        #[serde(default)]
        conjunctions: Vec<String>,
    },
}

/// One explicit intent declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDefinition {
    pub name: String,
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
}

/// One training document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDefinition {
    pub text: String,
    /// Root intent the document belongs to.
    pub intent: String,
    /// Force tagged (`true`) or raw (`false`) interpretation; placeholder
    /// syntax decides when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagged: Option<bool>,
    /// Slot id hints for newly learned slots, by placeholder position.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slot_names: Vec<String>,
}
