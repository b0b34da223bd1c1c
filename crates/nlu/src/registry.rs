//! Intent template storage and tagged-sentence parsing.
//!
//! The registry is an insertion-ordered template store. The key scheme is
//! the engine's choice: the Fuzzy engine files templates under their root
//! name, the Sequential engine under the `name~type1~type2...` sequence key,
//! so one root may own several sequences.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parlance_core::{EngineError, IntentTemplate};
use regex::Regex;

/// `{entityType}` placeholder syntax in tagged training sentences.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap());

/// Whether `text` uses tagged-placeholder syntax.
pub fn is_tagged(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}

/// Entity type names referenced by `text`'s placeholders, in order.
pub fn placeholder_types(text: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Insertion-ordered intent template store.
#[derive(Debug, Default)]
pub struct IntentRegistry {
    keys: Vec<String>,
    templates: HashMap<String, IntentTemplate>,
}

impl IntentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `template` under `key`. Fails without modification if the key is
    /// already taken.
    pub fn insert(&mut self, key: &str, template: IntentTemplate) -> Result<(), EngineError> {
        if self.templates.contains_key(key) {
            return Err(EngineError::DuplicateIntent {
                name: key.to_string(),
            });
        }
        self.keys.push(key.to_string());
        self.templates.insert(key.to_string(), template);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&IntentTemplate> {
        self.templates.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut IntentTemplate> {
        self.templates.get_mut(key)
    }

    /// Whether any stored template reports `root` as its intent name.
    pub fn has_root(&self, root: &str) -> bool {
        self.templates.values().any(|t| t.name == root)
    }

    /// Templates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IntentTemplate)> {
        self.keys
            .iter()
            .filter_map(|k| self.templates.get(k).map(|t| (k.as_str(), t)))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
