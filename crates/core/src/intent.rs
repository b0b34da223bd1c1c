//! Intent templates and slot declarations.
//!
//! An intent is a named pattern of expected entities. Each expected entity
//! occurrence is a [`SlotDeclaration`] binding an entity type to a slot id
//! unique within the intent. Templates are built explicitly through
//! `declare_intent` or grown incrementally by the learning operations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Separator used to build the sequence identity key of an intent
/// (`name~type1~type2...`). Intent names must not contain it.
pub const SEQUENCE_SEPARATOR: char = '~';

/// Caller-facing slot request passed to `declare_intent`.
///
/// When `id` is `None` the template assigns an automatic id: the entity type
/// name for the first occurrence, then `type1`, `type2`, ... for repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    /// Entity type this slot expects.
    pub entity: String,
    /// Explicit slot id, if the caller wants one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SlotSpec {
    /// Slot with an auto-generated id.
    pub fn entity(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            id: None,
        }
    }

    /// Slot with a caller-supplied id.
    pub fn named(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            id: Some(id.into()),
        }
    }
}

/// One expected entity occurrence inside an intent template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDeclaration {
    /// Entity type expected at this slot.
    pub entity_type: String,
    /// Slot id, unique within the intent.
    pub slot_id: String,
}

/// A named pattern of expected entities.
///
/// `slots` is ordered; the order is what the Sequential engine enforces and
/// what the Fuzzy engine uses to hand out slot ids per entity type. Slot ids
/// are assumed unique within one template; callers supplying explicit ids
/// are responsible for not colliding with each other or with auto ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentTemplate {
    /// Root intent name reported to callers.
    pub name: String,
    /// Ordered slot declarations.
    pub slots: Vec<SlotDeclaration>,
    /// Per entity type, the slot ids in declaration order.
    slot_index: HashMap<String, Vec<String>>,
}

impl IntentTemplate {
    /// Empty template for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Vec::new(),
            slot_index: HashMap::new(),
        }
    }

    /// Append a slot for `entity_type`, generating an id unless one is given.
    ///
    /// Returns the id assigned to the new slot.
    pub fn push_slot(&mut self, entity_type: &str, explicit_id: Option<&str>) -> String {
        let ids = self.slot_index.entry(entity_type.to_string()).or_default();
        let slot_id = match explicit_id {
            Some(id) => id.to_string(),
            None if ids.is_empty() => entity_type.to_string(),
            None => format!("{}{}", entity_type, ids.len()),
        };
        ids.push(slot_id.clone());
        self.slots.push(SlotDeclaration {
            entity_type: entity_type.to_string(),
            slot_id: slot_id.clone(),
        });
        slot_id
    }

    /// Number of declared occurrences of `entity_type`.
    pub fn occurrences(&self, entity_type: &str) -> usize {
        self.slot_index.get(entity_type).map_or(0, Vec::len)
    }

    /// Slot ids declared for `entity_type`, in declaration order.
    pub fn slot_ids_for(&self, entity_type: &str) -> &[String] {
        self.slot_index.get(entity_type).map_or(&[], Vec::as_slice)
    }

    /// Entity types in declaration order, repeats included.
    pub fn entity_sequence(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.entity_type.as_str())
    }

    /// Distinct entity types declared by this template.
    pub fn declared_types(&self) -> impl Iterator<Item = &str> {
        self.slot_index.keys().map(String::as_str)
    }

    /// Identity key encoding the exact ordered entity type sequence
    /// (`name~type1~type2...`). The Sequential engine stores templates under
    /// this key; `name` alone is the reported root intent.
    pub fn sequence_key(&self) -> String {
        let mut key = self.name.clone();
        for entity_type in self.entity_sequence() {
            key.push(SEQUENCE_SEPARATOR);
            key.push_str(entity_type);
        }
        key
    }
}
