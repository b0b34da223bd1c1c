//! Strict-order intent alignment.
//!
//! The Sequential engine keys every template by its exact ordered entity
//! type sequence, so one root intent may own several sequences. A sequence
//! matches only if the resolved entities consume its slots exactly, in
//! declared order, with nothing left over. Slots backed by an expandable
//! (free-text) recognizer claim the text between their neighbors and are
//! trimmed through the recognizer's `expand` hook.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parlance_core::{
    EngineError, EntityMatch, EntityRecognizer, IntentTemplate, LearnReport, MatchResult,
    SlotSpec, TestMode,
};
use serde_json::Value;

use crate::engine::{EngineCore, EngineOptions, IntentEngine, LearnOptions};
use crate::resolver;

/// Strict-order alignment engine.
pub struct SequentialEngine {
    core: EngineCore,
}

/// A successful strict-order consumption of one template.
struct SequenceBinding {
    entities: Vec<EntityMatch>,
    slots: HashMap<String, EntityMatch>,
}

impl SequentialEngine {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            core: EngineCore::new(true, options),
        }
    }

    fn test_standard(&self, text: &str) -> Option<MatchResult> {
        let mut best: Option<MatchResult> = None;
        for (_, template) in self.core.registry.iter() {
            let Some(binding) = self.align(text, template) else {
                continue;
            };

            let templated_text = resolver::build_template(text, &binding.entities);
            let scores = self.core.classifier.score(&templated_text);
            let score = scores.get(&template.name).unwrap_or(0.0);

            // Unlike the Fuzzy engine, an equal score never replaces the
            // current best, whatever the entity counts.
            if best.as_ref().map_or(true, |b| score > b.score) {
                let found = binding.entities.len();
                best = Some(MatchResult {
                    intent: template.name.clone(),
                    score,
                    found,
                    missing_entities: false,
                    exceed_entities: false,
                    extra_entities: false,
                    entities: binding.entities,
                    slots: binding.slots,
                    templated_text,
                });
            }
        }
        best.filter(|b| b.score > self.core.threshold)
    }

    /// Consume `template`'s slots strictly in order against `text`.
    ///
    /// Solid slots must be matched by the next resolved entity of exactly
    /// their type; expandable slots greedily claim the text up to the next
    /// solid entity (or the end of the text) and are trimmed via `expand`.
    /// Returns `None` on any count, order or type mismatch.
    fn align(&self, text: &str, template: &IntentTemplate) -> Option<SequenceBinding> {
        let solid_types: HashSet<&str> = template
            .declared_types()
            .filter(|t| !self.core.is_expandable(t))
            .collect();
        let resolved = self.core.resolve(text, Some(&solid_types));
        let solids = resolved.entities;

        let mut binding = SequenceBinding {
            entities: Vec::new(),
            slots: HashMap::new(),
        };
        let mut next_solid = 0usize;
        let mut cursor = 0usize;

        for slot in &template.slots {
            if self.core.is_expandable(&slot.entity_type) {
                let gap_end = solids.get(next_solid).map_or(text.len(), |e| e.position);
                if cursor >= gap_end {
                    return None;
                }
                let span = &text[cursor..gap_end];
                let mut entity = EntityMatch::new(
                    slot.entity_type.clone(),
                    Value::String(span.to_string()),
                    span,
                    cursor,
                );
                if let Some(recognizer) = self.core.recognizer(&slot.entity_type) {
                    recognizer.expand(&mut entity);
                }
                if entity.raw_text.is_empty() {
                    return None;
                }
                cursor = gap_end;
                binding.slots.insert(slot.slot_id.clone(), entity.clone());
                binding.entities.push(entity);
            } else {
                let entity = solids.get(next_solid)?;
                if entity.entity_type != slot.entity_type {
                    return None;
                }
                next_solid += 1;
                cursor = entity.end();
                binding.slots.insert(slot.slot_id.clone(), entity.clone());
                binding.entities.push(entity.clone());
            }
        }

        if next_solid < solids.len() {
            return None;
        }
        Some(binding)
    }
}

impl Default for SequentialEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentEngine for SequentialEngine {
    fn register_entity(&mut self, recognizer: Arc<dyn EntityRecognizer>) {
        self.core.register_entity(recognizer);
    }

    fn has_entity(&self, name: &str) -> bool {
        self.core.has_entity(name)
    }

    fn declare_intent(&mut self, name: &str, slots: &[SlotSpec]) -> Result<(), EngineError> {
        self.core.declare_intent(name, slots)
    }

    fn set_confidence_threshold(&mut self, ratio: f64) {
        self.core.threshold = ratio;
    }

    fn confidence_threshold(&self) -> f64 {
        self.core.threshold
    }

    fn learn_document(
        &mut self,
        text: &str,
        intent: &str,
        options: &LearnOptions,
    ) -> Result<LearnReport, EngineError> {
        self.core.learn_document(text, intent, options)
    }

    fn test_with_mode(&self, text: &str, mode: TestMode) -> Option<MatchResult> {
        match mode {
            TestMode::Standard => self.test_standard(text),
            TestMode::AnyEntity => self.core.test_any_entity(text),
        }
    }
}
