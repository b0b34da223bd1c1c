//! Shared engine chassis and the public engine API.
//!
//! Both alignment engines own the same machinery: a set of registered
//! recognizers, an intent registry, a label classifier and a confidence
//! threshold. They differ only in how templates are keyed and how resolved
//! entities are aligned against slots, so everything else lives here.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parlance_core::{
    EngineError, EntityMatch, EntityRecognizer, IntentTemplate, LearnEvent, LearnReport,
    MatchResult, SlotSpec, Stemmer, TestMode, TokenFilter, SEQUENCE_SEPARATOR,
};
use tracing::debug;

use crate::classifier::{LabelClassifier, NONE_LABEL};
use crate::registry::{self, IntentRegistry};
use crate::resolver::{self, ResolvedText};

/// Default confidence threshold a match must clear.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.75;

/// Options for a `learn_document` call.
#[derive(Debug, Clone, Default)]
pub struct LearnOptions {
    /// Treat the text as a raw sentence and discover entities with the
    /// registered recognizers.
    pub from_raw_sentence: bool,
    /// Treat the text as a tagged sentence with `{entityType}` placeholders.
    /// Takes precedence over `from_raw_sentence` when both are set. When
    /// neither is set, the presence of placeholder syntax decides.
    pub from_tagged_sentence: bool,
    /// Allow the document to create its intent when it does not exist yet.
    pub learn_new_intent: bool,
    /// Slot ids to assign to newly appended slots, matched to placeholders
    /// (or discovered entities) by position in the sentence.
    pub slot_name_hints: Vec<String>,
}

impl LearnOptions {
    /// Raw-sentence learning that may create the intent.
    pub fn raw() -> Self {
        Self {
            from_raw_sentence: true,
            learn_new_intent: true,
            ..Self::default()
        }
    }

    /// Tagged-sentence learning that may create the intent.
    pub fn tagged() -> Self {
        Self {
            from_tagged_sentence: true,
            learn_new_intent: true,
            ..Self::default()
        }
    }

    /// Set slot id hints by placeholder position.
    pub fn with_slot_names(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.slot_name_hints = names.into_iter().collect();
        self
    }
}

/// Construction options shared by both engines.
#[derive(Default)]
pub struct EngineOptions {
    /// Stemmer applied to classifier tokens.
    pub stemmer: Option<Arc<dyn Stemmer>>,
    /// Token filter applied to classifier tokens.
    pub token_filter: Option<Arc<dyn TokenFilter>>,
    /// Initial confidence threshold; defaults to 0.75.
    pub confidence_threshold: Option<f64>,
}

/// The engine API shared by the Fuzzy and Sequential variants.
pub trait IntentEngine {
    /// Register an entity recognizer. A recognizer registered under an
    /// already-known name replaces the previous one.
    fn register_entity(&mut self, recognizer: Arc<dyn EntityRecognizer>);

    /// Whether a recognizer is registered for `name`.
    fn has_entity(&self, name: &str) -> bool;

    /// Declare an intent from explicit slot specs.
    fn declare_intent(&mut self, name: &str, slots: &[SlotSpec]) -> Result<(), EngineError>;

    /// Set the confidence threshold a match must clear.
    fn set_confidence_threshold(&mut self, ratio: f64);

    /// Current confidence threshold.
    fn confidence_threshold(&self) -> f64;

    /// Learn or link a training document to an intent (by root name).
    fn learn_document(
        &mut self,
        text: &str,
        intent: &str,
        options: &LearnOptions,
    ) -> Result<LearnReport, EngineError>;

    /// Find the best-fitting intent for `text` under `mode`.
    fn test_with_mode(&self, text: &str, mode: TestMode) -> Option<MatchResult>;

    /// Find the best-fitting intent for `text`.
    fn test(&self, text: &str) -> Option<MatchResult> {
        self.test_with_mode(text, TestMode::Standard)
    }
}

/// State and behavior common to both engine variants.
///
/// `sequenced` selects the registry key scheme: root name for the Fuzzy
/// engine, the exact entity-type sequence key for the Sequential one.
pub(crate) struct EngineCore {
    recognizers: Vec<Arc<dyn EntityRecognizer>>,
    recognizer_index: HashMap<String, usize>,
    pub(crate) registry: IntentRegistry,
    pub(crate) classifier: LabelClassifier,
    pub(crate) threshold: f64,
    sequenced: bool,
}

impl EngineCore {
    pub(crate) fn new(sequenced: bool, options: EngineOptions) -> Self {
        Self {
            recognizers: Vec::new(),
            recognizer_index: HashMap::new(),
            registry: IntentRegistry::new(),
            classifier: LabelClassifier::with_processing(options.stemmer, options.token_filter),
            threshold: options
                .confidence_threshold
                .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
            sequenced,
        }
    }

    pub(crate) fn register_entity(&mut self, recognizer: Arc<dyn EntityRecognizer>) {
        let name = recognizer.name().to_string();
        match self.recognizer_index.get(&name) {
            Some(&i) => {
                debug!(entity = %name, "replacing registered recognizer");
                self.recognizers[i] = recognizer;
            }
            None => {
                self.recognizer_index.insert(name, self.recognizers.len());
                self.recognizers.push(recognizer);
            }
        }
    }

    pub(crate) fn has_entity(&self, name: &str) -> bool {
        self.recognizer_index.contains_key(name)
    }

    pub(crate) fn recognizer(&self, name: &str) -> Option<&Arc<dyn EntityRecognizer>> {
        self.recognizer_index.get(name).map(|&i| &self.recognizers[i])
    }

    /// Whether slots of `entity_type` are free-text captures.
    pub(crate) fn is_expandable(&self, entity_type: &str) -> bool {
        self.recognizer(entity_type)
            .is_some_and(|r| r.supports_expansion())
    }

    /// Collect and resolve candidates from recognizers selected by `types`
    /// (`None` selects every registered recognizer). Collection follows
    /// registration order so resolution is deterministic.
    pub(crate) fn resolve(&self, text: &str, types: Option<&HashSet<&str>>) -> ResolvedText {
        let mut candidates = Vec::new();
        for recognizer in &self.recognizers {
            if types.map_or(true, |t| t.contains(recognizer.name())) {
                recognizer.find_matches(text, &mut candidates);
            }
        }
        resolver::resolve(text, candidates)
    }

    pub(crate) fn declare_intent(
        &mut self,
        name: &str,
        slots: &[SlotSpec],
    ) -> Result<(), EngineError> {
        validate_name(name)?;
        let mut template = IntentTemplate::new(name);
        for spec in slots {
            template.push_slot(&spec.entity, spec.id.as_deref());
        }
        let key = if self.sequenced {
            template.sequence_key()
        } else {
            name.to_string()
        };
        self.registry.insert(&key, template)?;
        debug!(intent = name, key = %key, slots = slots.len(), "declared intent");
        Ok(())
    }

    /// Shared learning flow for both engines.
    ///
    /// Validation happens before any mutation so a failed learn leaves the
    /// registry and classifier untouched.
    pub(crate) fn learn_document(
        &mut self,
        text: &str,
        root: &str,
        options: &LearnOptions,
    ) -> Result<LearnReport, EngineError> {
        validate_name(root)?;

        let tagged = options.from_tagged_sentence
            || (!options.from_raw_sentence && registry::is_tagged(text));

        let (types, templated_text) = if tagged {
            let types = registry::placeholder_types(text);
            for entity_type in &types {
                if !self.has_entity(entity_type) {
                    return Err(EngineError::UnknownEntity {
                        entity_type: entity_type.clone(),
                    });
                }
            }
            (types, text.to_string())
        } else {
            let resolved = self.resolve(text, None);
            let types = resolved
                .entities
                .iter()
                .map(|e| e.entity_type.clone())
                .collect();
            (types, resolved.templated_text)
        };

        let key = if self.sequenced {
            let mut key = root.to_string();
            for entity_type in &types {
                key.push(SEQUENCE_SEPARATOR);
                key.push_str(entity_type);
            }
            key
        } else {
            root.to_string()
        };

        let mut events = Vec::new();
        if self.registry.contains(&key) {
            // Append slots for placeholder occurrences the template does not
            // cover yet. For a sequenced key the occurrences always line up
            // already, so this is a no-op there.
            let hints = &options.slot_name_hints;
            let template = self.registry.get_mut(&key).expect("key checked above");
            let mut seen: HashMap<&str, usize> = HashMap::new();
            for (position, entity_type) in types.iter().enumerate() {
                let occurrence = seen.entry(entity_type.as_str()).or_insert(0);
                if *occurrence >= template.occurrences(entity_type) {
                    let hint = hints.get(position).map(String::as_str);
                    let slot_id = template.push_slot(entity_type, hint);
                    events.push(LearnEvent::SlotAdded {
                        intent_key: key.clone(),
                        entity_type: entity_type.clone(),
                        slot_id,
                    });
                }
                *occurrence += 1;
            }
        } else {
            // A sequenced engine accepts a new sequence for an already-known
            // root without the learn flag; a brand-new root needs it.
            let extends_known_root = self.sequenced && self.registry.has_root(root);
            if !options.learn_new_intent && !extends_known_root {
                return Err(EngineError::UnknownIntent {
                    name: root.to_string(),
                });
            }
            let mut template = IntentTemplate::new(root);
            events.push(LearnEvent::IntentCreated {
                intent_key: key.clone(),
                root_intent: root.to_string(),
            });
            for (position, entity_type) in types.iter().enumerate() {
                let hint = options.slot_name_hints.get(position).map(String::as_str);
                let slot_id = template.push_slot(entity_type, hint);
                events.push(LearnEvent::SlotAdded {
                    intent_key: key.clone(),
                    entity_type: entity_type.clone(),
                    slot_id,
                });
            }
            self.registry
                .insert(&key, template)
                .expect("key absence checked above");
        }

        self.classifier.train(&templated_text, root);
        events.push(LearnEvent::DocumentTrained {
            label: root.to_string(),
        });
        debug!(intent = root, key = %key, tagged, "learned document");

        Ok(LearnReport {
            intent_key: key,
            root_intent: root.to_string(),
            templated_text,
            events,
        })
    }

    /// Open-ended test: resolve against every registered entity type, bind
    /// slots positionally and report the best-scoring label, whatever its
    /// declared entity set. The baseline label is never reported.
    pub(crate) fn test_any_entity(&self, text: &str) -> Option<MatchResult> {
        let resolved = self.resolve(text, None);
        let scores = self.classifier.score(&resolved.templated_text);

        let mut winner: Option<(String, f64)> = None;
        for (label, score) in scores.iter() {
            if label == NONE_LABEL {
                continue;
            }
            if winner.as_ref().map_or(score > 0.0, |(_, s)| score > *s) {
                winner = Some((label.to_string(), score));
            }
        }
        let (intent, score) = winner?;

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        let mut slots = HashMap::new();
        for entity in &resolved.entities {
            let occurrence = occurrences.entry(entity.entity_type.as_str()).or_insert(0);
            let slot_id = if *occurrence == 0 {
                entity.entity_type.clone()
            } else {
                format!("{}{}", entity.entity_type, occurrence)
            };
            *occurrence += 1;
            slots.insert(slot_id, entity.clone());
        }

        let found = resolved.entities.len();
        Some(MatchResult {
            intent,
            score,
            entities: resolved.entities,
            slots,
            templated_text: resolved.templated_text,
            found,
            missing_entities: false,
            exceed_entities: false,
            extra_entities: false,
        })
    }
}

fn validate_name(name: &str) -> Result<(), EngineError> {
    if name.contains(SEQUENCE_SEPARATOR) {
        return Err(EngineError::InvalidIntentName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Bind resolved entities to a template's per-type slot-id queues in order
/// of appearance.
pub(crate) struct FuzzyBinding {
    pub(crate) entities: Vec<EntityMatch>,
    pub(crate) slots: HashMap<String, EntityMatch>,
    pub(crate) exceed_entities: bool,
    pub(crate) extra_entities: bool,
}

pub(crate) fn bind_fuzzy(template: &IntentTemplate, resolved: &[EntityMatch]) -> FuzzyBinding {
    let mut cursors: HashMap<&str, usize> = HashMap::new();
    let mut binding = FuzzyBinding {
        entities: Vec::new(),
        slots: HashMap::new(),
        exceed_entities: false,
        extra_entities: false,
    };
    for entity in resolved {
        let ids = template.slot_ids_for(&entity.entity_type);
        if ids.is_empty() {
            binding.extra_entities = true;
            continue;
        }
        let cursor = cursors.entry(entity.entity_type.as_str()).or_insert(0);
        match ids.get(*cursor) {
            Some(slot_id) => {
                *cursor += 1;
                binding.entities.push(entity.clone());
                binding.slots.insert(slot_id.clone(), entity.clone());
            }
            None => binding.exceed_entities = true,
        }
    }
    binding
}
