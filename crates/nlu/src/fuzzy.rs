//! Order-insensitive intent alignment.
//!
//! The Fuzzy engine asks, per intent: do the entities resolved in this
//! sentence fit the intent's declared entity multiset? Order does not
//! matter and missing entities do not disqualify; only surplus entities
//! (`exceed`) or undeclared types (`extra`) do. Qualifying intents are
//! ranked by classifier confidence, with more bound entities breaking
//! equal-score ties.

use std::collections::HashSet;
use std::sync::Arc;

use parlance_core::{
    EngineError, EntityRecognizer, LearnReport, MatchResult, SlotSpec, TestMode,
};

use crate::classifier::LabelScores;
use crate::engine::{bind_fuzzy, EngineCore, EngineOptions, IntentEngine, LearnOptions};

/// Order-insensitive alignment engine.
///
/// Intents are keyed by root name; one template per intent, grown
/// incrementally by learning.
pub struct FuzzyEngine {
    core: EngineCore,
}

impl FuzzyEngine {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            core: EngineCore::new(false, options),
        }
    }

    /// Classifier scores for `text` after templating against all registered
    /// entity types. Exposed for open-ended label exploration.
    pub fn scores(&self, text: &str) -> LabelScores {
        let resolved = self.core.resolve(text, None);
        self.core.classifier.score(&resolved.templated_text)
    }

    fn test_standard(&self, text: &str) -> Option<MatchResult> {
        let mut best: Option<MatchResult> = None;
        for (_, template) in self.core.registry.iter() {
            let types: HashSet<&str> = template.declared_types().collect();
            let resolved = self.core.resolve(text, Some(&types));
            let binding = bind_fuzzy(template, &resolved.entities);
            if binding.exceed_entities || binding.extra_entities {
                continue;
            }

            let scores = self.core.classifier.score(&resolved.templated_text);
            let score = scores.get(&template.name).unwrap_or(0.0);
            let found = binding.entities.len();
            let replace = match &best {
                None => true,
                Some(b) => score > b.score || (score == b.score && found > b.found),
            };
            if replace {
                best = Some(MatchResult {
                    intent: template.name.clone(),
                    score,
                    found,
                    missing_entities: found < template.slots.len(),
                    exceed_entities: false,
                    extra_entities: false,
                    entities: binding.entities,
                    slots: binding.slots,
                    templated_text: resolved.templated_text,
                });
            }
        }
        best.filter(|b| b.score > self.core.threshold)
    }
}

impl Default for FuzzyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentEngine for FuzzyEngine {
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

#[cfg(test)]
mod tests {
    use super::*;
    use parlance_core::EntityMatch;
    use serde_json::json;

    /// Toy recognizer matching one fixed word wherever it appears.
    struct Word {
        name: String,
        word: String,
    }

    impl Word {
        fn new(name: &str, word: &str) -> Arc<dyn EntityRecognizer> {
            Arc::new(Self {
                name: name.into(),
                word: word.into(),
            })
        }
    }

    impl EntityRecognizer for Word {
        fn name(&self) -> &str {
            &self.name
        }

        fn find_matches(&self, text: &str, out: &mut Vec<EntityMatch>) {
            let lower = text.to_lowercase();
            let mut from = 0;
            while let Some(at) = lower[from..].find(&self.word) {
                let position = from + at;
                let raw = &text[position..position + self.word.len()];
                out.push(EntityMatch::new(&self.name, json!(self.word), raw, position));
                from = position + self.word.len();
            }
        }
    }

    fn engine() -> FuzzyEngine {
        let mut engine = FuzzyEngine::new();
        engine.register_entity(Word::new("username", "mark"));
        engine.register_entity(Word::new("number", "forty"));
        engine
    }

    #[test]
    fn test_learning_round_trip() {
        let mut engine = engine();
        engine
            .declare_intent("greet", &[SlotSpec::named("username", "whoToGreet")])
            .unwrap();
        engine
            .learn_document("Hello {username}!", "greet", &LearnOptions::tagged())
            .unwrap();

        let result = engine.test("hello mark").expect("should match");
        assert_eq!(result.intent, "greet");
        assert_eq!(result.slot_value("whoToGreet"), Some(&json!("mark")));
        assert_eq!(result.templated_text, "hello {username}");
    }

    #[test]
    fn test_no_match_shape() {
        let mut engine = engine();
        engine
            .learn_document("Hello {username}!", "greet", &LearnOptions::tagged())
            .unwrap();
        assert!(engine.test("Call the police!").is_none());
    }

    #[test]
    fn test_exceeding_entities_disqualify() {
        let mut engine = engine();
        engine
            .learn_document("Hello {username}!", "greet", &LearnOptions::tagged())
            .unwrap();
        // Two usernames resolved, one slot declared.
        assert!(engine.test("hello mark mark").is_none());
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let mut engine = engine();
        let err = engine
            .learn_document("Hello {nosuch}!", "greet", &LearnOptions::tagged())
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownEntity {
                entity_type: "nosuch".into()
            }
        );
        // Failed learn leaves no trace.
        assert!(engine.test_with_mode("hello", TestMode::AnyEntity).is_none());
    }

    #[test]
    fn test_threshold_gates_result() {
        let mut engine = engine();
        engine
            .learn_document("{username}", "greet", &LearnOptions::tagged())
            .unwrap();

        // A single shared stem scores around 0.75: under-confident at a
        // strict threshold...
        engine.set_confidence_threshold(0.8);
        assert!(engine.test("mark").is_none());
        // ...but qualifying once the threshold is lowered, with the same
        // entity bindings.
        engine.set_confidence_threshold(0.5);
        let result = engine.test("mark").expect("should match at 0.5");
        assert_eq!(result.intent, "greet");
        assert_eq!(result.slot_value("username"), Some(&json!("mark")));
    }

    #[test]
    fn test_any_entity_mode() {
        let mut engine = engine();
        engine
            .learn_document("Hello {username}!", "greet", &LearnOptions::tagged())
            .unwrap();

        // "forty" is not declared by greet, but anyEntity reporting ignores
        // the declared entity set.
        let result = engine
            .test_with_mode("hello mark forty", TestMode::AnyEntity)
            .expect("should report best label");
        assert_eq!(result.intent, "greet");
        assert_eq!(result.found, 2);
        assert!(result.slots.contains_key("username"));
        assert!(result.slots.contains_key("number"));
    }
}
