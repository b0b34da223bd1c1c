//! Assemble a ready engine from an agent definition.

use std::sync::Arc;

use parlance_core::EntityRecognizer;
use parlance_nlu::{EngineOptions, FuzzyEngine, IntentEngine, LearnOptions, SequentialEngine};
use parlance_recognizers::{
    EmailRecognizer, FreeTextRecognizer, NumberRecognizer, RegexRecognizer, StringSetRecognizer,
};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::definition::{AgentDefinition, Algorithm, EntityDefinition, EntityKind};
use crate::ConfigError;

/// Build the engine a definition describes: register its recognizers,
/// declare its intents, learn its documents.
pub fn build(definition: &AgentDefinition) -> Result<Box<dyn IntentEngine>, ConfigError> {
    let options = EngineOptions {
        confidence_threshold: definition.confidence_threshold,
        ..EngineOptions::default()
    };
    let mut engine: Box<dyn IntentEngine> = match definition.algorithm {
        Algorithm::Fuzzy => Box::new(FuzzyEngine::with_options(options)),
        Algorithm::Sequential => Box::new(SequentialEngine::with_options(options)),
    };

    for entity in &definition.entities {
        engine.register_entity(build_recognizer(entity)?);
    }
    for intent in &definition.intents {
        engine.declare_intent(&intent.name, &intent.slots)?;
    }
    for document in &definition.documents {
        let options = LearnOptions {
            from_tagged_sentence: document.tagged == Some(true),
            from_raw_sentence: document.tagged == Some(false),
            learn_new_intent: true,
            slot_name_hints: document.slot_names.clone(),
        };
        engine.learn_document(&document.text, &document.intent, &options)?;
    }

    debug!(
        entities = definition.entities.len(),
        intents = definition.intents.len(),
        documents = definition.documents.len(),
        "assembled engine from definition"
    );
    Ok(engine)
}

fn build_recognizer(entity: &EntityDefinition) -> Result<Arc<dyn EntityRecognizer>, ConfigError> {
    let recognizer: Arc<dyn EntityRecognizer> = match &entity.kind {
        EntityKind::StringSet { priority, matches } => {
            let mut recognizer = StringSetRecognizer::new(&entity.name).with_priority(*priority);
            for (id, texts) in matches {
                for text in texts {
                    recognizer.add_match(id, text);
                }
            }
            Arc::new(recognizer)
        }
        EntityKind::Pattern { priority, patterns } => {
            let mut patterns = patterns.iter();
            let first = patterns.next().ok_or_else(|| ConfigError::InvalidValue {
                field: format!("entities.{}.patterns", entity.name),
                message: "at least one pattern is required".into(),
            })?;
            let mut recognizer =
                RegexRecognizer::new(&entity.name, compile(&entity.name, first)?, capture_value)
                    .with_priority(*priority);
            for pattern in patterns {
                recognizer = recognizer.with_pattern(compile(&entity.name, pattern)?, capture_value);
            }
            Arc::new(recognizer)
        }
        EntityKind::Number { priority } => {
            Arc::new(NumberRecognizer::new(&entity.name).with_priority(*priority))
        }
        EntityKind::Email { priority } => {
            Arc::new(EmailRecognizer::new(&entity.name).with_priority(*priority))
        }
        EntityKind::FreeText {
            prefixes,
            conjunctions,
        } => {
            let prefixes: Vec<&str> = prefixes.iter().map(String::as_str).collect();
            let conjunctions: Vec<&str> = conjunctions.iter().map(String::as_str).collect();
            Arc::new(
                FreeTextRecognizer::new(&entity.name)
                    .with_prefixes(&prefixes)
                    .with_conjunctions(&conjunctions),
            )
        }
    };
    Ok(recognizer)
}

fn compile(entity: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidValue {
        field: format!("entities.{entity}.patterns"),
        message: format!("{pattern:?}: {e}"),
    })
}

/// Default capture mapping for config-driven patterns: the first capture
/// group when present, the whole match otherwise.
fn capture_value(captures: &regex::Captures) -> Option<Value> {
    let text = captures
        .get(1)
        .or_else(|| captures.get(0))
        .map(|m| m.as_str().to_string())?;
    Some(Value::String(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_fuzzy_agent() {
        let definition = AgentDefinition::from_yaml_str(
            r#"
entities:
  - name: username
    type: string_set
    matches:
      mark: ["mark"]
documents:
  - text: "Hello {username}!"
    intent: greet
"#,
        )
        .unwrap();

        let engine = build(&definition).unwrap();
        assert!(engine.has_entity("username"));
        let result = engine.test("hello mark").expect("should match");
        assert_eq!(result.intent, "greet");
        assert_eq!(result.slot_value("username"), Some(&json!("mark")));
    }

    #[test]
    fn test_build_sequential_agent_with_free_text() {
        let definition = AgentDefinition::from_yaml_str(
            r#"
algorithm: sequential
entities:
  - name: contact
    type: string_set
    matches:
      bob: ["bob"]
  - name: message
    type: free_text
    prefixes: ["send"]
    conjunctions: ["to"]
documents:
  - text: "send {message} to {contact}"
    intent: send_message
"#,
        )
        .unwrap();

        let engine = build(&definition).unwrap();
        let result = engine.test("send the report to bob").expect("should match");
        assert_eq!(result.intent, "send_message");
        assert_eq!(result.slot_value("message"), Some(&json!("the report")));
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let definition = AgentDefinition::from_yaml_str(
            r#"
entities:
  - name: broken
    type: pattern
    patterns: ["("]
"#,
        )
        .unwrap();
        let err = build(&definition).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_unknown_entity_in_document_fails_build() {
        let definition = AgentDefinition::from_yaml_str(
            r#"
documents:
  - text: "Hello {username}!"
    intent: greet
"#,
        )
        .unwrap();
        let err = build(&definition).err().unwrap();
        assert!(matches!(err, ConfigError::Engine(_)));
    }
}
