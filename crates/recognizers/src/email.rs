//! Email address recognizer.

use once_cell::sync::Lazy;
use parlance_core::{EntityMatch, EntityRecognizer};
use regex::Regex;
use serde_json::Value;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

/// Recognizer for email addresses; the extracted value is the address
/// lowercased.
pub struct EmailRecognizer {
    name: String,
    priority: i32,
}

impl EmailRecognizer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl EntityRecognizer for EmailRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_matches(&self, text: &str, out: &mut Vec<EntityMatch>) {
        for found in EMAIL.find_iter(text) {
            out.push(
                EntityMatch::new(
                    &self.name,
                    Value::String(found.as_str().to_lowercase()),
                    found.as_str(),
                    found.start(),
                )
                .with_priority(self.priority),
            );
        }
    }
}
