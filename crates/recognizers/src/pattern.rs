//! Regex entity recognizer with pluggable capture mapping.
//!
//! A pattern alone only locates spans; turning captures into an entity
//! value is the caller's business. The mapper is a pure function from the
//! captures to `Option<Value>` and may decline a syntactic match by
//! returning `None`, in which case no entity is produced for that span.

use std::sync::Arc;

use parlance_core::{EntityMatch, EntityRecognizer};
use regex::{Captures, Regex};
use serde_json::Value;

/// Pure mapping from regex captures to an entity value, or a refusal.
pub type CaptureMapper = dyn Fn(&Captures) -> Option<Value> + Send + Sync;

/// Recognizer driven by one or more regex patterns.
pub struct RegexRecognizer {
    name: String,
    priority: i32,
    patterns: Vec<(Regex, Arc<CaptureMapper>)>,
}

impl RegexRecognizer {
    /// Recognizer with a single pattern and mapper.
    pub fn new<F>(name: impl Into<String>, regex: Regex, mapper: F) -> Self
    where
        F: Fn(&Captures) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            priority: 0,
            patterns: vec![(regex, Arc::new(mapper))],
        }
    }

    /// Add another pattern; patterns are tried independently and all their
    /// accepted matches become candidates.
    pub fn with_pattern<F>(mut self, regex: Regex, mapper: F) -> Self
    where
        F: Fn(&Captures) -> Option<Value> + Send + Sync + 'static,
    {
        self.patterns.push((regex, Arc::new(mapper)));
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl EntityRecognizer for RegexRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_matches(&self, text: &str, out: &mut Vec<EntityMatch>) {
        for (regex, mapper) in &self.patterns {
            for captures in regex.captures_iter(text) {
                let Some(value) = mapper(&captures) else {
                    continue;
                };
                let whole = captures.get(0).expect("capture 0 always present");
                out.push(
                    EntityMatch::new(&self.name, value, whole.as_str(), whole.start())
                        .with_priority(self.priority),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapper_produces_value() {
        let recognizer = RegexRecognizer::new(
            "percentage",
            Regex::new(r"(\d+(?:\.\d+)?)\s*%").unwrap(),
            |caps: &Captures| caps[1].parse::<f64>().ok().map(Value::from),
        );
        let mut out = Vec::new();
        recognizer.find_matches("rates from 10.5% to 24%", &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].value, json!(10.5));
        assert_eq!(out[1].value, json!(24.0));
    }

    #[test]
    fn test_mapper_may_decline() {
        // Only even numbers become entities.
        let recognizer = RegexRecognizer::new(
            "even",
            Regex::new(r"\d+").unwrap(),
            |caps: &Captures| {
                let n: i64 = caps[0].parse().ok()?;
                (n % 2 == 0).then(|| Value::from(n))
            },
        );
        let mut out = Vec::new();
        recognizer.find_matches("1 2 3 4", &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].value, json!(2));
        assert_eq!(out[1].value, json!(4));
    }
}
