//! Numeric entity recognizer.
//!
//! Matches digit sequences (with optional sign and decimal part) and a
//! table of English number words. Locale-specific numeric grammars are out
//! of scope; callers needing them should supply their own recognizer.

use once_cell::sync::Lazy;
use parlance_core::{EntityMatch, EntityRecognizer};
use regex::Regex;
use serde_json::Value;

static DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").unwrap());

static NUMBER_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(zero|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety|hundred|thousand)\b",
    )
    .unwrap()
});

const WORD_VALUES: &[(&str, i64)] = &[
    ("zero", 0), ("one", 1), ("two", 2), ("three", 3), ("four", 4),
    ("five", 5), ("six", 6), ("seven", 7), ("eight", 8), ("nine", 9),
    ("ten", 10), ("eleven", 11), ("twelve", 12), ("thirteen", 13),
    ("fourteen", 14), ("fifteen", 15), ("sixteen", 16), ("seventeen", 17),
    ("eighteen", 18), ("nineteen", 19), ("twenty", 20), ("thirty", 30),
    ("forty", 40), ("fifty", 50), ("sixty", 60), ("seventy", 70),
    ("eighty", 80), ("ninety", 90), ("hundred", 100), ("thousand", 1000),
];

/// Recognizer for digit and word numbers.
pub struct NumberRecognizer {
    name: String,
    priority: i32,
}

impl NumberRecognizer {
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

    fn digit_value(raw: &str) -> Value {
        if let Ok(integer) = raw.parse::<i64>() {
            return Value::from(integer);
        }
        raw.parse::<f64>().map(Value::from).unwrap_or(Value::Null)
    }
}

impl EntityRecognizer for NumberRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_matches(&self, text: &str, out: &mut Vec<EntityMatch>) {
        for found in DIGITS.find_iter(text) {
            out.push(
                EntityMatch::new(
                    &self.name,
                    Self::digit_value(found.as_str()),
                    found.as_str(),
                    found.start(),
                )
                .with_priority(self.priority),
            );
        }
        for found in NUMBER_WORDS.find_iter(text) {
            let word = found.as_str().to_lowercase();
            let value = WORD_VALUES
                .iter()
                .find(|(w, _)| *w == word)
                .map(|(_, v)| Value::from(*v))
                .unwrap_or(Value::Null);
            out.push(
                EntityMatch::new(&self.name, value, found.as_str(), found.start())
                    .with_priority(self.priority),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_digits() {
        let recognizer = NumberRecognizer::new("number");
        let mut out = Vec::new();
        recognizer.find_matches("pay 120 by the 3rd, or 4.5 later", &mut out);
        let values: Vec<&Value> = out.iter().map(|m| &m.value).collect();
        assert_eq!(values, [&json!(120), &json!(3), &json!(4.5)]);
    }

    #[test]
    fn test_number_words() {
        let recognizer = NumberRecognizer::new("number");
        let mut out = Vec::new();
        recognizer.find_matches("buy Twelve apples and forty pears", &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].value, json!(12));
        assert_eq!(out[1].value, json!(40));
        assert_eq!(out[1].raw_text, "forty");
    }
}
