//! Incremental, label-conditioned word-frequency classifier.
//!
//! Training registers the unique stems of each templated sentence under an
//! intent label. Scoring computes, per label, a log-odds sum of smoothed
//! per-stem weights ("wordicity") and squashes it through a logistic, so
//! every label gets an independent confidence in `[0, 1]`; two labels can
//! both score above 0.9 for the same input. Callers apply their own
//! threshold and comparison logic.

use std::collections::HashMap;
use std::sync::Arc;

use parlance_core::{Stemmer, TokenFilter};
use tracing::debug;

use crate::text;

/// Baseline label trained with one empty document at construction so that
/// score denominators stay positive before any real training happens.
pub const NONE_LABEL: &str = "none";

/// Smoothed per-label wordicity bounds; keeps log-odds finite.
const MIN_WORDICITY: f64 = 0.01;
const MAX_WORDICITY: f64 = 0.99;

/// Per-label confidence scores in label first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScores(Vec<(String, f64)>);

/// The best-scoring label of one scoreboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Winner {
    pub label: String,
    pub score: f64,
}

impl LabelScores {
    /// Score for `label`, if the label has been seen.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, s)| *s)
    }

    /// Labels and scores in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(l, s)| (l.as_str(), *s))
    }

    /// The strictly-greatest score; ties keep the first-seen label. An empty
    /// or all-zero scoreboard has no winner.
    pub fn winner(&self) -> Option<Winner> {
        let mut best: Option<Winner> = None;
        for (label, score) in self.iter() {
            if best.as_ref().map_or(score > 0.0, |b| score > b.score) {
                best = Some(Winner {
                    label: label.to_string(),
                    score,
                });
            }
        }
        best
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Incremental word-frequency model over intent labels.
///
/// Counts strictly accumulate: there is no forgetting and no retraining.
/// One classifier is owned by exactly one alignment engine.
pub struct LabelClassifier {
    /// Labels in first-seen order; scoring and winner selection iterate this.
    labels: Vec<String>,
    /// Documents trained per label.
    label_doc_count: HashMap<String, u32>,
    /// Per label, per stem: number of that label's documents containing it.
    stem_label_count: HashMap<String, HashMap<String, u32>>,
    /// Per stem: total document occurrences across all labels.
    stem_count: HashMap<String, u32>,
    /// Total trained documents across all labels.
    total_docs: u32,
    stemmer: Option<Arc<dyn Stemmer>>,
    token_filter: Option<Arc<dyn TokenFilter>>,
}

impl LabelClassifier {
    /// Classifier with no stemmer and no token filter.
    pub fn new() -> Self {
        Self::with_processing(None, None)
    }

    /// Classifier with an optional stemmer and token filter applied during
    /// tokenization (both training and scoring).
    pub fn with_processing(
        stemmer: Option<Arc<dyn Stemmer>>,
        token_filter: Option<Arc<dyn TokenFilter>>,
    ) -> Self {
        let mut classifier = Self {
            labels: Vec::new(),
            label_doc_count: HashMap::new(),
            stem_label_count: HashMap::new(),
            stem_count: HashMap::new(),
            total_docs: 0,
            stemmer,
            token_filter,
        };
        // Baseline document: one empty doc under "none" so inverse-document
        // denominators are positive once any real label is trained.
        classifier.train("", NONE_LABEL);
        classifier
    }

    /// Unique stems of `text` after cleaning, stemming and filtering.
    pub fn unique_stems(&self, text: &str) -> Vec<String> {
        let mut tokens = text::tokenize(text);
        if let Some(stemmer) = &self.stemmer {
            tokens = tokens.iter().map(|t| stemmer.stem(t)).collect();
        }
        if let Some(filter) = &self.token_filter {
            tokens = filter.filter(tokens);
        }
        text::dedup_tokens(tokens)
    }

    /// Register `text` as one training document for `label`.
    pub fn train(&mut self, text: &str, label: &str) {
        let stems = self.unique_stems(text);
        if !self.labels.iter().any(|l| l == label) {
            self.labels.push(label.to_string());
        }
        *self.label_doc_count.entry(label.to_string()).or_insert(0) += 1;
        self.total_docs += 1;

        let label_stems = self.stem_label_count.entry(label.to_string()).or_default();
        for stem in &stems {
            *label_stems.entry(stem.clone()).or_insert(0) += 1;
            *self.stem_count.entry(stem.clone()).or_insert(0) += 1;
        }
        debug!(label, stems = stems.len(), "trained document");
    }

    /// Independent confidence per seen label for `text`.
    pub fn score(&self, text: &str) -> LabelScores {
        let stems = self.unique_stems(text);
        let scores = self
            .labels
            .iter()
            .map(|label| (label.clone(), self.score_label(label, &stems)))
            .collect();
        LabelScores(scores)
    }

    /// Labels seen so far, in first-seen order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Whether `label` has been trained at least once.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    fn score_label(&self, label: &str, stems: &[String]) -> f64 {
        let label_docs = match self.label_doc_count.get(label) {
            Some(&n) if n > 0 => f64::from(n),
            _ => return 0.0,
        };
        let inverse_docs = f64::from(self.total_docs) - label_docs;
        let label_stems = self.stem_label_count.get(label);

        let mut log_sum = 0.0f64;
        for stem in stems {
            // Stems never seen under any label carry no evidence.
            let total = match self.stem_count.get(stem) {
                Some(&n) if n > 0 => f64::from(n),
                _ => continue,
            };
            let for_label = label_stems
                .and_then(|m| m.get(stem))
                .copied()
                .map_or(0.0, f64::from);

            let probability = for_label / label_docs;
            let inverse_probability = if inverse_docs > 0.0 {
                (total - for_label) / inverse_docs
            } else {
                0.0
            };

            // Fraction of the evidence for this stem pointing at this label,
            // blended toward the neutral prior 0.5 with weight 1/(n+1).
            let denominator = probability + inverse_probability;
            let observed = if denominator > 0.0 {
                probability / denominator
            } else {
                0.5
            };
            let wordicity =
                ((0.5 + total * observed) / (1.0 + total)).clamp(MIN_WORDICITY, MAX_WORDICITY);
            log_sum += (1.0 - wordicity).ln() - wordicity.ln();
        }
        1.0 / (1.0 + log_sum.exp())
    }
}

impl Default for LabelClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::StopwordFilter;

    #[test]
    fn test_seeded_baseline_label() {
        let classifier = LabelClassifier::new();
        assert!(classifier.has_label(NONE_LABEL));
        assert_eq!(classifier.labels().count(), 1);
    }

    #[test]
    fn test_scores_within_bounds() {
        let mut classifier = LabelClassifier::new();
        classifier.train("hello {username}", "greet");
        classifier.train("hello there {username}", "greet");
        classifier.train("call the police", "emergency");
        classifier.train("police station nearby", "emergency");

        for input in ["hello", "call the police now", "zzz unseen words", ""] {
            for (_, score) in classifier.score(input).iter() {
                assert!((0.0..=1.0).contains(&score), "score {score} out of bounds");
            }
        }
    }

    #[test]
    fn test_discriminates_labels() {
        let mut classifier = LabelClassifier::new();
        classifier.train("hello {username}", "greet");
        classifier.train("call the police", "emergency");

        let scores = classifier.score("hello friend");
        let greet = scores.get("greet").unwrap();
        let emergency = scores.get("emergency").unwrap();
        assert!(greet > emergency);
        assert_eq!(scores.winner().unwrap().label, "greet");
    }

    #[test]
    fn test_scores_are_independent_not_normalized() {
        let mut classifier = LabelClassifier::new();
        classifier.train("book a table for dinner", "restaurant");
        classifier.train("book a table for dinner tonight", "reservation");

        let scores = classifier.score("book a table for dinner");
        let total: f64 = scores.iter().map(|(_, s)| s).sum();
        // Shared vocabulary scores high for both labels at once.
        assert!(total > 1.0);
    }

    #[test]
    fn test_winner_tie_keeps_first_seen() {
        let mut classifier = LabelClassifier::new();
        classifier.train("alpha beta", "first");
        classifier.train("alpha beta", "second");

        let scores = classifier.score("alpha beta");
        assert_eq!(
            scores.get("first").unwrap(),
            scores.get("second").unwrap()
        );
        assert_eq!(scores.winner().unwrap().label, "first");
    }

    #[test]
    fn test_unseen_stems_are_neutral() {
        let mut classifier = LabelClassifier::new();
        classifier.train("hello world", "greet");

        // No stem of the input was ever trained: every label sits at the
        // logistic midpoint and nothing wins outright over the baseline.
        let scores = classifier.score("xyzzy plugh");
        assert_eq!(scores.get("greet").unwrap(), 0.5);
        assert_eq!(scores.get(NONE_LABEL).unwrap(), 0.5);
        assert_eq!(scores.winner().unwrap().label, NONE_LABEL);
    }

    #[test]
    fn test_monotonic_training_sharpens_score() {
        let mut classifier = LabelClassifier::new();
        classifier.train("weather forecast for {location}", "weather");
        let before = classifier.score("weather in {location}").get("weather").unwrap();
        classifier.train("weather in {location} tomorrow", "weather");
        let after = classifier.score("weather in {location}").get("weather").unwrap();
        assert!(after > before);
    }

    #[test]
    fn test_token_filter_applied() {
        let filter: Arc<dyn TokenFilter> = Arc::new(StopwordFilter::english());
        let mut classifier = LabelClassifier::with_processing(None, Some(filter));
        classifier.train("the big apple", "city");

        // "the" was filtered at train time, so it is no evidence for "city".
        let scores = classifier.score("the the the");
        assert_eq!(scores.get("city").unwrap(), 0.5);
    }

    #[test]
    fn test_stemmer_applied() {
        let stemmer: Arc<dyn Stemmer> = Arc::new(|word: &str| {
            word.trim_end_matches('s').to_string()
        });
        let mut classifier = LabelClassifier::with_processing(Some(stemmer), None);
        classifier.train("buy tickets", "purchase");

        let scores = classifier.score("ticket");
        assert!(scores.get("purchase").unwrap() > 0.5);
    }
}
