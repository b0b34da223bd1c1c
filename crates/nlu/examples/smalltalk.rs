//! Minimal end-to-end demo: build a fuzzy engine, teach it two intents,
//! then match a few sentences.
//!
//! Run with: cargo run -p parlance-nlu --example smalltalk

use std::sync::Arc;

use anyhow::Result;
use parlance_nlu::{FuzzyEngine, IntentEngine, LearnOptions};
use parlance_recognizers::{NumberRecognizer, StringSetRecognizer};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut engine = FuzzyEngine::new();
    engine.register_entity(Arc::new(
        StringSetRecognizer::new("username")
            .matching("mark", &["mark"])
            .matching("anna", &["anna", "annie"]),
    ));
    engine.register_entity(Arc::new(NumberRecognizer::new("number")));

    engine.learn_document("Hello {username}!", "greet", &LearnOptions::tagged())?;
    engine.learn_document("Good morning {username}", "greet", &LearnOptions::tagged())?;
    engine.learn_document(
        "book a table for {number} people",
        "reserve",
        &LearnOptions::tagged(),
    )?;

    for sentence in [
        "hello mark",
        "good morning annie",
        "book a table for four people",
        "call the police!",
    ] {
        match engine.test(sentence) {
            Some(result) => {
                println!("{sentence:35} -> {} ({:.2})", result.intent, result.score);
                for (slot, entity) in &result.slots {
                    println!("{:35}    {slot} = {}", "", entity.value);
                }
            }
            None => println!("{sentence:35} -> no match"),
        }
    }

    Ok(())
}
