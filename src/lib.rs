//! Mood Quotes: motivational quotes from a text-generation model.
//!
//! Builds a few-shot prompt from a mood, hands it to a generation service,
//! extracts a clean quote from the noisy output, and falls back to a
//! curated catalog whenever generation is unavailable or unusable.

pub mod core;
pub mod schema;
