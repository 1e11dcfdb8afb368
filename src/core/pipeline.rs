/// The main quote pipeline: Mood → Prompt → Generation → Extraction,
/// with the curated catalog as the terminal fallback.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use thiserror::Error;

use crate::core::extract::QuoteExtractor;
use crate::core::fallback::{CatalogError, FallbackCatalog};
use crate::core::generator::{GenerationError, GenerationRequest, QuoteGenerator};
use crate::core::prompt::{Prompt, PromptBuilder};
use crate::core::settings::{GenerationSettings, SettingsError};
use crate::schema::outcome::{FallbackReason, QuoteOutcome};

/// Seed used when none is given, matching the generator's fixed seed.
pub const DEFAULT_SEED: u64 = 42;

/// Errors raised while building an engine. Running the pipeline never fails.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// The top-level quote engine. Built via `QuoteEngine::builder()`.
pub struct QuoteEngine {
    generator: Option<Box<dyn QuoteGenerator>>,
    extractor: QuoteExtractor,
    catalog: FallbackCatalog,
    settings: GenerationSettings,
    rng: StdRng,
    seed: u64,
    generation_count: u64,
}

/// Builder for constructing a `QuoteEngine`.
pub struct QuoteEngineBuilder {
    generator: Option<Box<dyn QuoteGenerator>>,
    extractor: Option<QuoteExtractor>,
    settings_path: Option<String>,
    catalog_paths: Vec<String>,
    seed: u64,
    /// Directly provided settings (for testing without files).
    settings: Option<GenerationSettings>,
    /// Directly provided catalog, replacing the built-in one.
    catalog: Option<FallbackCatalog>,
}

impl QuoteEngine {
    pub fn builder() -> QuoteEngineBuilder {
        QuoteEngineBuilder {
            generator: None,
            extractor: None,
            settings_path: None,
            catalog_paths: Vec::new(),
            seed: DEFAULT_SEED,
            settings: None,
            catalog: None,
        }
    }

    /// Whether a generation service is configured.
    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Replace the generation settings after validating them.
    pub fn set_settings(&mut self, settings: GenerationSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn catalog(&self) -> &FallbackCatalog {
        &self.catalog
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the random sequence from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.generation_count = 0;
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Produce a quote for a mood. Always returns a quote; the outcome says
    /// whether it was generated or came from the catalog, and why.
    pub fn generate(&mut self, mood: &str) -> QuoteOutcome {
        if self.generator.is_none() {
            return self.fallback(mood, FallbackReason::ServiceUnavailable);
        }

        let prompt = PromptBuilder::build(mood);
        let request = self.request_for(&prompt);

        let result = match self.generator.as_deref() {
            Some(generator) => generator.generate(&request),
            None => Err(GenerationError::Unavailable("no generator configured".to_string())),
        };

        self.complete(mood, &prompt, result)
    }

    /// Build the generation request for `prompt` and advance the seed.
    pub fn request_for(&mut self, prompt: &Prompt) -> GenerationRequest {
        let seed = self.seed.wrapping_add(self.generation_count);
        self.generation_count += 1;
        GenerationRequest::new(prompt, &self.settings, seed)
    }

    /// Finish a request whose generation ran elsewhere (e.g., in a browser).
    pub fn complete(
        &mut self,
        mood: &str,
        prompt: &Prompt,
        result: Result<String, GenerationError>,
    ) -> QuoteOutcome {
        match result {
            Ok(text) => match self.extractor.extract(&text, prompt.as_str()) {
                Some(quote) => {
                    tracing::info!(mood, provenance = "ai-generated", "quote ready");
                    QuoteOutcome::generated(quote)
                }
                None => self.fallback(mood, FallbackReason::ExtractionMiss),
            },
            Err(GenerationError::Unavailable(reason)) => {
                tracing::warn!(mood, %reason, "generation service unavailable");
                self.fallback(mood, FallbackReason::ServiceUnavailable)
            }
            Err(e) => {
                tracing::warn!(mood, error = %e, "generation failed");
                self.fallback(
                    mood,
                    FallbackReason::GenerationFailed {
                        message: e.to_string(),
                    },
                )
            }
        }
    }

    /// Pick a curated quote for `mood`.
    pub fn fallback(&mut self, mood: &str, reason: FallbackReason) -> QuoteOutcome {
        let quote = self.catalog.pick(mood, &mut self.rng);
        tracing::info!(mood, provenance = "fallback", reason = ?reason, "quote ready");
        QuoteOutcome::fallback(quote, reason)
    }
}

impl QuoteEngineBuilder {
    pub fn generator(mut self, generator: impl QuoteGenerator + 'static) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    pub fn boxed_generator(mut self, generator: Box<dyn QuoteGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn extractor(mut self, extractor: QuoteExtractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Load settings from a RON file at build time.
    pub fn settings_file(mut self, path: &str) -> Self {
        self.settings_path = Some(path.to_string());
        self
    }

    /// Merge a RON catalog over the base catalog at build time. May be
    /// called more than once; later files win.
    pub fn catalog_file(mut self, path: &str) -> Self {
        self.catalog_paths.push(path.to_string());
        self
    }

    /// Provide settings directly (for testing without files).
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Provide the base catalog directly instead of the built-in one.
    pub fn with_catalog(mut self, catalog: FallbackCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn build(self) -> Result<QuoteEngine, PipelineError> {
        let settings = match self.settings_path {
            Some(ref path) => GenerationSettings::load_from_ron(Path::new(path))?,
            None => {
                let settings = self.settings.unwrap_or_default();
                settings.validate()?;
                settings
            }
        };

        let mut catalog = self
            .catalog
            .unwrap_or_else(|| FallbackCatalog::builtin().clone());
        for path in &self.catalog_paths {
            let overlay = FallbackCatalog::load_from_ron(Path::new(path))?;
            tracing::debug!(path = %path, moods = overlay.len(), "merged catalog overlay");
            catalog.merge(overlay);
        }

        Ok(QuoteEngine {
            generator: self.generator,
            extractor: self.extractor.unwrap_or_default(),
            catalog,
            settings,
            rng: StdRng::seed_from_u64(self.seed),
            seed: self.seed,
            generation_count: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fallback::GENERIC_QUOTE;
    use crate::schema::outcome::Provenance;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Generated = Result<String, GenerationError>;

    fn engine_with(generator: impl QuoteGenerator + 'static) -> QuoteEngine {
        QuoteEngine::builder().generator(generator).build().unwrap()
    }

    fn is_anxious_fallback(text: &str) -> bool {
        FallbackCatalog::builtin()
            .quotes_for("anxious")
            .unwrap()
            .iter()
            .any(|q| q == text)
    }

    #[test]
    fn no_generator_means_service_unavailable() {
        let mut engine = QuoteEngine::builder().build().unwrap();
        assert!(!engine.has_generator());
        let outcome = engine.generate("anxious");
        assert_eq!(outcome.provenance, Provenance::Fallback);
        assert_eq!(
            outcome.fallback_reason,
            Some(FallbackReason::ServiceUnavailable)
        );
        assert!(is_anxious_fallback(outcome.quote.as_str()));
    }

    #[test]
    fn usable_output_is_ai_generated() {
        let mut engine = engine_with(|req: &GenerationRequest| -> Generated {
            Ok(format!("{} You will find your strength again. And more", req.prompt))
        });
        let outcome = engine.generate("tired");
        assert!(outcome.is_ai_generated());
        assert_eq!(outcome.quote.as_str(), "You will find your strength again.");
        assert!(outcome.fallback_reason.is_none());
    }

    #[test]
    fn unusable_output_is_extraction_miss() {
        let mut engine = engine_with(|_: &GenerationRequest| -> Generated {
            Ok("lorem ipsum".to_string())
        });
        let outcome = engine.generate("anxious");
        assert_eq!(outcome.fallback_reason, Some(FallbackReason::ExtractionMiss));
        assert!(is_anxious_fallback(outcome.quote.as_str()));
    }

    #[test]
    fn generator_error_is_recorded_and_not_retried() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut engine = engine_with(move |_: &GenerationRequest| -> Generated {
            *counter.borrow_mut() += 1;
            Err(GenerationError::Failed("CUDA out of memory".to_string()))
        });

        let outcome = engine.generate("mystery");
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(outcome.quote.as_str(), GENERIC_QUOTE);
        assert_eq!(
            outcome.fallback_reason,
            Some(FallbackReason::GenerationFailed {
                message: "CUDA out of memory".to_string()
            })
        );
        assert_eq!(outcome.notice(), "AI generation failed: CUDA out of memory");
    }

    #[test]
    fn unavailable_error_maps_to_service_unavailable() {
        let mut engine = engine_with(|_: &GenerationRequest| -> Generated {
            Err(GenerationError::Unavailable("model not loaded".to_string()))
        });
        let outcome = engine.generate("lonely");
        assert_eq!(
            outcome.fallback_reason,
            Some(FallbackReason::ServiceUnavailable)
        );
    }

    #[test]
    fn requests_carry_settings_and_advancing_seeds() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut engine = QuoteEngine::builder()
            .seed(100)
            .with_settings(GenerationSettings::default().with_temperature(0.3))
            .generator(move |req: &GenerationRequest| -> Generated {
                sink.borrow_mut().push(req.clone());
                Ok(String::new())
            })
            .build()
            .unwrap();

        engine.generate("stressed");
        engine.generate("stressed");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].seed, 100);
        assert_eq!(seen[1].seed, 101);
        assert_eq!(seen[0].temperature, 0.3);
        assert!(seen[0].prompt.ends_with("\"Stressed Quote:"));
    }

    #[test]
    fn same_seed_same_fallback_sequence() {
        let run = |seed| {
            let mut engine = QuoteEngine::builder().seed(seed).build().unwrap();
            (0..10)
                .map(|_| engine.generate("need focus").quote)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn invalid_settings_fail_the_build() {
        let result = QuoteEngine::builder()
            .with_settings(GenerationSettings::default().with_length(5))
            .build();
        assert!(matches!(result, Err(PipelineError::Settings(_))));
    }

    #[test]
    fn set_settings_validates() {
        let mut engine = QuoteEngine::builder().build().unwrap();
        assert!(engine
            .set_settings(GenerationSettings::default().with_temperature(0.0))
            .is_err());
        assert!(engine
            .set_settings(GenerationSettings::default().with_length(100))
            .is_ok());
        assert_eq!(engine.settings().length, 100);
    }

    #[test]
    fn complete_accepts_external_generation() {
        let mut engine = QuoteEngine::builder().build().unwrap();
        let prompt = PromptBuilder::build("unmotivated");
        let outcome = engine.complete(
            "unmotivated",
            &prompt,
            Ok(format!("{}\"Every step you take will matter.\"", prompt)),
        );
        assert!(outcome.is_ai_generated());
        assert_eq!(outcome.quote.as_str(), "Every step you take will matter.");
    }

    #[test]
    fn builder_with_seed() {
        let engine = QuoteEngine::builder().seed(12345).build().unwrap();
        assert_eq!(engine.seed(), 12345);
        assert_eq!(QuoteEngine::builder().build().unwrap().seed(), DEFAULT_SEED);
    }
}
