//! WASM bindings for mood-quotes: powers the browser front end.
//!
//! Generation runs in the page (the model lives in JS). The page asks for a
//! prompt, runs its model, then hands the raw text back to `finish_quote`,
//! which extracts a quote or falls back to the curated catalog.

use wasm_bindgen::prelude::*;

use mood_quotes::core::generator::GenerationError;
use mood_quotes::core::pipeline::{QuoteEngine, DEFAULT_SEED};
use mood_quotes::core::prompt::PromptBuilder;
use mood_quotes::core::settings::GenerationSettings;
use mood_quotes::schema::mood::Mood;
use mood_quotes::schema::outcome::{FallbackReason, QuoteOutcome};

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct MoodInfo {
    label: String,
    description: &'static str,
}

#[derive(serde::Serialize)]
struct PromptInfo {
    prompt: String,
    max_length: usize,
    temperature: f32,
    top_p: f32,
    repetition_penalty: f32,
    do_sample: bool,
    seed: u64,
}

#[derive(serde::Serialize)]
struct OutcomeInfo<'a> {
    quote: &'a str,
    provenance: &'static str,
    badge: &'static str,
    notice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_reason: Option<&'a FallbackReason>,
}

fn outcome_json(outcome: &QuoteOutcome) -> Result<String, JsError> {
    let info = OutcomeInfo {
        quote: outcome.quote.as_str(),
        provenance: outcome.provenance.tag(),
        badge: outcome.provenance.badge(),
        notice: outcome.notice(),
        fallback_reason: outcome.fallback_reason.as_ref(),
    };
    serde_json::to_string(&info).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// QuoteDemo: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct QuoteDemo {
    engine: QuoteEngine,
}

#[wasm_bindgen]
impl QuoteDemo {
    /// Create a new demo instance with the given seed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>) -> Result<QuoteDemo, JsError> {
        let engine = QuoteEngine::builder()
            .seed(seed.unwrap_or(DEFAULT_SEED))
            .build()
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;
        Ok(QuoteDemo { engine })
    }

    /// Set creativity and length from the sliders. Values are snapped to
    /// the slider steps before validation.
    pub fn configure(&mut self, temperature: f32, length: u32) -> Result<(), JsError> {
        let settings = GenerationSettings::default()
            .with_temperature(temperature)
            .with_length(length)
            .snapped();
        self.engine
            .set_settings(settings)
            .map_err(|e| JsError::new(&format!("Settings error: {e}")))
    }

    /// Build the prompt and sampling parameters for `mood`. Returns JSON.
    pub fn build_prompt(&mut self, mood: &str) -> Result<String, JsError> {
        let prompt = PromptBuilder::build(mood);
        let request = self.engine.request_for(&prompt);
        let info = PromptInfo {
            prompt: request.prompt,
            max_length: request.max_length,
            temperature: request.temperature,
            top_p: request.top_p,
            repetition_penalty: request.repetition_penalty,
            do_sample: request.do_sample,
            seed: request.seed,
        };
        serde_json::to_string(&info)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Turn the page's generation result into a quote outcome (JSON).
    ///
    /// Pass `generated_text` when the model produced output, `failure` when
    /// it threw, and neither when no model is loaded.
    pub fn finish_quote(
        &mut self,
        mood: &str,
        generated_text: Option<String>,
        failure: Option<String>,
    ) -> Result<String, JsError> {
        let prompt = PromptBuilder::build(mood);
        let result = match (generated_text, failure) {
            (_, Some(message)) => Err(GenerationError::Failed(message)),
            (Some(text), None) => Ok(text),
            (None, None) => Err(GenerationError::Unavailable("model not loaded".to_string())),
        };
        let outcome = self.engine.complete(mood, &prompt, result);
        outcome_json(&outcome)
    }

    /// A curated quote for `mood`, as an outcome JSON.
    pub fn fallback_quote(&mut self, mood: &str) -> Result<String, JsError> {
        let outcome = self
            .engine
            .fallback(mood, FallbackReason::ServiceUnavailable);
        outcome_json(&outcome)
    }

    /// Restart the random sequence.
    pub fn reset(&mut self, seed: u64) {
        self.engine.reseed(seed);
    }

    /// Return JSON array of selector moods with their descriptions.
    pub fn moods() -> String {
        let moods: Vec<MoodInfo> = Mood::ALL
            .iter()
            .map(|m| MoodInfo {
                label: m.label(),
                description: m.description().unwrap_or_default(),
            })
            .collect();
        serde_json::to_string(&moods).unwrap_or_else(|_| "[]".to_string())
    }
}
