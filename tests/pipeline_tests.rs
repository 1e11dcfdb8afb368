/// Pipeline integration tests: mood in, quote outcome out.

use mood_quotes::core::fallback::{FallbackCatalog, GENERIC_QUOTE};
use mood_quotes::core::generator::{CommandGenerator, GenerationError, GenerationRequest};
use mood_quotes::core::pipeline::{PipelineError, QuoteEngine};
use mood_quotes::core::prompt::PromptBuilder;
use mood_quotes::schema::mood::Mood;
use mood_quotes::schema::outcome::{FallbackReason, Provenance};
use std::cell::Cell;
use std::rc::Rc;

type Generated = Result<String, GenerationError>;

/// A fake model that echoes the prompt, then cycles through scripted
/// continuations.
fn scripted(continuations: &'static [&'static str]) -> impl Fn(&GenerationRequest) -> Generated {
    let next = Cell::new(0usize);
    move |req: &GenerationRequest| -> Generated {
        let i = next.get();
        next.set(i + 1);
        Ok(format!("{}{}", req.prompt, continuations[i % continuations.len()]))
    }
}

#[test]
fn generated_and_fallback_quotes_over_a_session() {
    let mut engine = QuoteEngine::builder()
        .seed(42)
        .generator(scripted(&[
            " \"You carry more strength than you know.\"",
            " lorem ipsum dolor",
            " Breathe in. You will get through this hour, and the next one too",
        ]))
        .build()
        .unwrap();

    let first = engine.generate("Anxious");
    assert!(first.is_ai_generated());
    assert_eq!(first.quote.as_str(), "You carry more strength than you know.");
    assert_eq!(first.provenance.badge(), "AI Generated");

    let second = engine.generate("Anxious");
    assert_eq!(second.provenance, Provenance::Fallback);
    assert_eq!(second.fallback_reason, Some(FallbackReason::ExtractionMiss));
    assert_eq!(
        second.notice(),
        "AI output wasn't suitable, showing curated quote instead. Try again!"
    );
    let anxious = FallbackCatalog::builtin().quotes_for("anxious").unwrap();
    assert!(anxious.iter().any(|q| q == second.quote.as_str()));

    let third = engine.generate("Anxious");
    assert!(third.is_ai_generated());
    assert_eq!(
        third.quote.as_str(),
        "You will get through this hour, and the next one too."
    );
}

#[test]
fn multi_word_moods_reach_their_curated_quotes() {
    let mut engine = QuoteEngine::builder().build().unwrap();
    for mood in Mood::ALL {
        let expected = FallbackCatalog::builtin().quotes_for(&mood.label()).unwrap();
        for _ in 0..4 {
            let outcome = engine.generate(&mood.label());
            assert!(
                expected.iter().any(|q| q == outcome.quote.as_str()),
                "{} got {:?}",
                mood.label(),
                outcome.quote.as_str()
            );
        }
    }
}

#[test]
fn unknown_mood_without_service_gets_generic_quote() {
    let mut engine = QuoteEngine::builder().build().unwrap();
    let outcome = engine.generate("Bewildered");
    assert_eq!(outcome.quote.as_str(), GENERIC_QUOTE);
    assert_eq!(
        outcome.notice(),
        "AI model is currently unavailable. Using curated quotes instead."
    );
    assert_eq!(outcome.provenance.badge(), "Curated Quote");
}

#[test]
fn failure_is_single_attempt() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut engine = QuoteEngine::builder()
        .generator(move |_: &GenerationRequest| -> Generated {
            counter.set(counter.get() + 1);
            Err(GenerationError::Failed("model crashed".to_string()))
        })
        .build()
        .unwrap();

    let outcome = engine.generate("tired");
    assert_eq!(calls.get(), 1);
    assert_eq!(
        outcome.fallback_reason,
        Some(FallbackReason::GenerationFailed {
            message: "model crashed".to_string()
        })
    );
}

#[test]
fn blank_generation_is_extraction_miss() {
    let mut engine = QuoteEngine::builder()
        .generator(|_: &GenerationRequest| -> Generated { Ok("  \n".to_string()) })
        .build()
        .unwrap();

    let outcome = engine.generate("tired");
    assert_eq!(outcome.fallback_reason, Some(FallbackReason::ExtractionMiss));
    assert_eq!(
        outcome.notice(),
        "AI output wasn't suitable, showing curated quote instead. Try again!"
    );
}

#[test]
fn fixture_settings_flow_into_requests() {
    let seen = Rc::new(Cell::new(None));
    let sink = Rc::clone(&seen);
    let mut engine = QuoteEngine::builder()
        .settings_file("tests/fixtures/settings.ron")
        .generator(move |req: &GenerationRequest| -> Generated {
            sink.set(Some((req.temperature, req.top_p, req.max_length)));
            Ok(String::new())
        })
        .build()
        .unwrap();

    assert_eq!(engine.settings().length, 80);
    engine.generate("lonely");

    let prompt = PromptBuilder::build("lonely");
    let (temperature, top_p, max_length) = seen.get().unwrap();
    assert_eq!(temperature, 0.5);
    assert_eq!(top_p, 0.95);
    assert_eq!(max_length, prompt.word_count() + 80);
}

#[test]
fn out_of_range_settings_file_fails_the_build() {
    let result = QuoteEngine::builder()
        .settings_file("tests/fixtures/bad_settings.ron")
        .build();
    assert!(matches!(result, Err(PipelineError::Settings(_))));
}

#[test]
fn catalog_overlay_is_used_for_fallbacks() {
    let mut engine = QuoteEngine::builder()
        .catalog_file("tests/fixtures/extra_quotes.ron")
        .build()
        .unwrap();

    assert_eq!(
        engine.generate("tired").quote.as_str(),
        "Even a slow step forward will carry you closer to where you want to be."
    );

    let grateful = engine.generate("GRATEFUL");
    assert_ne!(grateful.quote.as_str(), GENERIC_QUOTE);
    assert_eq!(engine.generate("bored").quote.as_str(), GENERIC_QUOTE);
}

#[test]
fn missing_catalog_file_fails_the_build() {
    let result = QuoteEngine::builder()
        .catalog_file("tests/fixtures/does_not_exist.ron")
        .build();
    assert!(matches!(result, Err(PipelineError::Catalog(_))));
}

#[test]
fn reseed_replays_the_fallback_sequence() {
    let mut engine = QuoteEngine::builder().seed(3).build().unwrap();
    let first: Vec<String> = (0..8)
        .map(|_| engine.generate("stressed").quote.into_string())
        .collect();

    engine.reseed(3);
    let second: Vec<String> = (0..8)
        .map(|_| engine.generate("stressed").quote.into_string())
        .collect();

    assert_eq!(first, second);
}

#[cfg(unix)]
#[test]
fn command_generator_end_to_end() {
    let mut engine = QuoteEngine::builder()
        .generator(
            CommandGenerator::new("sh")
                .args(["-c", "cat; printf ' Your courage grows each time you try.'"]),
        )
        .build()
        .unwrap();
    let outcome = engine.generate("lacking confidence");
    assert!(outcome.is_ai_generated());
    assert_eq!(outcome.quote.as_str(), "Your courage grows each time you try.");
}

#[cfg(unix)]
#[test]
fn silent_command_is_extraction_miss() {
    let mut engine = QuoteEngine::builder()
        .generator(CommandGenerator::new("sh").args(["-c", "cat >/dev/null; exit 0"]))
        .build()
        .unwrap();
    let outcome = engine.generate("stressed");
    assert_eq!(outcome.provenance, Provenance::Fallback);
    assert_eq!(outcome.fallback_reason, Some(FallbackReason::ExtractionMiss));
}

#[test]
fn missing_command_is_service_unavailable() {
    let mut engine = QuoteEngine::builder()
        .generator(CommandGenerator::new("no-such-quote-model-binary"))
        .build()
        .unwrap();
    let outcome = engine.generate("need focus");
    assert_eq!(
        outcome.fallback_reason,
        Some(FallbackReason::ServiceUnavailable)
    );
}
