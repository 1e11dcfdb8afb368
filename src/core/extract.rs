/// Quote extraction: pulls a usable quote out of raw generated text.
///
/// Extraction runs an ordered list of matchers over the text left after the
/// prompt is removed. The first matcher that produces a quote wins.

use regex::Regex;
use std::sync::LazyLock;

use crate::schema::quote::{meta_prefix, Quote, MAX_QUOTE_CHARS, MIN_QUOTE_CHARS, TERMINAL_PUNCTUATION};

/// Words at least one of which a sentence candidate must contain.
pub const KEYWORDS: [&str; 14] = [
    "you", "your", "can", "will", "strength", "believe", "success", "achieve", "overcome",
    "courage", "hope", "dream", "grow", "strong",
];

/// A quoted span must be longer than this many characters.
pub const MIN_QUOTED_SPAN_CHARS: usize = 10;

static QUOTED_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("quoted-span pattern is valid"));

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence-break pattern is valid"));

/// One strategy for turning cleaned generated text into a quote.
pub trait QuoteMatcher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Try to produce a quote. `None` passes the text to the next matcher.
    fn attempt(&self, text: &str) -> Option<Quote>;
}

/// Takes the first `"..."` span when its content is long enough.
///
/// Only the length floor applies here: no ceiling, no keyword or meta-word
/// check and no terminal punctuation fix-up. Only the first span is tried.
#[derive(Debug, Clone, Default)]
pub struct QuotedSpanMatcher;

impl QuoteMatcher for QuotedSpanMatcher {
    fn name(&self) -> &'static str {
        "quoted_span"
    }

    fn attempt(&self, text: &str) -> Option<Quote> {
        let captures = QUOTED_SPAN.captures(text)?;
        let inner = captures.get(1)?.as_str().trim();
        if inner.chars().count() > MIN_QUOTED_SPAN_CHARS {
            Some(Quote::new(inner))
        } else {
            None
        }
    }
}

/// Scans sentences in order and accepts the first one that looks like a
/// motivational quote.
#[derive(Debug, Clone, Default)]
pub struct SentenceMatcher;

impl SentenceMatcher {
    /// Strip surrounding whitespace, leading quote/dash marks and trailing
    /// quote marks.
    pub fn clean(candidate: &str) -> &str {
        candidate
            .trim()
            .trim_start_matches(|c: char| matches!(c, '"' | '\'' | '-') || c.is_whitespace())
            .trim_end_matches(|c: char| matches!(c, '"' | '\'') || c.is_whitespace())
    }

    /// Whether a cleaned sentence is acceptable as a quote.
    pub fn accepts(sentence: &str) -> bool {
        let len = sentence.chars().count();
        if len <= MIN_QUOTE_CHARS || len >= MAX_QUOTE_CHARS {
            return false;
        }
        if meta_prefix(sentence).is_some() {
            return false;
        }
        let lower = sentence.to_lowercase();
        KEYWORDS.iter().any(|word| lower.contains(word))
    }
}

impl QuoteMatcher for SentenceMatcher {
    fn name(&self) -> &'static str {
        "sentence"
    }

    fn attempt(&self, text: &str) -> Option<Quote> {
        for candidate in SENTENCE_BREAK.split(text) {
            let sentence = Self::clean(candidate);
            if !Self::accepts(sentence) {
                continue;
            }

            let mut quote = sentence.to_string();
            if !quote.ends_with(TERMINAL_PUNCTUATION) {
                quote.push('.');
            }
            return Some(Quote::new(quote));
        }
        None
    }
}

/// Ordered matcher chain applied to generated text.
pub struct QuoteExtractor {
    matchers: Vec<Box<dyn QuoteMatcher>>,
}

impl Default for QuoteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteExtractor {
    /// The standard chain: quoted span, then sentence scan.
    pub fn new() -> Self {
        Self::with_matchers(vec![Box::new(QuotedSpanMatcher), Box::new(SentenceMatcher)])
    }

    pub fn with_matchers(matchers: Vec<Box<dyn QuoteMatcher>>) -> Self {
        Self { matchers }
    }

    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Extract a quote from `generated`, ignoring every copy of `prompt`.
    pub fn extract(&self, generated: &str, prompt: &str) -> Option<Quote> {
        let text = strip_prompt(generated, prompt);

        for matcher in &self.matchers {
            if let Some(quote) = matcher.attempt(&text) {
                tracing::debug!(matcher = matcher.name(), quote = %quote, "quote extracted");
                return Some(quote);
            }
        }

        tracing::debug!(text_length = text.len(), "no usable quote in generated text");
        None
    }
}

/// Remove every occurrence of `prompt` from `generated` and trim the rest.
pub fn strip_prompt(generated: &str, prompt: &str) -> String {
    if prompt.is_empty() {
        return generated.trim().to_string();
    }
    generated.replace(prompt, "").trim().to_string()
}

/// Extract with the standard matcher chain.
pub fn extract(generated: &str, prompt: &str) -> Option<Quote> {
    QuoteExtractor::new().extract(generated, prompt)
}
