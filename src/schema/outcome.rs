use serde::{Deserialize, Serialize};

use super::quote::Quote;

/// Where a shown quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    AiGenerated,
    Fallback,
}

impl Provenance {
    /// Returns the provenance tag (e.g., "ai-generated").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::AiGenerated => "ai-generated",
            Self::Fallback => "fallback",
        }
    }

    /// Badge text rendered next to the quote.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::AiGenerated => "AI Generated",
            Self::Fallback => "Curated Quote",
        }
    }
}

/// Why the curated catalog was used instead of generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// No generation service is configured or it could not be reached.
    ServiceUnavailable,
    /// The service raised during the single attempt.
    GenerationFailed { message: String },
    /// Generation worked but nothing in the output was usable.
    ExtractionMiss,
}

/// The result of one quote request. Always carries a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteOutcome {
    pub quote: Quote,
    pub provenance: Provenance,
    pub fallback_reason: Option<FallbackReason>,
}

impl QuoteOutcome {
    pub fn generated(quote: Quote) -> Self {
        Self {
            quote,
            provenance: Provenance::AiGenerated,
            fallback_reason: None,
        }
    }

    pub fn fallback(quote: Quote, reason: FallbackReason) -> Self {
        Self {
            quote,
            provenance: Provenance::Fallback,
            fallback_reason: Some(reason),
        }
    }

    pub fn is_ai_generated(&self) -> bool {
        self.provenance == Provenance::AiGenerated
    }

    /// User-facing message explaining the provenance.
    pub fn notice(&self) -> String {
        match &self.fallback_reason {
            None => "This quote was uniquely generated by AI based on your mood!".to_string(),
            Some(FallbackReason::ExtractionMiss) => {
                "AI output wasn't suitable, showing curated quote instead. Try again!".to_string()
            }
            Some(FallbackReason::GenerationFailed { message }) => {
                format!("AI generation failed: {}", message)
            }
            Some(FallbackReason::ServiceUnavailable) => {
                "AI model is currently unavailable. Using curated quotes instead.".to_string()
            }
        }
    }
}
