/// Prompt construction: mood label to few-shot generation prompt.

use std::fmt;

use crate::schema::mood::Mood;

/// Context used for moods outside the selector set.
pub const GENERIC_CONTEXT: &str = "someone who needs motivation";

/// Few-shot examples shown to the model before the instruction.
pub const EXAMPLE_QUOTES: [&str; 3] = [
    "The only way to do great work is to love what you do.",
    "Believe you can and you're halfway there.",
    "Success is not final, failure is not fatal: it is the courage to continue that counts.",
];

/// A generation prompt. Built once per request and handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
}

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Whitespace-separated word count, used to size the generation budget.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Builds few-shot prompts ending in a `"<Mood> Quote:` cue for the
/// generator to continue.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the prompt for a raw mood label.
    pub fn build(mood: &str) -> Prompt {
        let parsed = Mood::parse(mood);
        let context = parsed.context().unwrap_or(GENERIC_CONTEXT);
        let title = parsed.label();

        tracing::debug!(mood, context, "building prompt");

        let examples: Vec<String> = EXAMPLE_QUOTES
            .iter()
            .map(|quote| format!("\"{}\"", quote))
            .collect();

        let text = format!(
            "Here are some examples of great motivational quotes:\n\n\
             {}\n\n\
             Now write an inspiring motivational quote for {}. \
             Make it positive, encouraging, and uplifting:\n\n\
             \"{} Quote:",
            examples.join("\n"),
            context,
            title
        );

        Prompt { text }
    }

    /// The context phrase a mood label maps to.
    pub fn context(mood: &str) -> &'static str {
        Mood::parse(mood).context().unwrap_or(GENERIC_CONTEXT)
    }
}

/// Shorthand for [`PromptBuilder::build`].
pub fn build_prompt(mood: &str) -> Prompt {
    PromptBuilder::build(mood)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_has_examples_context_and_cue() {
        let prompt = build_prompt("anxious");
        let text = prompt.as_str();
        assert!(text.starts_with("Here are some examples of great motivational quotes:\n\n"));
        for quote in EXAMPLE_QUOTES {
            assert!(text.contains(&format!("\"{}\"", quote)));
        }
        assert!(text.contains(
            "Now write an inspiring motivational quote for someone who is feeling overwhelmed by worry and needs reassurance. Make it positive, encouraging, and uplifting:"
        ));
        assert!(text.ends_with("\n\n\"Anxious Quote:"));
    }

    #[test]
    fn every_known_mood_gets_its_context() {
        for mood in Mood::ALL {
            let label = mood.label();
            let prompt = build_prompt(&label);
            let context = mood.context().unwrap();
            assert!(prompt.as_str().contains(context), "missing context for {}", label);
            assert!(prompt.as_str().ends_with(&format!("{} Quote:", label)));
        }
    }

    #[test]
    fn lookup_ignores_case_but_cue_is_title_cased() {
        let prompt = build_prompt("FEELING DOWN");
        assert!(prompt.as_str().contains("sad or depressed"));
        assert!(prompt.as_str().ends_with("\"Feeling Down Quote:"));
    }

    #[test]
    fn unknown_mood_uses_generic_context() {
        let prompt = build_prompt("hangry");
        assert!(prompt
            .as_str()
            .contains("motivational quote for someone who needs motivation."));
        assert!(prompt.as_str().ends_with("\"Hangry Quote:"));
        assert_eq!(PromptBuilder::context("hangry"), GENERIC_CONTEXT);
    }

    #[test]
    fn build_is_idempotent() {
        assert_eq!(build_prompt("lonely"), build_prompt("lonely"));
        assert_eq!(build_prompt("whatever"), build_prompt("whatever"));
    }

    #[test]
    fn word_count_counts_whitespace_tokens() {
        let prompt = build_prompt("tired");
        assert_eq!(
            prompt.word_count(),
            prompt.as_str().split_whitespace().count()
        );
        assert!(prompt.word_count() > 40);
    }
}
