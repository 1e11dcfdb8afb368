use serde::{Deserialize, Serialize};
use std::fmt;

/// Quotes must be longer than this many characters.
pub const MIN_QUOTE_CHARS: usize = 15;
/// Candidate sentences must be shorter than this. A finished quote may
/// reach it once closing punctuation is appended.
pub const MAX_QUOTE_CHARS: usize = 200;

/// Openers that mark commentary about a quote rather than the quote itself.
pub const META_PREFIXES: [&str; 4] = ["here", "this", "quote", "motivation"];

/// Characters a finished quote may end with.
pub const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// A finished quote, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quote(String);

/// A way a quote breaks the usual shape rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteIssue {
    Empty,
    TooShort(usize),
    TooLong(usize),
    MissingTerminalPunctuation,
    MetaPrefix(&'static str),
}

impl fmt::Display for QuoteIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "quote is empty"),
            Self::TooShort(n) => write!(
                f,
                "quote has {} characters, needs more than {}",
                n, MIN_QUOTE_CHARS
            ),
            Self::TooLong(n) => write!(
                f,
                "quote has {} characters, at most {} allowed",
                n, MAX_QUOTE_CHARS
            ),
            Self::MissingTerminalPunctuation => {
                write!(f, "quote does not end with '.', '!' or '?'")
            }
            Self::MetaPrefix(word) => write!(f, "quote starts with meta-word '{}'", word),
        }
    }
}

impl Quote {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Character count (not bytes).
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// The quote wrapped in double quotes, as offered for copying.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }

    /// Check the quote against the shape rules. Empty means it conforms.
    pub fn issues(&self) -> Vec<QuoteIssue> {
        let mut issues = Vec::new();
        if self.0.trim().is_empty() {
            issues.push(QuoteIssue::Empty);
            return issues;
        }

        let len = self.char_len();
        if len <= MIN_QUOTE_CHARS {
            issues.push(QuoteIssue::TooShort(len));
        } else if len > MAX_QUOTE_CHARS {
            issues.push(QuoteIssue::TooLong(len));
        }

        if !self.0.ends_with(TERMINAL_PUNCTUATION) {
            issues.push(QuoteIssue::MissingTerminalPunctuation);
        }

        if let Some(word) = meta_prefix(&self.0) {
            issues.push(QuoteIssue::MetaPrefix(word));
        }

        issues
    }
}

/// The meta-word `text` opens with, compared case-insensitively.
pub fn meta_prefix(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    META_PREFIXES
        .iter()
        .copied()
        .find(|prefix| lower.starts_with(prefix))
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Quote {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Quote> for String {
    fn from(quote: Quote) -> Self {
        quote.0
    }
}
