use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The emotional state the user picked.
///
/// The eight selector moods are named variants. Anything else is carried
/// verbatim as `Custom` and gets the generic prompt context and quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Anxious,
    Tired,
    Unmotivated,
    FeelingDown,
    LackingConfidence,
    Stressed,
    NeedFocus,
    Lonely,
    Custom(String),
}

impl Mood {
    /// The selector moods, in display order.
    pub const ALL: [Mood; 8] = [
        Mood::Anxious,
        Mood::Tired,
        Mood::Unmotivated,
        Mood::FeelingDown,
        Mood::LackingConfidence,
        Mood::Stressed,
        Mood::NeedFocus,
        Mood::Lonely,
    ];

    /// Parse a mood label case-insensitively. Unknown labels become `Custom`.
    pub fn parse(label: &str) -> Mood {
        match label.to_lowercase().as_str() {
            "anxious" => Mood::Anxious,
            "tired" => Mood::Tired,
            "unmotivated" => Mood::Unmotivated,
            "feeling down" => Mood::FeelingDown,
            "lacking confidence" => Mood::LackingConfidence,
            "stressed" => Mood::Stressed,
            "need focus" => Mood::NeedFocus,
            "lonely" => Mood::Lonely,
            _ => Mood::Custom(label.to_string()),
        }
    }

    /// Lower-case lookup label (e.g., "feeling down"). Borrowed for the
    /// selector moods.
    pub fn key(&self) -> Cow<'static, str> {
        match self {
            Self::Anxious => Cow::Borrowed("anxious"),
            Self::Tired => Cow::Borrowed("tired"),
            Self::Unmotivated => Cow::Borrowed("unmotivated"),
            Self::FeelingDown => Cow::Borrowed("feeling down"),
            Self::LackingConfidence => Cow::Borrowed("lacking confidence"),
            Self::Stressed => Cow::Borrowed("stressed"),
            Self::NeedFocus => Cow::Borrowed("need focus"),
            Self::Lonely => Cow::Borrowed("lonely"),
            Self::Custom(label) => Cow::Owned(label.to_lowercase()),
        }
    }

    /// Title-cased label as shown in the selector (e.g., "Feeling Down").
    pub fn label(&self) -> String {
        match self {
            Self::Custom(label) => title_case(label),
            known => title_case(&known.key()),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Who the generated quote is written for. `None` for custom moods.
    pub fn context(&self) -> Option<&'static str> {
        match self {
            Self::Anxious => {
                Some("someone who is feeling overwhelmed by worry and needs reassurance")
            }
            Self::Tired => {
                Some("someone who is physically and mentally exhausted and needs encouragement")
            }
            Self::Unmotivated => {
                Some("someone who has lost their drive and needs inspiration to start again")
            }
            Self::FeelingDown => Some("someone who is sad or depressed and needs uplifting words"),
            Self::LackingConfidence => {
                Some("someone who doubts themselves and needs a confidence boost")
            }
            Self::Stressed => Some("someone who is under pressure and needs calming motivation"),
            Self::NeedFocus => {
                Some("someone who is distracted and needs motivation to concentrate")
            }
            Self::Lonely => Some("someone who feels isolated and needs encouraging companionship"),
            Self::Custom(_) => None,
        }
    }

    /// One-line caption shown under the selector.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            Self::Anxious => Some("When worry feels overwhelming"),
            Self::Tired => Some("When energy feels depleted"),
            Self::Unmotivated => Some("When drive seems missing"),
            Self::FeelingDown => Some("When spirits need lifting"),
            Self::LackingConfidence => Some("When self-doubt creeps in"),
            Self::Stressed => Some("When pressure feels intense"),
            Self::NeedFocus => Some("When attention feels scattered"),
            Self::Lonely => Some("When connection feels distant"),
            Self::Custom(_) => None,
        }
    }
}

/// Upper-case every letter that does not follow another letter and
/// lower-case the rest ("feeling down" → "Feeling Down").
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_letter = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}
