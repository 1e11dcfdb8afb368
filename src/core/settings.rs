/// Generation settings: the knobs exposed as "creativity" and "length".

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const TEMPERATURE_MIN: f32 = 0.1;
pub const TEMPERATURE_MAX: f32 = 1.0;
pub const TEMPERATURE_STEP: f32 = 0.1;
pub const TEMPERATURE_DEFAULT: f32 = 0.8;

pub const LENGTH_MIN: u32 = 30;
pub const LENGTH_MAX: u32 = 100;
pub const LENGTH_STEP: u32 = 10;
pub const LENGTH_DEFAULT: u32 = 60;

pub const TOP_P_DEFAULT: f32 = 0.9;
pub const REPETITION_PENALTY_DEFAULT: f32 = 1.1;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("temperature {0} is outside 0.1..=1.0")]
    Temperature(f32),
    #[error("length {0} is outside 30..=100")]
    Length(u32),
    #[error("top_p {0} is outside (0, 1]")]
    TopP(f32),
    #[error("repetition penalty {0} must be positive")]
    RepetitionPenalty(f32),
}

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Creativity; higher means less predictable output.
    pub temperature: f32,
    /// Tokens to generate beyond the prompt.
    pub length: u32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    pub do_sample: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE_DEFAULT,
            length: LENGTH_DEFAULT,
            top_p: TOP_P_DEFAULT,
            repetition_penalty: REPETITION_PENALTY_DEFAULT,
            do_sample: true,
        }
    }
}

impl GenerationSettings {
    /// Load and validate settings from a RON file. Missing fields take
    /// their defaults.
    pub fn load_from_ron(path: &Path) -> Result<GenerationSettings, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<GenerationSettings, SettingsError> {
        let settings: GenerationSettings = ron::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&self.temperature) {
            return Err(SettingsError::Temperature(self.temperature));
        }
        if !(LENGTH_MIN..=LENGTH_MAX).contains(&self.length) {
            return Err(SettingsError::Length(self.length));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(SettingsError::TopP(self.top_p));
        }
        if !(self.repetition_penalty > 0.0) {
            return Err(SettingsError::RepetitionPenalty(self.repetition_penalty));
        }
        Ok(())
    }

    /// Clamp to the slider ranges and round to the slider steps.
    pub fn snapped(&self) -> GenerationSettings {
        let steps = (self.temperature / TEMPERATURE_STEP).round();
        let temperature = (steps * TEMPERATURE_STEP).clamp(TEMPERATURE_MIN, TEMPERATURE_MAX);

        // Clamp first so the rounding cannot overflow.
        let clamped = self.length.clamp(LENGTH_MIN, LENGTH_MAX);
        let length = (clamped + LENGTH_STEP / 2) / LENGTH_STEP * LENGTH_STEP;

        GenerationSettings {
            temperature,
            length,
            ..self.clone()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }
}
