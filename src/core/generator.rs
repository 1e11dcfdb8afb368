/// Generation service seam: the external model is anything that turns a
/// request into text.

use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

use crate::core::prompt::Prompt;
use crate::core::settings::GenerationSettings;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation service unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the generation service needs for one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Total length budget: prompt words plus the configured length.
    pub max_length: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    pub do_sample: bool,
    pub num_return_sequences: u32,
    pub seed: u64,
}

impl GenerationRequest {
    pub fn new(prompt: &Prompt, settings: &GenerationSettings, seed: u64) -> Self {
        Self {
            prompt: prompt.as_str().to_string(),
            max_length: prompt.word_count() + settings.length as usize,
            temperature: settings.temperature,
            top_p: settings.top_p,
            repetition_penalty: settings.repetition_penalty,
            do_sample: settings.do_sample,
            num_return_sequences: 1,
            seed,
        }
    }
}

/// A text-generation service. Returns the raw generated text, which may
/// still contain the prompt. Blank text is a successful call; the extractor
/// decides whether anything in it is usable.
pub trait QuoteGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

impl<F> QuoteGenerator for F
where
    F: Fn(&GenerationRequest) -> Result<String, GenerationError>,
{
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self(request)
    }
}

/// Runs an external program as the generation service.
///
/// The prompt is written to the program's stdin and the generated text is
/// read from its stdout. Sampling parameters are passed as `QUOTE_*`
/// environment variables.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

impl QuoteGenerator for CommandGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("QUOTE_MAX_LENGTH", request.max_length.to_string())
            .env("QUOTE_TEMPERATURE", request.temperature.to_string())
            .env("QUOTE_TOP_P", request.top_p.to_string())
            .env("QUOTE_REPETITION_PENALTY", request.repetition_penalty.to_string())
            .env("QUOTE_DO_SAMPLE", request.do_sample.to_string())
            .env("QUOTE_SEED", request.seed.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => GenerationError::Unavailable(
                    format!("{}: {}", self.program.display(), e),
                ),
                _ => GenerationError::Io(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A generator may exit without reading its input.
            if let Err(e) = stdin.write_all(request.prompt.as_bytes()) {
                if e.kind() != ErrorKind::BrokenPipe {
                    drop(stdin);
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GenerationError::Io(e));
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GenerationError::Failed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
