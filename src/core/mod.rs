pub mod extract;
pub mod fallback;
pub mod generator;
pub mod pipeline;
pub mod prompt;
pub mod settings;
