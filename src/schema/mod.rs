pub mod mood;
pub mod outcome;
pub mod quote;
