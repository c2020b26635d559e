pub mod aggregator;
pub mod content;
pub mod engine;
pub mod filter;
pub mod generative;
pub mod prompts;
