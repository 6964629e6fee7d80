//! LLM module for recap
//!
//! Summarizer collaborator interface and the Gemini-backed implementation.

mod client;
mod gemini;
mod prompts;

pub use client::{build_provider, CompletionRequest, SamplingParams, Summarizer};
pub use gemini::GeminiClient;
pub use prompts::build_segment_prompt;
