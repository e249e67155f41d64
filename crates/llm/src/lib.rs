//! Chat-completions client for OpenAI-compatible providers (OpenRouter by
//! default), implementing [`mingzi_core::provider::CompletionProvider`].

pub mod client;
pub mod config;

pub use client::{ChatCompletionsClient, LlmError};
pub use config::LlmConfig;
