//! Domain core for the Chinese name generation service.
//!
//! Everything here is free of HTTP and database concerns. The only outbound
//! seam is [`provider::CompletionProvider`], implemented by `mingzi-llm` in
//! production and by scripted fakes in tests.

pub mod checkout;
pub mod error;
pub mod fallback;
pub mod lexicon;
pub mod orchestrator;
pub mod parser;
pub mod plan;
pub mod prompt;
pub mod provider;
pub mod record;
pub mod request;
pub mod signature;
pub mod types;
