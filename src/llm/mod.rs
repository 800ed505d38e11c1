//! Language-model providers
//!
//! The pipeline only talks to providers through the [`TextGenerator`] and
//! [`EmbeddingProvider`] traits; [`OpenAiClient`] implements both against an
//! OpenAI-compatible HTTP API.

pub mod client;
mod error;
mod openai;
mod types;

pub use client::{EmbeddingProvider, TextGenerator};
pub use error::ProviderError;
pub use openai::OpenAiClient;
pub use types::{Message, Role, SamplingConfig};
