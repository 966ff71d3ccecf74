//! Model Backend Client (C1): the stateless `LlmClient` seam through which
//! the Model Coordinator reaches an actual inference process.

mod client;
mod error;
pub mod mock;
mod ollama;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use ollama::OllamaClient;
pub use types::{CompletionRequest, CompletionResponse, InferenceStats, StreamChunk};
