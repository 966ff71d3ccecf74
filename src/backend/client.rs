//! LlmClient trait: the one seam between the Model Coordinator and whatever
//! inference backend is actually running.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::LlmError;
use super::types::{CompletionResponse, StreamChunk};

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// A single completion call taking a model id, optional system prompt,
    /// and a task string. Convenience wrapper over `complete_request` for
    /// the common delegation path.
    async fn complete(
        &self,
        model: &str,
        system_prompt: Option<&str>,
        prompt: &str,
    ) -> Result<CompletionResponse, LlmError>;

    /// Streaming completion, used by the REPL's live token display.
    async fn stream(
        &self,
        model: &str,
        system_prompt: Option<&str>,
        prompt: &str,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError>;
}
