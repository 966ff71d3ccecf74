//! A scripted `LlmClient` test double, for the Agent Executor, Model
//! Coordinator, and orchestrator-level integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::client::LlmClient;
use super::error::LlmError;
use super::types::{CompletionResponse, InferenceStats, StreamChunk};

pub struct MockLlmClient {
    responses: Vec<CompletionResponse>,
    call_count: AtomicUsize,
}

impl MockLlmClient {
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self { responses, call_count: AtomicUsize::new(0) }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(vec![CompletionResponse { text: text.into(), stats: InferenceStats::default() }])
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(
        &self,
        _model: &str,
        _system_prompt: Option<&str>,
        _prompt: &str,
    ) -> Result<CompletionResponse, LlmError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.responses.get(idx).cloned().ok_or_else(|| LlmError::InvalidResponse("no more mock responses".into()))
    }

    async fn stream(
        &self,
        model: &str,
        system_prompt: Option<&str>,
        prompt: &str,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError> {
        let response = self.complete(model, system_prompt, prompt).await?;
        let _ = chunk_tx.send(StreamChunk::TextDelta(response.text.clone())).await;
        let _ = chunk_tx.send(StreamChunk::Done(response.stats.clone())).await;
        Ok(response)
    }
}
