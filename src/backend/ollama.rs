//! Ollama-backed `LlmClient`: talks to a local `ollama serve` instance over
//! its `/api/generate` endpoint, with retry/backoff on transient errors and
//! SSE-style streaming of newline-delimited JSON chunks.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::client::LlmClient;
use super::error::LlmError;
use super::types::{CompletionResponse, InferenceStats, StreamChunk};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 1000;

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

pub struct OllamaClient {
    http: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { http: Client::builder().timeout(Duration::from_secs(120)).build().expect("client"), base_url: base_url.into() }
    }

    fn request_body(&self, model: &str, system_prompt: Option<&str>, prompt: &str, stream: bool) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "stream": stream,
        });
        if let Some(system) = system_prompt {
            body["system"] = serde_json::json!(system);
        }
        body
    }
}

#[derive(Debug, Deserialize)]
struct OllamaChunk {
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: u64,
    #[serde(default)]
    eval_count: u64,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(
        &self,
        model: &str,
        system_prompt: Option<&str>,
        prompt: &str,
    ) -> Result<CompletionResponse, LlmError> {
        debug!(%model, "OllamaClient::complete");
        let url = format!("{}/api/generate", self.base_url);
        let body = self.request_body(model, system_prompt, prompt, false);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "complete: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self.http.post(&url).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();
            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                last_error = Some(LlmError::ApiError { status, message: text });
                continue;
            }
            if !response.status().is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(LlmError::ApiError { status, message: text });
            }

            let chunk: OllamaChunk = response.json().await?;
            return Ok(CompletionResponse {
                text: chunk.response,
                stats: InferenceStats {
                    prompt_tokens: chunk.prompt_eval_count,
                    completion_tokens: chunk.eval_count,
                    total_tokens: chunk.prompt_eval_count + chunk.eval_count,
                },
            });
        }

        Err(last_error.unwrap_or(LlmError::InvalidResponse("max retries exceeded".into())))
    }

    async fn stream(
        &self,
        model: &str,
        system_prompt: Option<&str>,
        prompt: &str,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError> {
        debug!(%model, "OllamaClient::stream");
        let url = format!("{}/api/generate", self.base_url);
        let body = self.request_body(model, system_prompt, prompt, true);

        let response = self.http.post(&url).json(&body).send().await.map_err(LlmError::Network)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut full_text = String::new();
        let mut stats = InferenceStats::default();

        while let Some(chunk_result) = stream.next().await {
            let bytes = chunk_result.map_err(LlmError::Network)?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].trim().to_string();
                buffer = buffer[line_end + 1..].to_string();
                if line.is_empty() {
                    continue;
                }
                let chunk: OllamaChunk = serde_json::from_str(&line)?;
                if !chunk.response.is_empty() {
                    full_text.push_str(&chunk.response);
                    let _ = chunk_tx.send(StreamChunk::TextDelta(chunk.response.clone())).await;
                }
                if chunk.done {
                    stats = InferenceStats {
                        prompt_tokens: chunk.prompt_eval_count,
                        completion_tokens: chunk.eval_count,
                        total_tokens: chunk.prompt_eval_count + chunk.eval_count,
                    };
                    let _ = chunk_tx.send(StreamChunk::Done(stats.clone())).await;
                }
            }
        }

        Ok(CompletionResponse { text: full_text, stats })
    }
}
