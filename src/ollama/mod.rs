//! Ollama HTTP client
//!
//! Thin client for a locally running Ollama instance. Only the streaming
//! `/api/chat` endpoint is used: the request carries a model identifier and
//! the messages for this turn, and the response arrives as newline-delimited
//! JSON chunks of incremental content.
//!
//! No retry, no timeout: a failed stream ends the current turn and is
//! reported to the caller.

mod stream;

pub use stream::{ChatChunk, ChunkMessage};

use anyhow::Result;
use async_trait::async_trait;
use futures::Stream;
use serde::Serialize;
use std::pin::Pin;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "http://localhost:11434";

#[derive(Debug, Error)]
pub enum OllamaError {
    /// Connection-level failure talking to the local service.
    #[error("request to ollama failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered, but not with a stream.
    #[error("ollama returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// A stream line that was not a valid chunk.
    #[error("malformed stream chunk: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One entry of the `messages` array in a chat request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatChunk>> + Send>>;

/// Seam between the chat loop and the inference service, so the loop can be
/// driven by a scripted stream in tests.
#[async_trait]
pub trait ChatClient {
    /// Issue a streaming chat request. Items are incremental content chunks;
    /// the sequence ends when the model finishes or the connection fails.
    async fn chat_stream(&self, model: &str, messages: Vec<ChatMessage>)
        -> Result<ChunkStream>;
}

pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: host.into(),
        }
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn chat_stream(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<ChunkStream> {
        let payload = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": true,
        });

        let response = self
            .http_client
            .post(format!("{}/api/chat", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(OllamaError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Api { status, body }.into());
        }

        Ok(stream::parse_chunk_stream(response.bytes_stream()))
    }
}
