//! NDJSON response stream parsing
//!
//! Ollama streams `/api/chat` responses as one JSON object per line, but the
//! transport delivers bytes in arbitrary chunks. Incoming bytes are buffered
//! and complete lines decoded as they appear; a partial trailing line waits
//! for the rest of it.

use std::collections::VecDeque;
use std::pin::Pin;

use anyhow::Result;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Deserialize;

use super::OllamaError;

/// One decoded line of a streamed chat response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub message: Option<ChunkMessage>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkMessage {
    pub role: String,
    pub content: String,
}

impl ChatChunk {
    /// Incremental content text of this chunk, if any.
    pub fn content(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.content.as_str())
    }
}

pub(crate) fn parse_chunk_stream<S, E>(
    bytes: S,
) -> Pin<Box<dyn Stream<Item = Result<ChatChunk>> + Send>>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(bytes);
        let mut buffer = VecDeque::with_capacity(8192);

        while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    buffer.extend(bytes);

                    while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                        let line_bytes: Vec<u8> = buffer.drain(..=newline_pos).collect();
                        let line = line_bytes.trim_ascii();

                        if line.is_empty() {
                            continue;
                        }

                        // from_slice also rejects invalid UTF-8, so a
                        // garbled line surfaces instead of vanishing.
                        match serde_json::from_slice::<ChatChunk>(line) {
                            Ok(chunk) => yield Ok(chunk),
                            Err(e) => yield Err(OllamaError::Parse(e).into()),
                        }
                    }
                }
                Err(e) => yield Err(anyhow::Error::new(e).context("chat stream failed")),
            }
        }
    })
}
