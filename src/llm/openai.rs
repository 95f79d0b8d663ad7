//! OpenAI-compatible chat-completions client — streaming SSE.
//!
//! Opens a streaming completion with the vault tools attached and turns
//! the upstream SSE body into the plain byte stream the client reads.

use std::collections::VecDeque;
use std::time::Instant;

use bytes::Bytes;
use futures_util::Stream;
use serde_json::{json, Value};

use super::streaming::{self, RelayChunk};
use super::tools;
use crate::config::AppConfig;
use crate::error::RelayError;

/// Longest upstream error body kept in logs and error messages.
const MAX_ERROR_BODY: usize = 500;

/// An accepted upstream response whose body has not been read yet.
pub struct ChatStream {
    response: reqwest::Response,
    started: Instant,
}

/// Request body for a streaming chat completion.
pub fn build_request_body(model: &str, messages: &Value) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "tools": tools::vault_tools(),
        "tool_choice": "auto",
        "stream": true,
    })
}

/// Start a streaming chat completion.
///
/// Resolves once upstream has answered with a success status; the body
/// is consumed later through [`ChatStream::into_byte_stream`].
pub async fn open_chat_stream(
    client: &reqwest::Client,
    config: &AppConfig,
    messages: &Value,
) -> Result<ChatStream, RelayError> {
    let api_key = match config.api_key.as_deref() {
        Some(key) => key,
        None => {
            log::warn!("[LLM] No OPENAI_API_KEY set — refusing chat request");
            return Err(RelayError::MissingApiKey);
        }
    };

    log::info!("[LLM] Provider: openai (streaming)");
    log::info!("[LLM] Model: {}", config.model);

    let started = Instant::now();

    let response = client
        .post(config.chat_completions_url())
        .bearer_auth(api_key)
        .json(&build_request_body(&config.model, messages))
        .send()
        .await
        .map_err(|e| {
            log::error!("[LLM] HTTP request failed: {}", e);
            RelayError::Http(e)
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let body = truncate(&body, MAX_ERROR_BODY);
        log::error!("[LLM] API returned {}: {}", status, body);
        return Err(RelayError::Upstream { status, body });
    }

    log::info!("[LLM] TTFB: {}ms", started.elapsed().as_millis());

    Ok(ChatStream { response, started })
}

impl ChatStream {
    /// Lazy, finite byte stream for the client.
    ///
    /// Ends at `[DONE]` or when upstream closes. A transport error is
    /// yielded once and then the stream ends.
    pub fn into_byte_stream(self) -> impl Stream<Item = Result<Bytes, RelayError>> + Send {
        let state = RelayState {
            response: self.response,
            started: self.started,
            pending: Vec::new(),
            buffer: String::new(),
            queue: VecDeque::new(),
            finished: false,
            ttft_logged: false,
            relayed_bytes: 0,
        };

        futures_util::stream::unfold(state, |mut state| async move {
            loop {
                if let Some(bytes) = state.queue.pop_front() {
                    state.relayed_bytes += bytes.len();
                    return Some((Ok(bytes), state));
                }

                if state.finished {
                    log::info!(
                        "[LLM] Stream complete: {}ms, relayed {} bytes",
                        state.started.elapsed().as_millis(),
                        state.relayed_bytes
                    );
                    return None;
                }

                match state.response.chunk().await {
                    Ok(Some(chunk)) => state.ingest(&chunk),
                    Ok(None) => {
                        // Upstream closed; flush an unterminated final event.
                        state.buffer.push_str("\n\n");
                        state.ingest(&[]);
                        state.finished = true;
                    }
                    Err(e) => {
                        log::error!("[LLM] Stream error: {}", e);
                        state.finished = true;
                        return Some((Err(RelayError::Http(e)), state));
                    }
                }
            }
        })
    }
}

struct RelayState {
    response: reqwest::Response,
    started: Instant,
    pending: Vec<u8>,
    buffer: String,
    queue: VecDeque<Bytes>,
    finished: bool,
    ttft_logged: bool,
    relayed_bytes: usize,
}

impl RelayState {
    /// Decode `chunk`, parse whatever complete events it finishes, and
    /// queue the resulting client chunks.
    fn ingest(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
        // Carriage returns only appear as line terminators in the SSE framing.
        let text = streaming::drain_utf8(&mut self.pending).replace('\r', "");
        self.buffer.push_str(&text);

        for data in streaming::parse_data_events(&mut self.buffer) {
            match streaming::relay_chunk(&data) {
                Ok(Some(RelayChunk::Done)) => {
                    self.finished = true;
                    return;
                }
                Ok(Some(chunk)) => {
                    if !self.ttft_logged {
                        log::info!("[LLM] TTFT: {}ms", self.started.elapsed().as_millis());
                        self.ttft_logged = true;
                    }
                    if let RelayChunk::ToolCall(_) = &chunk {
                        log::info!("[LLM] Model requested a tool call");
                    }
                    if let Some(bytes) = chunk.into_bytes() {
                        self.queue.push_back(bytes);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("[LLM] Skipping unparseable stream event: {}", e);
                }
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
