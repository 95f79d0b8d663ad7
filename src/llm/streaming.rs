//! SSE parsing and chunk mapping for the chat-completions stream.
//!
//! Upstream sends `data: {json}` events separated by blank lines and
//! finishes with `data: [DONE]`. Each event is mapped to at most one
//! chunk for the client: plain text, or a `[TOOL_CALL]` marker followed
//! by the tool-call JSON.

use bytes::Bytes;
use serde_json::Value;

/// Prefix written before every tool-call payload in the client stream.
pub const TOOL_CALL_MARKER: &str = "[TOOL_CALL]";

/// Terminal event payload.
pub const DONE_SENTINEL: &str = "[DONE]";

/// What one upstream event turns into on the client side.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayChunk {
    Text(String),
    ToolCall(String),
    Done,
}

impl RelayChunk {
    /// Bytes to write to the client, or `None` for the terminal event.
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            RelayChunk::Text(text) => Some(Bytes::from(text)),
            RelayChunk::ToolCall(payload) => {
                Some(Bytes::from(format!("{}{}", TOOL_CALL_MARKER, payload)))
            }
            RelayChunk::Done => None,
        }
    }
}

/// Move the longest valid UTF-8 prefix out of `pending`.
///
/// A multi-byte character split across network chunks stays in
/// `pending` until the rest of it arrives. Invalid sequences are
/// replaced rather than blocking the stream forever.
pub fn drain_utf8(pending: &mut Vec<u8>) -> String {
    match std::str::from_utf8(pending.as_slice()) {
        Ok(text) => {
            let text = text.to_string();
            pending.clear();
            text
        }
        Err(e) => match e.error_len() {
            // Incomplete trailing character: keep it for the next chunk.
            None => {
                let valid = e.valid_up_to();
                let tail = pending.split_off(valid);
                let text = String::from_utf8_lossy(&pending[..]).into_owned();
                *pending = tail;
                text
            }
            Some(_) => {
                let text = String::from_utf8_lossy(&pending[..]).into_owned();
                pending.clear();
                text
            }
        },
    }
}

/// Parse complete SSE events from a buffer, returning their data payloads.
///
/// Events are separated by `\n\n`. Multiple `data:` lines in one event are
/// joined with `\n`. Comment lines and other fields are ignored.
/// Removes processed events from the buffer.
pub fn parse_data_events(buffer: &mut String) -> Vec<String> {
    let mut events = Vec::new();

    while let Some(pos) = buffer.find("\n\n") {
        let event_block: String = buffer.drain(..pos + 2).collect();

        let data_lines: Vec<&str> = event_block
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|data| data.strip_prefix(' ').unwrap_or(data))
            .collect();

        if !data_lines.is_empty() {
            let data = data_lines.join("\n");
            if !data.is_empty() {
                events.push(data);
            }
        }
    }

    events
}

/// Map one event payload to a client chunk.
///
/// Returns `Ok(None)` for events that carry nothing to relay (role-only
/// deltas, finish markers, usage-only events).
pub fn relay_chunk(data: &str) -> Result<Option<RelayChunk>, serde_json::Error> {
    if data.trim() == DONE_SENTINEL {
        return Ok(Some(RelayChunk::Done));
    }

    let json: Value = serde_json::from_str(data)?;
    let delta = &json["choices"][0]["delta"];

    for key in ["tool_calls", "function_call"] {
        match delta.get(key) {
            Some(call) if !is_empty_call(call) => {
                return Ok(Some(RelayChunk::ToolCall(call.to_string())));
            }
            _ => {}
        }
    }

    match delta["content"].as_str() {
        Some(text) if !text.is_empty() => Ok(Some(RelayChunk::Text(text.to_string()))),
        _ => Ok(None),
    }
}

/// `null` and `[]` both mean the delta carries no tool call.
fn is_empty_call(call: &Value) -> bool {
    call.is_null() || call.as_array().is_some_and(|calls| calls.is_empty())
}
