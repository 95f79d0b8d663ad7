//! HTTP surface — health check and the streaming chat endpoint.
//!
//! The chat handler is the only place raw client text is seen. It runs
//! extraction and redaction, then forwards the redacted text alone.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::{AppConfig, CorsPolicy};
use crate::error::RelayError;
use crate::llm::{openai, prompts};
use crate::safety;

/// Shared per-process state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
    #[serde(default)]
    pub session_unlocked: bool,
    #[serde(default)]
    pub video_verified: bool,
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .layer(cors)
        .with_state(state)
}

/// Both policies allow credentials. A literal `*` cannot be sent with
/// credentials, so `Any` echoes the caller's origin, methods, and headers.
fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let origin = match policy {
        CorsPolicy::Any => AllowOrigin::mirror_request(),
        CorsPolicy::Origins(origins) => AllowOrigin::list(origins.clone()),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Response, RelayError> {
    log::info!(
        "[CHAT] user_id={} message={} chars",
        req.user_id,
        req.message.chars().count()
    );

    // Values stay in this process; only their presence is logged.
    let credentials = safety::extract_credentials(&req.message);
    if !credentials.is_empty() {
        log::info!(
            "[SAFETY] Credentials in message (username: {}, password: {}), kept local",
            credentials.username.is_some(),
            credentials.password.is_some()
        );
    }

    let redaction = safety::redact_sensitive_data(&req.message);
    if redaction.has_redactions {
        log::info!("[SAFETY] Redacted {}", redaction.summary());
    }
    log::info!(
        "[AUDIT] Forwarding redacted message sha256={}",
        audit_fingerprint(&redaction.cleaned_text)
    );

    let system_prompt = prompts::build_system_prompt(req.session_unlocked, req.video_verified);
    let messages = prompts::build_messages(&system_prompt, &redaction.cleaned_text);

    let stream = openai::open_chat_stream(&state.client, &state.config, &messages).await?;

    Ok((
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream.into_byte_stream()),
    )
        .into_response())
}

/// Hex SHA-256 of exactly what was sent upstream.
fn audit_fingerprint(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_hex() {
        let a = audit_fingerprint("user=*** pass=***");
        let b = audit_fingerprint("user=*** pass=***");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, audit_fingerprint("user=*** pass=****"));
    }

    #[test]
    fn chat_request_flags_default_to_false() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"user_id":"u1","message":"hello"}"#).unwrap();
        assert_eq!(req.user_id, "u1");
        assert!(!req.session_unlocked);
        assert!(!req.video_verified);
    }

    #[test]
    fn chat_request_requires_message() {
        let parsed = serde_json::from_str::<ChatRequest>(r#"{"user_id":"u1"}"#);
        assert!(parsed.is_err());
    }
}
