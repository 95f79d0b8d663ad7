//! System prompt for the VaultAI assistant and chat message assembly.

use serde_json::{json, Value};

/// VaultAI instructions. `{UNLOCKED}` and `{VERIFIED}` are filled in per request.
const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are VaultAI. A secure vault assistant.

Rules:
- User secrets (passwords, usernames, IDs) NEVER appear in your output.
- If the user is not UNLOCKED ({UNLOCKED}) or video_verified ({VERIFIED}) == false:
    → Ask them to complete verification.
- You MUST use tools when the user asks to save, retrieve, update, list, or delete.
- You can explain what you're doing in natural language, but do not leak secrets."#;

/// Build the system prompt for one request from the client's session flags.
pub fn build_system_prompt(session_unlocked: bool, video_verified: bool) -> String {
    SYSTEM_PROMPT_TEMPLATE
        .replace("{UNLOCKED}", &session_unlocked.to_string())
        .replace("{VERIFIED}", &video_verified.to_string())
}

/// Two-message conversation: system instructions, then the (already redacted) user text.
pub fn build_messages(system_prompt: &str, safe_message: &str) -> Value {
    json!([
        { "role": "system", "content": system_prompt },
        { "role": "user", "content": safe_message },
    ])
}
