//! Vault tool declarations offered to the model.
//!
//! These are schemas only. The relay never executes them: a tool call
//! is streamed back to the client, which owns the actual vault.

use serde_json::{json, Value};
use std::sync::LazyLock;

static VAULT_TOOLS: LazyLock<Value> = LazyLock::new(|| {
    json!([
        function(
            "save_secret",
            "Save a login/password/ID/note into the user's encrypted vault.",
            json!({
                "type": "object",
                "properties": {
                    "secret_type": { "type": "string" },
                    "service": { "type": "string" },
                    "fields": { "type": "object" },
                },
                "required": ["secret_type", "service", "fields"],
            }),
        ),
        function(
            "retrieve_secret",
            "Retrieve a user record by service name.",
            json!({
                "type": "object",
                "properties": { "service": { "type": "string" } },
                "required": ["service"],
            }),
        ),
        function(
            "list_secrets",
            "List all stored services/logins/IDs for this user.",
            json!({ "type": "object", "properties": {} }),
        ),
        function(
            "generate_password",
            "Generate a strong password.",
            json!({
                "type": "object",
                "properties": { "length": { "type": "number", "default": 16 } },
            }),
        ),
    ])
});

fn function(name: &str, description: &str, parameters: Value) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": name,
            "description": description,
            "parameters": parameters,
        }
    })
}

/// The `tools` array sent with every chat-completions request.
pub fn vault_tools() -> &'static Value {
    &VAULT_TOOLS
}

/// Names of the declared tools, in declaration order.
pub fn tool_names() -> Vec<&'static str> {
    VAULT_TOOLS
        .as_array()
        .map(|tools| {
            tools
                .iter()
                .filter_map(|t| t["function"]["name"].as_str())
                .collect()
        })
        .unwrap_or_default()
}
