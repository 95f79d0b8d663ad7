//! LLM integration — prompt and tool-schema assembly, the upstream
//! chat-completions call, and SSE stream relaying.

pub mod openai;
pub mod prompts;
pub mod streaming;
pub mod tools;
