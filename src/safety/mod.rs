//! Safety layer — credential extraction and message redaction.
//!
//! Every chat message passes through redaction before it reaches the
//! hosted LLM. Extracted credentials stay inside the relay.

pub mod extract;
pub mod redact;

pub use extract::{extract_credentials, CredentialPair};
pub use redact::{redact_message, redact_sensitive_data, Redaction, RedactionResult};
