use serde::Deserialize;
use serde_json::Value;

/// Inbound chat payload. `messages` stays raw JSON so a wrong-typed field
/// reaches the validator and comes back as a 400 `{error}` body instead of
/// being bounced by the deserializer. Entries are forwarded to the upstream
/// API verbatim; the upstream rejects malformed entries and that rejection
/// is surfaced as an upstream error.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Value>,
}
