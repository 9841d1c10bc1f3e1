use catena_common::error::{CatenaError, CatenaResult};
use serde_json::Value;

/// Credential check. Technically a server misconfiguration, but surfaced on
/// the request path as a 400-class error; never retried.
pub fn require_api_key(api_key: Option<&str>) -> CatenaResult<&str> {
    api_key
        .filter(|k| !k.is_empty())
        .ok_or(CatenaError::MissingCredential)
}

/// Payload check: `messages` must be present, an array, and non-empty.
/// Entry shape is left to the upstream API. A JSON `null` counts as absent.
pub fn validate_messages(messages: Option<&Value>) -> CatenaResult<&[Value]> {
    let messages = messages.filter(|v| !v.is_null()).ok_or_else(|| {
        CatenaError::InvalidPayload("messages array is required".to_string())
    })?;

    let messages = messages.as_array().ok_or_else(|| {
        CatenaError::InvalidPayload("messages must be an array".to_string())
    })?;

    if messages.is_empty() {
        return Err(CatenaError::InvalidPayload(
            "messages array cannot be empty".to_string(),
        ));
    }

    Ok(messages)
}
