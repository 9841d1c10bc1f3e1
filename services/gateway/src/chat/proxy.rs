use catena_common::error::CatenaResult;
use catena_render::{render_turn, RenderedTurn};
use serde_json::Value;

use super::validate;
use crate::upstream::CompletionsApi;

/// Orchestrates one chat exchange: validate, call the upstream API once,
/// render the reply into fragments. Stateless between invocations; all
/// conversational memory lives with the client, sent fresh on every call.
pub struct ChatProxy<C: CompletionsApi> {
    upstream: C,
}

impl<C: CompletionsApi> ChatProxy<C> {
    pub fn new(upstream: C) -> Self {
        Self { upstream }
    }

    /// Validation failures return immediately: no partial side effects, no
    /// upstream call.
    pub async fn handle(
        &self,
        api_key: Option<&str>,
        messages: Option<&Value>,
    ) -> CatenaResult<RenderedTurn> {
        let api_key = validate::require_api_key(api_key)?;
        let messages = validate::validate_messages(messages)?;

        let reply = self.upstream.complete(api_key, messages).await?;
        render_turn(&reply)
    }
}
