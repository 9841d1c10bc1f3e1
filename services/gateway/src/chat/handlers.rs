use axum::extract::State;
use axum::Json;
use catena_render::RenderedTurn;

use crate::error::ApiError;
use crate::AppState;

use super::proxy::ChatProxy;
use super::requests::ChatRequest;

pub async fn post_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<RenderedTurn>, ApiError> {
    let message_count = body
        .messages
        .as_ref()
        .and_then(serde_json::Value::as_array)
        .map_or(0, Vec::len);
    tracing::info!(message_count, "chat request");

    let proxy = ChatProxy::new(state.upstream.clone());
    let turn = proxy
        .handle(state.config.api_key.as_deref(), body.messages.as_ref())
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "chat request failed");
            ApiError::new(e, !state.config.is_production())
        })?;

    Ok(Json(turn))
}
