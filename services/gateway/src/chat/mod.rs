pub mod handlers;
pub mod proxy;
pub mod requests;
pub mod validate;

use axum::routing::post;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/chat", post(handlers::post_chat))
}
