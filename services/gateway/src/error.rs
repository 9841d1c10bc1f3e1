use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catena_common::error::CatenaError;

/// Request-boundary error wrapper. Every failure is recovered here: the
/// process never crashes for a single bad exchange.
pub struct ApiError {
    error: CatenaError,
    expose_details: bool,
}

impl ApiError {
    pub fn new(error: CatenaError, expose_details: bool) -> Self {
        Self {
            error,
            expose_details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.error {
            CatenaError::MissingCredential | CatenaError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            CatenaError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            // Timeouts and malformed replies carry no upstream status to forward.
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut body = serde_json::json!({ "error": self.error.to_string() });
        if self.expose_details {
            if let CatenaError::Upstream { detail, .. } = &self.error {
                if !detail.is_empty() {
                    body["details"] = serde_json::json!({ "upstream": detail });
                }
            }
        }

        (status, Json(body)).into_response()
    }
}
