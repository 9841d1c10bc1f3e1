use std::time::Duration;

use async_trait::async_trait;
use catena_common::types::ChatMessage;
use catena_render::RenderedTurn;
use reqwest::Client;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("request timed out")]
    Timeout,

    #[error("network failure: {0}")]
    Network(String),

    #[error("could not parse gateway reply: {0}")]
    Parse(String),

    #[error("gateway error (status {status}): {message}")]
    Gateway { status: u16, message: String },

    #[error("{0}")]
    Unknown(String),
}

/// Outbound collaborator for one turn: the whole history goes out, a
/// pre-rendered turn comes back.
#[async_trait]
pub trait TurnTransport: Send + Sync {
    async fn send(&self, history: &[ChatMessage]) -> Result<RenderedTurn, TurnError>;
}

/// HTTP transport against the gateway's `/api/chat`.
pub struct HttpTurnTransport {
    client: Client,
    base_url: String,
}

impl HttpTurnTransport {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, TurnError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TurnError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn classify(err: reqwest::Error) -> TurnError {
    if err.is_timeout() {
        TurnError::Timeout
    } else if err.is_connect() {
        TurnError::Network(err.to_string())
    } else {
        TurnError::Unknown(err.to_string())
    }
}

#[async_trait]
impl TurnTransport for HttpTurnTransport {
    async fn send(&self, history: &[ChatMessage]) -> Result<RenderedTurn, TurnError> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&serde_json::json!({ "messages": history }))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body["error"]
                .as_str()
                .unwrap_or("request failed")
                .to_string();
            tracing::warn!(status = status.as_u16(), %message, "gateway rejected the turn");
            return Err(TurnError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<RenderedTurn>()
            .await
            .map_err(|e| TurnError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn history() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Hi there"),
            ChatMessage::user("And then?"),
        ]
    }

    fn gateway_reply() -> serde_json::Value {
        serde_json::json!({
            "messageHtml": r#"<div class="message assistant">Then this.</div>"#,
            "citationsHtml": r#"<p class="empty-state">Không có trích dẫn cho câu trả lời này.</p>"#,
            "questionsHtml": r#"<p class="empty-state">Không có câu hỏi liên quan.</p>"#,
            "rawData": {
                "choices": [{ "message": { "role": "assistant", "content": "Then this." } }],
                "citations": [],
                "related_questions": []
            }
        })
    }

    #[tokio::test]
    async fn sends_full_history_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "messages": [
                    { "role": "user", "content": "Hello" },
                    { "role": "assistant", "content": "Hi there" },
                    { "role": "user", "content": "And then?" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(gateway_reply()))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTurnTransport::new(&server.uri(), 5).unwrap();
        let turn = transport.send(&history()).await.unwrap();
        assert!(turn.message_html.contains("Then this."));
        assert_eq!(turn.raw.first_content(), Some("Then this."));
    }

    #[tokio::test]
    async fn gateway_error_carries_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({ "error": "messages array cannot be empty" })),
            )
            .mount(&server)
            .await;

        let transport = HttpTurnTransport::new(&server.uri(), 5).unwrap();
        let err = transport.send(&[]).await.unwrap_err();
        match err {
            TurnError::Gateway { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("empty"));
            }
            other => panic!("expected Gateway, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_gateway_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(gateway_reply())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let transport = HttpTurnTransport::new(&server.uri(), 1).unwrap();
        let err = transport.send(&history()).await.unwrap_err();
        assert!(matches!(err, TurnError::Timeout));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_network_failure() {
        let transport = HttpTurnTransport::new("http://127.0.0.1:1", 1).unwrap();
        let err = transport.send(&history()).await.unwrap_err();
        assert!(matches!(err, TurnError::Network(_) | TurnError::Timeout));
    }

    #[tokio::test]
    async fn bad_reply_shape_is_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let transport = HttpTurnTransport::new(&server.uri(), 5).unwrap();
        let err = transport.send(&history()).await.unwrap_err();
        assert!(matches!(err, TurnError::Parse(_)));
    }
}
