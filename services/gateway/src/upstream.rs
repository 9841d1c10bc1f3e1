use std::time::Duration;

use async_trait::async_trait;
use catena_common::error::{CatenaError, CatenaResult};
use catena_common::types::ChatApiReply;
use reqwest::Client;
use serde_json::Value;

pub const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";
pub const MODEL: &str = "magisterium-1";

/// Outbound collaborator behind `/api/chat`. Injected into the proxy so
/// request handling can be tested without network access.
#[async_trait]
pub trait CompletionsApi: Send + Sync {
    async fn complete(&self, api_key: &str, messages: &[Value]) -> CatenaResult<ChatApiReply>;
}

/// reqwest-backed client for the remote completions endpoint.
///
/// One attempt per call, bounded by a fixed timeout. No retry: a failed
/// exchange is surfaced to the caller, who may resend.
#[derive(Clone)]
pub struct MagisteriumClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl MagisteriumClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> CatenaResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CatenaError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn classify_transport(&self, err: reqwest::Error) -> CatenaError {
        if err.is_timeout() {
            CatenaError::UpstreamTimeout(self.timeout_secs)
        } else {
            CatenaError::Upstream {
                status: 500,
                detail: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl CompletionsApi for MagisteriumClient {
    async fn complete(&self, api_key: &str, messages: &[Value]) -> CatenaResult<ChatApiReply> {
        let payload = serde_json::json!({
            "model": MODEL,
            "messages": messages,
            "return_related_questions": true,
        });

        let response = self
            .client
            .post(format!("{}{}", self.base_url, COMPLETIONS_PATH))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "upstream returned error status");
            return Err(CatenaError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<ChatApiReply>()
            .await
            .map_err(|e| CatenaError::MalformedReply(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn messages() -> Vec<Value> {
        vec![serde_json::json!({ "role": "user", "content": "Hello" })]
    }

    fn reply_body() -> Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hi there" } }],
            "citations": [],
            "related_questions": ["How are you?"]
        })
    }

    #[tokio::test]
    async fn sends_model_messages_and_related_questions_flag() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .and(body_partial_json(serde_json::json!({
                "model": MODEL,
                "messages": [{ "role": "user", "content": "Hello" }],
                "return_related_questions": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = MagisteriumClient::new(&server.uri(), 5).unwrap();
        let reply = client.complete("sk-test", &messages()).await.unwrap();
        assert_eq!(reply.first_content(), Some("Hi there"));
        assert_eq!(reply.related_questions, vec!["How are you?"]);
    }

    #[tokio::test]
    async fn sends_bearer_credential() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = MagisteriumClient::new(&server.uri(), 5).unwrap();
        client.complete("sk-test", &messages()).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error_with_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = MagisteriumClient::new(&server.uri(), 5).unwrap();
        let err = client.complete("sk-test", &messages()).await.unwrap_err();
        match err {
            CatenaError::Upstream { status, detail } => {
                assert_eq!(status, 502);
                assert_eq!(detail, "bad gateway");
            }
            other => panic!("expected Upstream, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reply_body())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = MagisteriumClient::new(&server.uri(), 1).unwrap();
        let err = client.complete("sk-test", &messages()).await.unwrap_err();
        assert!(matches!(err, CatenaError::UpstreamTimeout(1)));
    }

    #[tokio::test]
    async fn success_status_with_non_json_body_is_malformed_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = MagisteriumClient::new(&server.uri(), 5).unwrap();
        let err = client.complete("sk-test", &messages()).await.unwrap_err();
        assert!(matches!(err, CatenaError::MalformedReply(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_upstream_error() {
        // Port 1 is never listening.
        let client = MagisteriumClient::new("http://127.0.0.1:1", 1).unwrap();
        let err = client.complete("sk-test", &messages()).await.unwrap_err();
        assert!(matches!(
            err,
            CatenaError::Upstream { status: 500, .. } | CatenaError::UpstreamTimeout(_)
        ));
    }
}
