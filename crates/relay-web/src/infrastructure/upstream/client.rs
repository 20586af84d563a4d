//! reqwest-based client for the upstream provider.
//!
//! Every request carries two headers:
//!
//! - `x-api-key: <credential from the settings file>`
//! - `anthropic-version: 2023-06-01`
//!
//! Responses are checked for a 2xx status before decoding; a non-2xx
//! response keeps its body (the provider explains the failure there) in
//! [`UpstreamError::Status`].

use async_trait::async_trait;
use relay_core::protocol::messages::{
    API_KEY_HEADER, API_VERSION, API_VERSION_HEADER, MESSAGES_PATH, MODELS_PATH,
};
use relay_core::{CompletionRequest, MessagesResponse, ModelList};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::upstream::{UpstreamApi, UpstreamError};
use crate::domain::config::UpstreamConfig;

/// Provider client bound to one credential and base URL.
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUpstreamClient {
    /// Builds a client whose every request is authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Transport`] if `api_key` is not a valid
    /// header value or the TLS backend cannot be initialised.
    pub fn new(config: &UpstreamConfig, api_key: &str) -> Result<Self, UpstreamError> {
        let mut key = HeaderValue::from_str(api_key).map_err(|e| UpstreamError::Transport(e.into()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.into()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks the status and decodes the body as `T`.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, UpstreamError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.into()))?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[async_trait]
impl UpstreamApi for HttpUpstreamClient {
    async fn list_models(&self) -> Result<Vec<String>, UpstreamError> {
        let url = self.url(MODELS_PATH);
        debug!(%url, "listing upstream models");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.into()))?;

        let list: ModelList = Self::read_json(response).await?;
        Ok(list.into_ids())
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, UpstreamError> {
        let url = self.url(MESSAGES_PATH);
        let body = request.into_messages_request();
        debug!(%url, model = %body.model, "requesting completion");

        // `.json()` also sets `content-type: application/json`.
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.into()))?;

        let reply: MessagesResponse = Self::read_json(response).await?;
        Ok(reply.text())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::extract::State;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use relay_core::Settings;
    use serde_json::{json, Value};

    /// What the fake provider saw: request headers and JSON bodies.
    #[derive(Default)]
    struct Seen {
        headers: Vec<AxumHeaders>,
        bodies: Vec<Value>,
    }

    type Shared = Arc<Mutex<Seen>>;

    async fn spawn(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    async fn fake_provider(models: Value, reply: Value) -> (SocketAddr, Shared) {
        let seen: Shared = Arc::default();
        let router = Router::new()
            .route(
                "/v1/models",
                get(move |State(seen): State<Shared>, headers: AxumHeaders| {
                    let models = models.clone();
                    async move {
                        seen.lock().unwrap().headers.push(headers);
                        Json(models)
                    }
                }),
            )
            .route(
                "/v1/messages",
                post(
                    move |State(seen): State<Shared>, headers: AxumHeaders, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let mut seen = seen.lock().unwrap();
                            seen.headers.push(headers);
                            seen.bodies.push(body);
                            Json(reply)
                        }
                    },
                ),
            )
            .with_state(seen.clone());
        (spawn(router).await, seen)
    }

    fn client_for(addr: SocketAddr) -> HttpUpstreamClient {
        let config = UpstreamConfig {
            base_url: format!("http://{addr}/"),
            timeout: Duration::from_secs(5),
        };
        HttpUpstreamClient::new(&config, "sk-test").unwrap()
    }

    #[tokio::test]
    async fn test_list_models_sends_auth_headers_and_returns_ids() {
        // Arrange
        let (addr, seen) = fake_provider(
            json!({ "data": [ { "id": "model-a" }, { "id": "model-b" } ] }),
            json!({}),
        )
        .await;

        // Act
        let ids = client_for(addr).list_models().await.unwrap();

        // Assert
        assert_eq!(ids, vec!["model-a", "model-b"]);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.headers[0]["x-api-key"], "sk-test");
        assert_eq!(seen.headers[0]["anthropic-version"], "2023-06-01");
    }

    #[tokio::test]
    async fn test_list_models_without_data_is_empty() {
        let (addr, _) = fake_provider(json!({ "object": "list" }), json!({})).await;

        let ids = client_for(addr).list_models().await.unwrap();

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_complete_posts_single_user_message_and_joins_text() {
        // Arrange
        let (addr, seen) = fake_provider(
            json!({}),
            json!({ "content": [ { "type": "text", "text": "a" }, { "type": "text", "text": "b" } ] }),
        )
        .await;
        let mut settings = Settings::new("sk-test", "model-a");
        settings.instruction = Some("be terse".to_string());
        let request = CompletionRequest::from_settings(&settings, "hello");

        // Act
        let text = client_for(addr).complete(request).await.unwrap();

        // Assert
        assert_eq!(text, "ab");
        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.bodies[0],
            json!({
                "model": "model-a",
                "max_tokens": 1024,
                "temperature": 1.0,
                "messages": [ { "role": "user", "content": "be terse\nhello" } ]
            })
        );
        assert_eq!(seen.headers[0]["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_body() {
        // Arrange
        let router = Router::new().route(
            "/v1/models",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "type": "error", "error": { "message": "invalid x-api-key" } })),
                )
            }),
        );
        let addr = spawn(router).await;

        // Act
        let result = client_for(addr).list_models().await;

        // Assert
        match result {
            Err(UpstreamError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid x-api-key"));
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_decode_error() {
        let router = Router::new().route("/v1/models", get(|| async { "<html>maintenance</html>" }));
        let addr = spawn(router).await;

        let result = client_for(addr).list_models().await;

        assert!(matches!(result, Err(UpstreamError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        // Arrange: bind then drop a listener so the port is (very likely) closed
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        // Act
        let result = client_for(addr).list_models().await;

        // Assert
        assert!(matches!(result, Err(UpstreamError::Transport(_))));
    }

    #[test]
    fn test_api_key_with_newline_is_rejected() {
        let result = HttpUpstreamClient::new(&UpstreamConfig::default(), "bad\nkey");
        assert!(matches!(result, Err(UpstreamError::Transport(_))));
    }
}
