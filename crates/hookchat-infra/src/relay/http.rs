//! HttpRelayTransport -- [`RelayTransport`] over HTTP with `reqwest`.
//!
//! Submits with `POST <submit-url>` and polls with
//! `GET <status-url>/<correlation id>`. Every HTTP status is handed back to
//! the caller as a [`RelayResponse`]; only network failures and bodies that
//! claim to be JSON but are not become errors.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::CONTENT_TYPE;

use hookchat_core::relay::body::parse_body;
use hookchat_core::relay::poller::STATUS_PENDING;
use hookchat_core::relay::transport::RelayTransport;
use hookchat_types::config::ClientConfig;
use hookchat_types::error::{ConfigError, RelayError};
use hookchat_types::relay::{CorrelationId, RelayResponse, SubmitRequest};

/// Validated submit and status URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEndpoints {
    submit: Url,
    status: Url,
}

impl RelayEndpoints {
    pub fn new(submit: &str, status: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            submit: parse_endpoint("submit_url", submit)?,
            status: parse_endpoint("status_url", status)?,
        })
    }

    /// Build endpoints from config; the status URL defaults to
    /// `<submit_url>/status`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let submit = config
            .submit_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingSubmitUrl)?;
        let status = config
            .resolved_status_url()
            .ok_or(ConfigError::MissingSubmitUrl)?;
        Self::new(submit, &status)
    }

    pub fn submit_url(&self) -> &Url {
        &self.submit
    }

    /// Status URL for one correlation id, appended as a single
    /// percent-encoded path segment.
    pub fn status_url_for(&self, correlation_id: &CorrelationId) -> Url {
        let mut url = self.status.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(correlation_id.as_str());
        }
        url
    }
}

fn parse_endpoint(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_string()));
    }
    Ok(url)
}

/// Relay client speaking HTTP.
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: reqwest::Client,
    endpoints: RelayEndpoints,
}

impl HttpRelayTransport {
    pub fn new(endpoints: RelayEndpoints, timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &RelayEndpoints {
        &self.endpoints
    }

    /// Turn a `reqwest` response into a [`RelayResponse`].
    ///
    /// Only final 2xx answers have body semantics. A pending 202 and every
    /// error status keep their body as raw text, so an empty or garbled body
    /// never hides the status code.
    async fn read_response(response: reqwest::Response) -> Result<RelayResponse, RelayError> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let raw = response
            .text()
            .await
            .map_err(|e| RelayError::Transport(format!("failed to read response body: {e}")))?;

        if status == STATUS_PENDING || !(200..300).contains(&status) {
            return Ok(RelayResponse::text(status, raw));
        }

        let body = parse_body(content_type.as_deref(), raw)?;
        Ok(RelayResponse { status, body })
    }
}

fn transport_error(err: reqwest::Error) -> RelayError {
    if err.is_timeout() {
        RelayError::Transport("The relay did not answer in time".to_string())
    } else {
        RelayError::Transport(format!("Failed to reach the relay: {err}"))
    }
}

impl RelayTransport for HttpRelayTransport {
    async fn submit(&self, request: &SubmitRequest) -> Result<RelayResponse, RelayError> {
        tracing::debug!(url = %self.endpoints.submit, "posting message to relay");

        let response = self
            .client
            .post(self.endpoints.submit.clone())
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        Self::read_response(response).await
    }

    async fn status(&self, correlation_id: &CorrelationId) -> Result<RelayResponse, RelayError> {
        let url = self.endpoints.status_url_for(correlation_id);
        tracing::trace!(%url, "querying relay status");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        Self::read_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::Router;
    use axum::extract::Path;
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::Json;
    use hookchat_types::chat::{ChatMessage, MessageRole};
    use hookchat_types::relay::{HistoryEntry, ResponseBody};
    use serde_json::{Value, json};

    async fn spawn_relay(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn relay_router() -> Router {
        Router::new()
            .route(
                "/hook",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({
                        "messageId": "m1",
                        "echo": body["message"],
                        "history_len": body["conversation_history"].as_array().map(|h| h.len()),
                        "first_role": body["conversation_history"][0]["role"],
                    }))
                }),
            )
            .route("/plain", post(|| async { "pong" }))
            .route("/limited", post(|| async { StatusCode::TOO_MANY_REQUESTS }))
            .route(
                "/broken",
                post(|| async { ([(header::CONTENT_TYPE, "application/json")], "not json") }),
            )
            .route(
                "/status/{id}",
                get(|Path(id): Path<String>| async move {
                    match id.as_str() {
                        "pending" => StatusCode::ACCEPTED.into_response(),
                        "pending-json" => (
                            StatusCode::ACCEPTED,
                            [(header::CONTENT_TYPE, "application/json")],
                            "",
                        )
                            .into_response(),
                        "plain" => "plain reply".into_response(),
                        "gone" => StatusCode::NOT_FOUND.into_response(),
                        _ => Json(json!({"response": {"content": format!("reply for {id}")}}))
                            .into_response(),
                    }
                }),
            )
    }

    async fn transport_for(path: &str) -> HttpRelayTransport {
        let base = spawn_relay(relay_router()).await;
        let endpoints =
            RelayEndpoints::new(&format!("{base}{path}"), &format!("{base}/status")).unwrap();
        HttpRelayTransport::new(endpoints, Duration::from_secs(5)).unwrap()
    }

    fn request(text: &str) -> SubmitRequest {
        SubmitRequest {
            message: text.to_string(),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            conversation_history: vec![HistoryEntry::from(&ChatMessage::assistant("Hi!"))],
        }
    }

    #[test]
    fn endpoints_from_config_derive_status_url() {
        let config = ClientConfig {
            submit_url: Some("https://hook.example.com/abc".to_string()),
            ..Default::default()
        };
        let endpoints = RelayEndpoints::from_config(&config).unwrap();
        let url = endpoints.status_url_for(&CorrelationId::new("m1").unwrap());
        assert_eq!(url.as_str(), "https://hook.example.com/abc/status/m1");
    }

    #[test]
    fn endpoints_require_submit_url() {
        let err = RelayEndpoints::from_config(&ClientConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSubmitUrl));
    }

    #[test]
    fn endpoints_reject_bad_urls() {
        let err = RelayEndpoints::new("not a url", "https://ok.example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { field: "submit_url", .. }));

        let err = RelayEndpoints::new("https://ok.example.com", "ftp://files.example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { field: "status_url", .. }));
    }

    #[test]
    fn status_url_encodes_the_id() {
        let endpoints =
            RelayEndpoints::new("https://hook.example.com", "https://hook.example.com/status/")
                .unwrap();
        let url = endpoints.status_url_for(&CorrelationId::new("a b/c").unwrap());
        assert_eq!(url.as_str(), "https://hook.example.com/status/a%20b%2Fc");
    }

    #[tokio::test]
    async fn submit_posts_json_and_reads_json_ack() {
        let transport = transport_for("/hook").await;

        let response = transport.submit(&request("hello")).await.unwrap();

        assert_eq!(response.status, 200);
        match response.body {
            ResponseBody::Json(value) => {
                assert_eq!(value["messageId"], "m1");
                assert_eq!(value["echo"], "hello");
                assert_eq!(value["history_len"], 1);
                assert_eq!(value["first_role"], MessageRole::Assistant.to_string());
            }
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn submit_reads_plain_text_as_text() {
        let transport = transport_for("/plain").await;
        let response = transport.submit(&request("ping")).await.unwrap();
        assert_eq!(response, RelayResponse::text(200, "pong"));
    }

    #[tokio::test]
    async fn submit_reports_error_status() {
        let transport = transport_for("/limited").await;
        let response = transport.submit(&request("x")).await.unwrap();
        assert_eq!(response.status, 429);
    }

    #[tokio::test]
    async fn submit_with_malformed_json_is_decode_error() {
        let transport = transport_for("/broken").await;
        let err = transport.submit(&request("x")).await.unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));
    }

    #[tokio::test]
    async fn status_variants() {
        let transport = transport_for("/hook").await;
        let id = |raw: &str| CorrelationId::new(raw).unwrap();

        let pending = transport.status(&id("pending")).await.unwrap();
        assert_eq!(pending.status, 202);

        let pending = transport.status(&id("pending-json")).await.unwrap();
        assert_eq!(pending, RelayResponse::text(202, ""));

        let plain = transport.status(&id("plain")).await.unwrap();
        assert_eq!(plain, RelayResponse::text(200, "plain reply"));

        let gone = transport.status(&id("gone")).await.unwrap();
        assert_eq!(gone.status, 404);

        let json = transport.status(&id("m 1")).await.unwrap();
        assert_eq!(
            json,
            RelayResponse::json(200, json!({"response": {"content": "reply for m 1"}}))
        );
    }

    #[tokio::test]
    async fn unreachable_relay_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoints = RelayEndpoints::new(
            &format!("http://{addr}/hook"),
            &format!("http://{addr}/status"),
        )
        .unwrap();
        let transport = HttpRelayTransport::new(endpoints, Duration::from_secs(2)).unwrap();

        let err = transport.submit(&request("x")).await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
        assert!(!err.user_message().is_empty());
    }
}
