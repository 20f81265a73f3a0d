//! Transport adapter for the remote chat endpoint.
//!
//! One request per turn: `POST {"message": ...}`, read `{"response": ...}`
//! back. No history is sent, nothing is retried.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Uniform failure of a chat round-trip.
///
/// The variants exist for logs only; callers must not pick user-facing
/// text based on them.
#[derive(Debug, Error)]
pub enum ChatTransportError {
    /// The request could not be sent or the connection failed.
    #[error("chat request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered outside the 2xx range.
    #[error("chat endpoint returned status {0}")]
    Status(u16),

    /// The body was not JSON or lacked a `response` string.
    #[error("malformed chat response: {0}")]
    Payload(String),
}

/// Request body sent to the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Trimmed user text.
    pub message: String,
}

/// Success body returned by the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant text, markdown formatted.
    pub response: String,
}

/// Performs a single exchange with the remote chat endpoint.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one user message and return the assistant text.
    async fn send(&self, message: &str) -> Result<String, ChatTransportError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpChatTransport {
    /// Build a transport posting to `base_url` joined with `path`.
    ///
    /// `path` is appended below `base_url`, so a base of
    /// `http://host/v1` with `/api/chat` posts to `http://host/v1/api/chat`.
    ///
    /// `timeout` is `None` unless explicitly configured, so a turn waits
    /// for the endpoint to settle.
    pub fn new(
        base_url: &str,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, url::ParseError> {
        let endpoint = endpoint_url(base_url, path)?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        // Builder only fails on TLS backend init; fall back to the default client.
        let http = builder.build().unwrap_or_else(|_| reqwest::Client::new());
        Ok(Self { http, endpoint })
    }

    /// Build with a caller-provided client.
    #[must_use]
    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// Resolved endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Join `path` under `base_url` without dropping the base's own path.
fn endpoint_url(base_url: &str, path: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(path.trim_start_matches('/'))
}

#[async_trait::async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, message: &str) -> Result<String, ChatTransportError> {
        let body = ChatRequest {
            message: message.to_string(),
        };

        let resp = self.http.post(self.endpoint.clone()).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChatTransportError::Status(status.as_u16()));
        }

        let bytes = resp.bytes().await?;
        let reply: ChatReply = serde_json::from_slice(&bytes)
            .map_err(|e| ChatTransportError::Payload(e.to_string()))?;

        tracing::debug!(
            name: "chat.transport.reply",
            endpoint = %self.endpoint,
            response_length = reply.response.len(),
            "Chat endpoint replied"
        );

        Ok(reply.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let t = HttpChatTransport::new("http://127.0.0.1:5000", "/api/chat", None).unwrap();
        assert_eq!(t.endpoint().as_str(), "http://127.0.0.1:5000/api/chat");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let t = HttpChatTransport::new("http://127.0.0.1:5000/v1", "/api/chat", None).unwrap();
        assert_eq!(t.endpoint().as_str(), "http://127.0.0.1:5000/v1/api/chat");

        let t = HttpChatTransport::new("http://127.0.0.1:5000/v1/", "api/chat", None).unwrap();
        assert_eq!(t.endpoint().as_str(), "http://127.0.0.1:5000/v1/api/chat");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpChatTransport::new("not a url", "/api/chat", None).is_err());
    }

    #[test]
    fn test_reply_requires_response_field() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"answer":"hi"}"#).is_err());
        assert!(serde_json::from_str::<ChatReply>(r#"{"response":null}"#).is_err());
        let ok: ChatReply = serde_json::from_str(r#"{"response":"hi"}"#).unwrap();
        assert_eq!(ok.response, "hi");
    }
}
