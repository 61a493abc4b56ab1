//! HTTP boundary for chat-completion requests.
//!
//! The dispatcher only talks to a [`Transport`], so tests can swap the real
//! reqwest client for a scripted one.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;

use super::prompt::Prompt;

/// Per-request timeout for provider calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 600;
const TOP_P: f64 = 0.95;

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<Message<'a>>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message<'a> {
    pub role: &'static str,
    pub content: Cow<'a, str>,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Builds the request body with the fixed sampling settings.
    pub fn new(model: &'a str, prompt: &'a Prompt) -> Self {
        Self {
            model,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Borrowed(&prompt.system),
                },
                Message {
                    role: "user",
                    content: Cow::Borrowed(&prompt.user),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// Raw HTTP outcome: any status, body as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Failures below the HTTP status level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    /// DNS resolution or TCP/TLS connect failure.
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        if err.is_timeout() {
            Self::Timeout(message)
        } else if err.is_connect() {
            Self::Connect(message)
        } else {
            Self::Other(message)
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` as JSON to `url` with bearer authentication.
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<TransportResponse, TransportError>;
}

/// The reqwest-backed transport used outside of tests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}
