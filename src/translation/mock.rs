//! Scripted transport for exercising the dispatcher without a network.
//!
//! ```ignore
//! let transport = MockTransport::sequence(vec![
//!     Ok(MockTransport::status(429, "")),
//!     Ok(MockTransport::completion("你好", 10, 2)),
//! ]);
//! let translator = Translator::with_transport(ModelRegistry::builtin(), transport);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use super::transport::{ChatCompletionRequest, Transport, TransportError, TransportResponse};

type Reply = Result<TransportResponse, TransportError>;
type Handler = Box<dyn Fn(&RecordedCall) -> Reply + Send + Sync>;

/// One request as the transport saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub api_key: String,
    pub body: serde_json::Value,
}

impl RecordedCall {
    /// Content of the `user` message.
    pub fn user_prompt(&self) -> &str {
        self.message("user")
    }

    pub fn system_prompt(&self) -> &str {
        self.message("system")
    }

    fn message(&self, role: &str) -> &str {
        self.body["messages"]
            .as_array()
            .and_then(|messages| messages.iter().find(|m| m["role"] == role))
            .and_then(|m| m["content"].as_str())
            .unwrap_or_default()
    }
}

enum Mode {
    /// Replies in order; the last one repeats once the queue is down to it.
    Sequence(Mutex<VecDeque<Reply>>),
    Handler(Handler),
}

pub struct MockTransport {
    mode: Mode,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn sequence(replies: Vec<Reply>) -> Self {
        Self {
            mode: Mode::Sequence(Mutex::new(replies.into())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replies computed from each recorded request.
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(&RecordedCall) -> Reply + Send + Sync + 'static,
    {
        Self {
            mode: Mode::Handler(Box::new(handler)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A 200 chat-completion response.
    pub fn completion(content: &str, prompt_tokens: u64, completion_tokens: u64) -> TransportResponse {
        let body = serde_json::json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
            "usage": {
                "prompt_tokens": prompt_tokens,
                "completion_tokens": completion_tokens,
                "total_tokens": prompt_tokens + completion_tokens
            }
        });
        TransportResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            body: body.to_string(),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<TransportResponse, TransportError> {
        let call = RecordedCall {
            url: url.to_string(),
            api_key: api_key.to_string(),
            body: serde_json::to_value(body).map_err(|e| TransportError::Other(e.to_string()))?,
        };

        let reply = match &self.mode {
            Mode::Sequence(queue) => {
                let mut queue = queue.lock().unwrap_or_else(PoisonError::into_inner);
                let next = if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                };
                next.unwrap_or_else(|| Err(TransportError::Other("mock script is empty".to_string())))
            }
            Mode::Handler(handler) => handler(&call),
        };

        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        reply
    }
}
