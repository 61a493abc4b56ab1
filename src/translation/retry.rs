//! Retry policy for provider calls, kept free of I/O so it can be tested directly.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::error::TranslateError;
use super::transport::TransportError;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

const SERVER_ERROR_DELAY: Duration = Duration::from_secs(2);
const GENERIC_DELAY: Duration = Duration::from_secs(1);

/// Why a single attempt did not produce a translation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given delay, then try again.
    Retry(Duration),
    Fail(TranslateError),
}

/// Decides what to do after `failure` on attempt `attempt` (1-based) of `budget`.
pub fn classify(failure: &AttemptFailure, attempt: u32, budget: u32) -> RetryDecision {
    let attempts_left = attempt < budget;

    match failure {
        AttemptFailure::Status { status: 401, .. } => RetryDecision::Fail(TranslateError::Auth),
        AttemptFailure::Status { status: 429, .. } => {
            if attempts_left {
                RetryDecision::Retry(Duration::from_secs(2u64.saturating_pow(attempt)))
            } else {
                RetryDecision::Fail(TranslateError::RateLimit)
            }
        }
        AttemptFailure::Status { status: 400, body } => {
            RetryDecision::Fail(TranslateError::BadRequest(provider_message(body)))
        }
        AttemptFailure::Status { status, .. } if *status >= 500 => {
            if attempts_left {
                RetryDecision::Retry(SERVER_ERROR_DELAY)
            } else {
                RetryDecision::Fail(TranslateError::ServiceUnavailable)
            }
        }
        AttemptFailure::Transport(TransportError::Timeout(message)) => {
            RetryDecision::Fail(TranslateError::Timeout(message.clone()))
        }
        AttemptFailure::Transport(TransportError::Connect(message)) => {
            RetryDecision::Fail(TranslateError::Network(message.clone()))
        }
        other => {
            if attempts_left {
                RetryDecision::Retry(GENERIC_DELAY)
            } else {
                RetryDecision::Fail(TranslateError::Failed(other.to_string()))
            }
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extracts `error.message` from an OpenAI-style error body.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| "unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> AttemptFailure {
        AttemptFailure::Status {
            status: code,
            body: String::new(),
        }
    }

    #[test]
    fn test_401_is_fatal_on_first_attempt() {
        assert_eq!(
            classify(&status(401), 1, 3),
            RetryDecision::Fail(TranslateError::Auth)
        );
    }

    #[test]
    fn test_429_backs_off_exponentially() {
        assert_eq!(
            classify(&status(429), 1, 3),
            RetryDecision::Retry(Duration::from_secs(2))
        );
        assert_eq!(
            classify(&status(429), 2, 3),
            RetryDecision::Retry(Duration::from_secs(4))
        );
        assert_eq!(
            classify(&status(429), 3, 3),
            RetryDecision::Fail(TranslateError::RateLimit)
        );
    }

    #[test]
    fn test_400_carries_provider_message() {
        let failure = AttemptFailure::Status {
            status: 400,
            body: r#"{"error":{"message":"max_tokens is too large","type":"invalid_request_error"}}"#
                .to_string(),
        };
        assert_eq!(
            classify(&failure, 1, 3),
            RetryDecision::Fail(TranslateError::BadRequest(
                "max_tokens is too large".to_string()
            ))
        );
    }

    #[test]
    fn test_400_without_message() {
        let failure = AttemptFailure::Status {
            status: 400,
            body: "<html>bad</html>".to_string(),
        };
        assert_eq!(
            classify(&failure, 1, 3),
            RetryDecision::Fail(TranslateError::BadRequest("unknown error".to_string()))
        );
    }

    #[test]
    fn test_5xx_retries_with_fixed_delay() {
        assert_eq!(
            classify(&status(500), 1, 3),
            RetryDecision::Retry(Duration::from_secs(2))
        );
        assert_eq!(
            classify(&status(503), 2, 3),
            RetryDecision::Retry(Duration::from_secs(2))
        );
        assert_eq!(
            classify(&status(502), 3, 3),
            RetryDecision::Fail(TranslateError::ServiceUnavailable)
        );
    }

    #[test]
    fn test_timeout_and_connect_are_fatal() {
        let timeout = AttemptFailure::Transport(TransportError::Timeout("30s".to_string()));
        assert_eq!(
            classify(&timeout, 1, 3),
            RetryDecision::Fail(TranslateError::Timeout("30s".to_string()))
        );

        let connect = AttemptFailure::Transport(TransportError::Connect("dns".to_string()));
        assert_eq!(
            classify(&connect, 1, 3),
            RetryDecision::Fail(TranslateError::Network("dns".to_string()))
        );
    }

    #[test]
    fn test_other_failures_retry_then_wrap_last_message() {
        let failure = AttemptFailure::InvalidResponse("no choices".to_string());
        assert_eq!(
            classify(&failure, 1, 2),
            RetryDecision::Retry(Duration::from_secs(1))
        );
        assert_eq!(
            classify(&failure, 2, 2),
            RetryDecision::Fail(TranslateError::Failed("no choices".to_string()))
        );

        assert_eq!(
            classify(&status(404), 1, 2),
            RetryDecision::Retry(Duration::from_secs(1))
        );
        assert_eq!(
            classify(&status(404), 2, 2),
            RetryDecision::Fail(TranslateError::Failed(
                "API request failed with status 404: ".to_string()
            ))
        );
    }

    #[test]
    fn test_budget_of_one_never_retries() {
        assert_eq!(
            classify(&status(429), 1, 1),
            RetryDecision::Fail(TranslateError::RateLimit)
        );
        assert_eq!(
            classify(&status(500), 1, 1),
            RetryDecision::Fail(TranslateError::ServiceUnavailable)
        );
    }
}
