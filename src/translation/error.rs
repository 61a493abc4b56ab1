use thiserror::Error;

use super::models::Provider;

/// Every way a translate call can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// Empty text, unknown model, or an unusable option.
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Missing {provider} API key. Set it in the config file or via the environment")]
    MissingCredential { provider: Provider },

    /// HTTP 401.
    #[error("API key is invalid or has expired")]
    Auth,

    /// HTTP 429 after the retry budget ran out.
    #[error("API rate limit exceeded, please try again later")]
    RateLimit,

    /// HTTP 400, carrying the provider's message verbatim.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP 5xx after the retry budget ran out.
    #[error("Translation service is temporarily unavailable, please try again later")]
    ServiceUnavailable,

    #[error("Request timed out, check your network connection: {0}")]
    Timeout(String),

    /// DNS or connection failure.
    #[error("Cannot reach the translation service, check your network: {0}")]
    Network(String),

    /// Generic failure after the retry budget ran out.
    #[error("Translation failed: {0}")]
    Failed(String),
}

impl TranslateError {
    /// Short machine-friendly name, used in logs and JSON output.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::MissingCredential { .. } => "missing_credential",
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::BadRequest(_) => "bad_request",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Timeout(_) => "timeout",
            Self::Network(_) => "network",
            Self::Failed(_) => "failed",
        }
    }
}

pub type TranslateResult<T> = Result<T, TranslateError>;
