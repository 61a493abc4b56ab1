mod batch;
mod client;
mod cost;
mod error;
mod language;
pub mod mock;
mod models;
mod prompt;
mod retry;
mod terms;
mod transport;

pub use batch::{BatchOutcome, BatchProgress, WINDOW_PACING};
pub use client::{Credentials, TranslateOptions, TranslationResult, Translator};
pub use cost::{Usage, estimate_cost, estimate_tokens};
pub use error::{TranslateError, TranslateResult};
pub use language::{
    AUTO, FALLBACK_LANGUAGE, SUPPORTED_LANGUAGES, UNKNOWN, detect_language, language_name,
    print_languages, validate_language, validate_source_language,
};
pub use models::{DEFAULT_MODEL, ModelDescriptor, ModelRegistry, Provider};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_TEMPLATE, Prompt, PromptTemplate, build_prompt};
pub use retry::{AttemptFailure, DEFAULT_MAX_RETRIES, RetryDecision, classify};
pub use terms::{Preprocessed, Terminology, preprocess};
pub use transport::{
    ChatCompletionRequest, HttpTransport, Message, REQUEST_TIMEOUT, Transport, TransportError,
    TransportResponse,
};
