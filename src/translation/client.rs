use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cost::Usage;
use super::error::{TranslateError, TranslateResult};
use super::language::{AUTO, FALLBACK_LANGUAGE, UNKNOWN, detect_language};
use super::models::{DEFAULT_MODEL, ModelRegistry, Provider};
use super::prompt::{PromptTemplate, build_prompt};
use super::retry::{AttemptFailure, DEFAULT_MAX_RETRIES, RetryDecision, classify};
use super::terms::{Terminology, preprocess};
use super::transport::{ChatCompletionRequest, HttpTransport, Transport};

/// One secret per provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub deepseek: Option<String>,
    /// Key for any OpenAI-compatible endpoint.
    pub openai: Option<String>,
}

impl Credentials {
    /// The non-blank key for `provider`, if any.
    pub fn for_provider(&self, provider: Provider) -> Option<&str> {
        let key = match provider {
            Provider::DeepSeek => self.deepseek.as_deref(),
            Provider::OpenAi => self.openai.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }
}

/// Everything about a translate call except the text itself.
///
/// Shared by single and batch calls; nothing here is read from global state.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Source language tag, or `auto` to detect it.
    pub source_lang: String,
    pub target_lang: String,
    /// Registry identifier of the model.
    pub model: String,
    pub credentials: Credentials,
    pub terms: Terminology,
    pub template: Option<PromptTemplate>,
    /// Attempts per call, including the first. Must be at least 1.
    pub max_retries: u32,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            source_lang: AUTO.to_string(),
            target_lang: "zh".to_string(),
            model: DEFAULT_MODEL.to_string(),
            credentials: Credentials::default(),
            terms: Terminology::new(),
            template: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: String,
    /// Text after terminology substitution, as sent to the model.
    pub processed_text: String,
    /// Declared or detected source language.
    pub source_lang: String,
    pub target_lang: String,
    /// Applied substitutions in application order.
    pub replacements: Vec<String>,
    pub usage: Option<Usage>,
    /// Registry identifier of the model.
    pub model_id: String,
    /// Display name of the model.
    pub model: String,
    /// Source and target matched, so no API call was made.
    pub short_circuited: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn parse_completion(body: &str) -> Result<(String, Option<Usage>), AttemptFailure> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| AttemptFailure::InvalidResponse(format!("Malformed API response: {e}")))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            AttemptFailure::InvalidResponse("API response contained no completion".to_string())
        })?;

    Ok((content.trim().to_string(), response.usage))
}

/// Resolves `auto` by detection, falling back to English for unknown scripts.
fn resolve_source_language(text: &str, declared: &str) -> String {
    if declared != AUTO {
        return declared.to_string();
    }
    match detect_language(text) {
        UNKNOWN => FALLBACK_LANGUAGE.to_string(),
        detected => detected.to_string(),
    }
}

/// Dispatches translation requests to the provider that serves each model.
pub struct Translator<T = HttpTransport> {
    registry: ModelRegistry,
    transport: T,
}

impl Translator<HttpTransport> {
    pub fn new(registry: ModelRegistry) -> Self {
        Self::with_transport(registry, HttpTransport::new())
    }
}

impl<T: Transport> Translator<T> {
    pub const fn with_transport(registry: ModelRegistry, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    pub const fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Dollar cost of `usage` on `model_id`; 0 when either is missing.
    pub fn calculate_cost(&self, usage: Option<&Usage>, model_id: &str) -> f64 {
        self.registry.calculate_cost(usage, model_id)
    }

    /// Translates `text`, retrying transient provider failures.
    ///
    /// Validation and credential checks happen before any network call, and a
    /// request whose source and target language match is answered without one.
    pub async fn translate(
        &self,
        text: &str,
        options: &TranslateOptions,
    ) -> TranslateResult<TranslationResult> {
        if text.trim().is_empty() {
            return Err(TranslateError::Validation(
                "text to translate is empty".to_string(),
            ));
        }

        let model = self.registry.get(&options.model).ok_or_else(|| {
            TranslateError::Validation(format!("unknown model '{}'", options.model))
        })?;

        if options.max_retries == 0 {
            return Err(TranslateError::Validation(
                "retry budget must be at least 1".to_string(),
            ));
        }

        let api_key = options
            .credentials
            .for_provider(model.provider)
            .ok_or(TranslateError::MissingCredential {
                provider: model.provider,
            })?;

        let source_lang = resolve_source_language(text, &options.source_lang);

        if source_lang == options.target_lang {
            debug!(lang = %source_lang, "source matches target, skipping API call");
            return Ok(TranslationResult {
                original_text: text.to_string(),
                translated_text: text.to_string(),
                processed_text: text.to_string(),
                source_lang,
                target_lang: options.target_lang.clone(),
                replacements: Vec::new(),
                usage: None,
                model_id: options.model.clone(),
                model: model.name.clone(),
                short_circuited: true,
            });
        }

        let preprocessed = preprocess(text, &options.terms);
        let prompt = build_prompt(
            &preprocessed.text,
            &source_lang,
            &options.target_lang,
            options.template.as_ref(),
        );
        let body = ChatCompletionRequest::new(model.api_model_name(&options.model), &prompt);

        let (translated_text, usage) = self
            .send_with_retry(&model.api_url, api_key, &body, options.max_retries)
            .await?;

        Ok(TranslationResult {
            original_text: text.to_string(),
            translated_text,
            processed_text: preprocessed.text,
            source_lang,
            target_lang: options.target_lang.clone(),
            replacements: preprocessed.replacements,
            usage,
            model_id: options.model.clone(),
            model: model.name.clone(),
            short_circuited: false,
        })
    }

    async fn send_with_retry(
        &self,
        url: &str,
        api_key: &str,
        body: &ChatCompletionRequest<'_>,
        budget: u32,
    ) -> TranslateResult<(String, Option<Usage>)> {
        let mut attempt = 1;
        loop {
            debug!(url, model = body.model, attempt, budget, "sending translation request");

            let failure = match self.attempt(url, api_key, body).await {
                Ok(completion) => return Ok(completion),
                Err(failure) => failure,
            };

            match classify(&failure, attempt, budget) {
                RetryDecision::Retry(delay) => {
                    warn!(attempt, budget, ?delay, error = %failure, "translation attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::Fail(err) => {
                    warn!(attempt, kind = err.kind(), error = %failure, "translation failed");
                    return Err(err);
                }
            }
        }
    }

    async fn attempt(
        &self,
        url: &str,
        api_key: &str,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<(String, Option<Usage>), AttemptFailure> {
        let response = self.transport.post_json(url, api_key, body).await?;

        if !(200..300).contains(&response.status) {
            return Err(AttemptFailure::Status {
                status: response.status,
                body: response.body,
            });
        }

        parse_completion(&response.body)
    }
}
