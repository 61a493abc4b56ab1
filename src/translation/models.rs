//! Model registry: the selectable translation backends, their endpoints and prices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::cost::Usage;

/// API family a model is served by. Decides which credential is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    DeepSeek,
    /// Any OpenAI-compatible endpoint.
    OpenAi,
}

impl Provider {
    pub const fn key(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::OpenAi => "openai",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::DeepSeek => "DeepSeek",
            Self::OpenAi => "OpenAI",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A selectable translation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Human-readable name shown in results and history.
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub provider: Provider,
    /// Full chat-completions URL.
    pub api_url: String,
    /// USD per million prompt tokens.
    pub input_price: f64,
    /// USD per million completion tokens.
    pub output_price: f64,
    /// Model name sent to the API when it differs from the registry key.
    #[serde(default)]
    pub api_model: Option<String>,
}

impl ModelDescriptor {
    /// The `model` field for the request body.
    pub fn api_model_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.api_model.as_deref().unwrap_or(id)
    }

    /// Dollar cost of the given usage at this model's prices.
    pub fn cost(&self, usage: &Usage) -> f64 {
        let input = usage.prompt_tokens as f64 / 1_000_000.0 * self.input_price;
        let output = usage.completion_tokens as f64 / 1_000_000.0 * self.output_price;
        input + output
    }
}

const DEEPSEEK_URL: &str = "https://api.deepseek.com/chat/completions";
const OPENAI_URL: &str = "https://api.openai-proxy.com/v1/chat/completions";

/// Model used when neither the CLI nor the config file picks one.
pub const DEFAULT_MODEL: &str = "deepseek-v3-0324";

struct BuiltinModel {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    provider: Provider,
    api_url: &'static str,
    input_price: f64,
    output_price: f64,
    api_model: Option<&'static str>,
}

const BUILTIN_MODELS: &[BuiltinModel] = &[
    BuiltinModel {
        id: "deepseek-v3-0324",
        name: "DeepSeek V3-0324",
        description: "Latest DeepSeek V3, excellent translation quality",
        provider: Provider::DeepSeek,
        api_url: DEEPSEEK_URL,
        input_price: 0.27,
        output_price: 1.10,
        api_model: Some("deepseek-chat"),
    },
    BuiltinModel {
        id: "deepseek-r1-0528",
        name: "DeepSeek R1-0528",
        description: "DeepSeek reasoning model",
        provider: Provider::DeepSeek,
        api_url: DEEPSEEK_URL,
        input_price: 0.55,
        output_price: 2.19,
        api_model: Some("deepseek-reasoner"),
    },
    BuiltinModel {
        id: "gpt-4o-mini",
        name: "GPT-4o Mini",
        description: "Best value OpenAI model, suited to bulk translation",
        provider: Provider::OpenAi,
        api_url: OPENAI_URL,
        input_price: 0.15,
        output_price: 0.60,
        api_model: None,
    },
    BuiltinModel {
        id: "gpt-4o",
        name: "GPT-4o",
        description: "Strongest OpenAI model, best translation quality",
        provider: Provider::OpenAi,
        api_url: OPENAI_URL,
        input_price: 5.00,
        output_price: 15.00,
        api_model: None,
    },
    BuiltinModel {
        id: "gpt-3.5-turbo",
        name: "GPT-3.5 Turbo",
        description: "Cheapest OpenAI option, good enough for basic text",
        provider: Provider::OpenAi,
        api_url: OPENAI_URL,
        input_price: 0.50,
        output_price: 1.50,
        api_model: None,
    },
    BuiltinModel {
        id: "gpt-4-turbo",
        name: "GPT-4 Turbo",
        description: "High quality, faster than GPT-4",
        provider: Provider::OpenAi,
        api_url: OPENAI_URL,
        input_price: 10.00,
        output_price: 30.00,
        api_model: None,
    },
    BuiltinModel {
        id: "gpt-4",
        name: "GPT-4",
        description: "Classic GPT-4, stable but expensive",
        provider: Provider::OpenAi,
        api_url: OPENAI_URL,
        input_price: 30.00,
        output_price: 60.00,
        api_model: None,
    },
];

/// Immutable lookup table from model identifier to descriptor.
///
/// Built once at start-up and shared read-only by every translate call.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelDescriptor>,
}

impl ModelRegistry {
    /// The built-in DeepSeek and OpenAI models.
    pub fn builtin() -> Self {
        let models = BUILTIN_MODELS
            .iter()
            .map(|m| {
                (
                    m.id.to_string(),
                    ModelDescriptor {
                        name: m.name.to_string(),
                        description: m.description.to_string(),
                        provider: m.provider,
                        api_url: m.api_url.to_string(),
                        input_price: m.input_price,
                        output_price: m.output_price,
                        api_model: m.api_model.map(str::to_string),
                    },
                )
            })
            .collect();
        Self { models }
    }

    /// Adds models, replacing built-in entries with the same identifier.
    #[must_use]
    pub fn with_models<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (String, ModelDescriptor)>,
    {
        self.models.extend(extra);
        self
    }

    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    /// Models sorted by identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelDescriptor)> {
        self.models.iter().map(|(id, m)| (id.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Dollar cost of `usage` for `model_id`.
    ///
    /// Returns 0 when usage is absent or the model is unknown.
    pub fn calculate_cost(&self, usage: Option<&Usage>, model_id: &str) -> f64 {
        match (usage, self.get(model_id)) {
            (Some(usage), Some(model)) => model.cost(usage),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_contents() {
        let registry = ModelRegistry::builtin();
        assert_eq!(registry.len(), 7);
        assert!(registry.contains(DEFAULT_MODEL));

        let v3 = registry.get("deepseek-v3-0324").unwrap();
        assert_eq!(v3.provider, Provider::DeepSeek);
        assert_eq!(v3.api_model_name("deepseek-v3-0324"), "deepseek-chat");

        let mini = registry.get("gpt-4o-mini").unwrap();
        assert_eq!(mini.provider, Provider::OpenAi);
        assert_eq!(mini.api_model_name("gpt-4o-mini"), "gpt-4o-mini");
    }

    #[test]
    fn test_with_models_overrides_and_adds() {
        let custom = ModelDescriptor {
            name: "Local".to_string(),
            description: String::new(),
            provider: Provider::OpenAi,
            api_url: "http://localhost:8080/v1/chat/completions".to_string(),
            input_price: 0.0,
            output_price: 0.0,
            api_model: Some("qwen2.5".to_string()),
        };
        let mut moved_gpt4 = ModelRegistry::builtin().get("gpt-4").cloned().unwrap();
        moved_gpt4.api_url = "https://example.com/v1/chat/completions".to_string();

        let registry = ModelRegistry::builtin().with_models([
            ("local".to_string(), custom),
            ("gpt-4".to_string(), moved_gpt4),
        ]);

        assert_eq!(registry.len(), 8);
        assert_eq!(registry.get("local").unwrap().name, "Local");
        assert_eq!(
            registry.get("gpt-4").unwrap().api_url,
            "https://example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_provider_serde_keys() {
        let json = serde_json::to_string(&Provider::DeepSeek).unwrap();
        assert_eq!(json, "\"deepseek\"");
        let parsed: Provider = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(parsed, Provider::OpenAi);
        assert_eq!(Provider::OpenAi.key(), "openai");
    }
}
