use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::paths;
use crate::translation::{
    AUTO, Credentials, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, ModelDescriptor, ModelRegistry,
    PromptTemplate, Terminology, TranslateOptions, validate_language, validate_source_language,
};

/// Environment variable read for the DeepSeek key unless overridden.
pub const DEEPSEEK_KEY_ENV: &str = "DEEPSEEK_API_KEY";
/// Environment variable read for the OpenAI-compatible key unless overridden.
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// Target language used when neither the CLI nor the config file sets one.
pub const DEFAULT_TARGET_LANGUAGE: &str = "zh";
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Starter terminology offered by `configure` when `[terms]` is empty.
pub fn starter_terms() -> Terminology {
    [
        ("アーバンも", "Avamo"),
        ("アバモ", "Avamo"),
        ("エアテレント", "AI Talent"),
        ("ホリプロ", "Horipro"),
        ("クリエイティブチェック", "创意审核"),
        ("アバター", "虚拟形象"),
        ("タレント", "艺人"),
        ("ネイティブチェック", "母语审核"),
    ]
    .into_iter()
    .map(|(source, target)| (source.to_string(), target.to_string()))
    .collect()
}

/// Default settings in the `[defaults]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default model identifier.
    pub model: Option<String>,
    /// Default source language (ISO 639-1 code or `auto`).
    pub from: Option<String>,
    /// Default target language (ISO 639-1 code).
    pub to: Option<String>,
    /// Attempts per translation, including the first.
    pub max_retries: Option<u32>,
    /// Concurrent requests per batch window.
    pub concurrency: Option<usize>,
}

/// API keys in the `[keys]` section.
///
/// Keys stored in the file are plain text; the environment is preferred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepseek: Option<String>,
    /// Environment variable holding the DeepSeek key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepseek_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
    /// Environment variable holding the OpenAI-compatible key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_env: Option<String>,
}

impl KeysConfig {
    /// Resolves both keys, preferring environment variables over the file.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            deepseek: key_from(
                self.deepseek_env.as_deref().unwrap_or(DEEPSEEK_KEY_ENV),
                self.deepseek.as_deref(),
            ),
            openai: key_from(
                self.openai_env.as_deref().unwrap_or(OPENAI_KEY_ENV),
                self.openai.as_deref(),
            ),
        }
    }
}

fn key_from(env_var: &str, stored: Option<&str>) -> Option<String> {
    if let Ok(key) = std::env::var(env_var)
        && !key.trim().is_empty()
    {
        return Some(key);
    }
    stored
        .filter(|key| !key.trim().is_empty())
        .map(str::to_string)
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/clip-tl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub keys: KeysConfig,
    /// Terminology applied before every translation.
    #[serde(default)]
    pub terms: Terminology,
    /// Custom prompt pair replacing the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<PromptTemplate>,
    /// Extra models, or overrides of built-in ones, keyed by identifier.
    #[serde(default)]
    pub models: BTreeMap<String, ModelDescriptor>,
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Source language override.
    pub from: Option<String>,
    /// Target language override.
    pub to: Option<String>,
    /// Model identifier override.
    pub model: Option<String>,
    pub max_retries: Option<u32>,
    pub concurrency: Option<usize>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Built-in models plus those from the config file.
    pub registry: ModelRegistry,
    pub model: String,
    pub source_language: String,
    pub target_language: String,
    pub max_retries: u32,
    pub concurrency: usize,
    pub credentials: Credentials,
    pub terms: Terminology,
    pub prompt: Option<PromptTemplate>,
}

impl ResolvedConfig {
    /// Per-call options for the translator.
    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            source_lang: self.source_language.clone(),
            target_lang: self.target_language.clone(),
            model: self.model.clone(),
            credentials: self.credentials.clone(),
            terms: self.terms.clone(),
            template: self.prompt.clone(),
            max_retries: self.max_retries,
        }
    }
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// Priority: CLI options, then the config file, then built-in defaults.
///
/// # Errors
///
/// Returns an error for unknown models, invalid language codes, or zero
/// retry/concurrency values.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let registry = ModelRegistry::builtin().with_models(config_file.models.clone());

    let model = options
        .model
        .as_ref()
        .or(config_file.defaults.model.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    if !registry.contains(&model) {
        let available: Vec<&str> = registry.iter().map(|(id, _)| id).collect();
        bail!(
            "Model '{model}' not found\n\n\
             Available models:\n  \
             - {}\n\n\
             Run 'clip-tl models' for details, or add models to ~/.config/clip-tl/config.toml",
            available.join("\n  - ")
        );
    }

    let source_language = options
        .from
        .as_ref()
        .or(config_file.defaults.from.as_ref())
        .cloned()
        .unwrap_or_else(|| AUTO.to_string());
    validate_source_language(&source_language)?;

    let target_language = options
        .to
        .as_ref()
        .or(config_file.defaults.to.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string());
    validate_language(&target_language)?;

    let max_retries = options
        .max_retries
        .or(config_file.defaults.max_retries)
        .unwrap_or(DEFAULT_MAX_RETRIES);
    if max_retries == 0 {
        bail!("'max_retries' must be at least 1");
    }

    let concurrency = options
        .concurrency
        .or(config_file.defaults.concurrency)
        .unwrap_or(DEFAULT_CONCURRENCY);
    if concurrency == 0 {
        bail!("'concurrency' must be at least 1");
    }

    Ok(ResolvedConfig {
        registry,
        model,
        source_language,
        target_language,
        max_retries,
        concurrency,
        credentials: config_file.keys.credentials(),
        terms: config_file.terms.clone(),
        prompt: config_file.prompt.clone(),
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/clip-tl/config.toml`
    /// or `~/.config/clip-tl/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// Uses an explicit config file instead of the default location.
    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        crate::fs::atomic_write(&self.config_path, &contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the config file, treating a missing file as empty.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}
