mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEEPSEEK_KEY_ENV, DEFAULT_CONCURRENCY, DEFAULT_TARGET_LANGUAGE,
    DefaultsConfig, KeysConfig, OPENAI_KEY_ENV, ResolveOptions, ResolvedConfig, resolve_config,
    starter_terms,
};
