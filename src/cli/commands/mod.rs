//! Subcommand implementations.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::{ConfigFile, ConfigManager, ResolveOptions};
use crate::history::HistoryStore;
use crate::translation::TranslationResult;

use super::args::{GlobalArgs, ModelArgs};

/// Batch translation command handler.
pub mod batch;

/// Configure command handler.
pub mod configure;

/// Cost, estimate and detect helpers.
pub mod estimate;

/// History and statistics command handlers.
pub mod history;

/// Model listing command handler.
pub mod models;

/// Single-text translation command handler.
pub mod translate;

/// The config manager for `--config`, or the default location.
pub fn config_manager(global: &GlobalArgs) -> Result<ConfigManager> {
    match &global.config {
        Some(path) => Ok(ConfigManager::with_path(PathBuf::from(path))),
        None => ConfigManager::new(),
    }
}

pub fn load_config_file(global: &GlobalArgs) -> Result<ConfigFile> {
    config_manager(global)?.load_or_default()
}

fn resolve_options(model: &ModelArgs, concurrency: Option<usize>) -> ResolveOptions {
    ResolveOptions {
        from: model.from.clone(),
        to: model.to.clone(),
        model: model.model.clone(),
        max_retries: model.max_retries,
        concurrency,
    }
}

/// Records into history; a broken history database never fails a translation.
fn record_history(store: Option<&HistoryStore>, result: &TranslationResult, cost: f64) {
    if let Some(store) = store
        && let Err(e) = store.record(result, cost)
    {
        crate::warning!("failed to record history: {e:#}");
    }
}

fn open_history(disabled: bool) -> Option<HistoryStore> {
    if disabled {
        return None;
    }
    match HistoryStore::open() {
        Ok(store) => Some(store),
        Err(e) => {
            crate::warning!("history disabled: {e:#}");
            None
        }
    }
}
