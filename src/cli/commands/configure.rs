//! Configure command handler for editing default settings.

use anyhow::Result;
use inquire::{Confirm, Select};

use crate::cli::args::GlobalArgs;
use crate::config::{ConfigFile, DEFAULT_TARGET_LANGUAGE, DefaultsConfig, starter_terms};
use crate::translation::{AUTO, DEFAULT_MODEL, ModelRegistry, SUPPORTED_LANGUAGES};
use crate::ui::{Style, handle_prompt_cancellation};

use super::config_manager;

/// Interactively sets the default model, source and target language.
pub fn run_configure(global: &GlobalArgs) -> Result<()> {
    handle_prompt_cancellation(|| run_configure_inner(global))
}

fn run_configure_inner(global: &GlobalArgs) -> Result<()> {
    let manager = config_manager(global)?;
    let mut config = manager.load_or_default()?;

    print_current_defaults(&config);

    let registry = ModelRegistry::builtin().with_models(config.models.clone());
    let model_ids: Vec<String> = registry.iter().map(|(id, _)| id.to_string()).collect();
    let model = select_option(
        "Default model:",
        &model_ids,
        config.defaults.model.as_deref().or(Some(DEFAULT_MODEL)),
    )?;

    let from = select_language(
        "Default source language:",
        true,
        config.defaults.from.as_deref().or(Some(AUTO)),
    )?;
    let to = select_language(
        "Default target language:",
        false,
        config
            .defaults
            .to
            .as_deref()
            .or(Some(DEFAULT_TARGET_LANGUAGE)),
    )?;

    config.defaults = DefaultsConfig {
        model: Some(model),
        from: Some(from),
        to: Some(to),
        ..config.defaults
    };

    if config.terms.is_empty()
        && Confirm::new("Add the starter terminology (アバター → 虚拟形象, ...)?")
            .with_default(false)
            .prompt()?
    {
        config.terms = starter_terms();
    }

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );

    Ok(())
}

/// Prints the config file path and the effective defaults.
pub fn show_config(global: &GlobalArgs) -> Result<()> {
    let manager = config_manager(global)?;
    let config = manager.load_or_default()?;

    println!(
        "{} {}\n",
        Style::label("file"),
        Style::secondary(manager.config_path().display())
    );
    print_current_defaults(&config);

    let credentials = config.keys.credentials();
    println!("{}", Style::header("API keys"));
    for (name, key) in [
        ("deepseek", &credentials.deepseek),
        ("openai", &credentials.openai),
    ] {
        println!(
            "  {:9} {}",
            Style::label(name),
            if key.is_some() {
                Style::success("(set)")
            } else {
                Style::secondary("(not set)")
            }
        );
    }

    println!();
    println!(
        "{} {}  {} {}  {} {}",
        Style::label("terms"),
        config.terms.len(),
        Style::label("custom models"),
        config.models.len(),
        Style::label("custom prompt"),
        if config.prompt.is_some() { "yes" } else { "no" }
    );

    Ok(())
}

fn print_current_defaults(config: &ConfigFile) {
    let shown = |value: Option<&str>| value.map_or_else(|| Style::secondary("(not set)"), Style::value);
    let defaults = &config.defaults;

    println!("{}", Style::header("Current defaults"));
    println!("  {}        {}", Style::label("model"), shown(defaults.model.as_deref()));
    println!("  {}         {}", Style::label("from"), shown(defaults.from.as_deref()));
    println!("  {}           {}", Style::label("to"), shown(defaults.to.as_deref()));
    println!(
        "  {}  {}",
        Style::label("max_retries"),
        defaults
            .max_retries
            .map_or_else(|| Style::secondary("(not set)"), Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("concurrency"),
        defaults
            .concurrency
            .map_or_else(|| Style::secondary("(not set)"), Style::value)
    );
    println!();
}

fn select_option(message: &str, options: &[String], default: Option<&str>) -> Result<String> {
    let default_index = default
        .and_then(|d| options.iter().position(|o| o == d))
        .unwrap_or(0);

    let selection = Select::new(message, options.to_vec())
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection)
}

fn select_language(message: &str, allow_auto: bool, default: Option<&str>) -> Result<String> {
    // "code - Name"
    let mut options: Vec<String> = Vec::new();
    if allow_auto {
        options.push(format!("{AUTO} - Auto-detect"));
    }
    options.extend(
        SUPPORTED_LANGUAGES
            .iter()
            .map(|(code, name)| format!("{code} - {name}")),
    );

    let default_prefix = default.map(|d| format!("{d} - "));
    let default_index = default_prefix
        .and_then(|prefix| options.iter().position(|o| o.starts_with(&prefix)))
        .unwrap_or(0);

    let selection = Select::new(message, options)
        .with_starting_cursor(default_index)
        .prompt()?;

    let code = selection.split(" - ").next().unwrap_or(&selection);
    Ok(code.to_string())
}
