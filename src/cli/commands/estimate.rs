//! Offline helpers: language detection, token estimates and cost lookups.
//! None of these touch the network.

use anyhow::{Result, bail};

use crate::cli::args::GlobalArgs;
use crate::config::resolve_config;
use crate::input::InputReader;
use crate::translation::{Usage, detect_language, estimate_cost, estimate_tokens, language_name};
use crate::ui::Style;

use super::{load_config_file, resolve_options};
use crate::cli::args::ModelArgs;

fn read_text(text: Option<&str>) -> Result<String> {
    let text = match text {
        Some(text) => text.to_string(),
        None => InputReader::read(None)?,
    };
    if text.trim().is_empty() {
        bail!("Error: Input is empty");
    }
    Ok(text)
}

pub fn run_detect(text: Option<&str>) -> Result<()> {
    let text = read_text(text)?;
    let tag = detect_language(&text);
    println!("{tag}\t{}", language_name(tag));
    Ok(())
}

pub fn run_estimate(text: Option<&str>, model: Option<String>, global: &GlobalArgs) -> Result<()> {
    let text = read_text(text)?;
    let model_args = ModelArgs {
        model,
        ..ModelArgs::default()
    };
    let resolved = resolve_config(&resolve_options(&model_args, None), &load_config_file(global)?)?;

    let tokens = estimate_tokens(&text);
    let cost = estimate_cost(&resolved.registry, &text, &resolved.model);

    println!(
        "{}  {}",
        Style::label("model "),
        Style::value(&resolved.model)
    );
    println!("{}  ~{tokens}", Style::label("tokens"));
    println!("{}  ~{}", Style::label("cost  "), Style::cost(cost));
    Ok(())
}

pub fn run_cost(
    model: Option<String>,
    prompt_tokens: u64,
    completion_tokens: u64,
    global: &GlobalArgs,
) -> Result<()> {
    let model_args = ModelArgs {
        model,
        ..ModelArgs::default()
    };
    let resolved = resolve_config(&resolve_options(&model_args, None), &load_config_file(global)?)?;

    let usage = Usage {
        prompt_tokens,
        completion_tokens,
        total_tokens: prompt_tokens.saturating_add(completion_tokens),
    };
    let cost = resolved
        .registry
        .calculate_cost(Some(&usage), &resolved.model);

    println!("{}", Style::cost(cost));
    Ok(())
}
