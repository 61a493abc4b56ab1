use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

use crate::cli::args::{GlobalArgs, ModelArgs};
use crate::config::resolve_config;
use crate::input::InputReader;
use crate::status;
use crate::translation::{BatchOutcome, TranslationResult, Translator};
use crate::ui::{BatchBar, Style};

use super::translate::with_hint;
use super::{load_config_file, open_history, record_history, resolve_options};

pub struct BatchOptions<'a> {
    pub file: &'a str,
    pub concurrency: Option<usize>,
    pub output: Option<&'a str>,
    pub model: &'a ModelArgs,
}

/// One JSON line per input text in `--output` files.
#[derive(Serialize)]
struct BatchLine<'a> {
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a TranslationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<&'static str>,
}

pub async fn run_batch(options: &BatchOptions<'_>, global: &GlobalArgs) -> Result<()> {
    let config_file = load_config_file(global)?;
    let resolved = resolve_config(
        &resolve_options(options.model, options.concurrency),
        &config_file,
    )?;

    let texts = InputReader::read_lines(Some(options.file))?;
    let translator = Translator::new(resolved.registry.clone());
    let translate_options = resolved.translate_options();

    status!(
        "Translating {} texts with {} ({} at a time)",
        Style::value(texts.len()),
        Style::value(&resolved.model),
        resolved.concurrency
    );

    let bar = BatchBar::new(texts.len());
    let outcome = translator
        .batch_translate_with_progress(
            &texts,
            &translate_options,
            resolved.concurrency,
            |progress| {
                let mark = match progress.outcome {
                    Ok(_) => Style::success("✓"),
                    Err(e) => {
                        bar.println(format!(
                            "{} line {}: {e}",
                            Style::error("✗"),
                            progress.current
                        ));
                        Style::error("✗")
                    }
                };
                bar.advance(format!("{mark} line {}", progress.current));
            },
        )
        .await
        .map_err(with_hint)?;
    bar.finish();

    let history = open_history(options.model.no_history);
    let mut total_cost = 0.0;
    for (_, result) in outcome.results() {
        let cost = translator.calculate_cost(result.usage.as_ref(), &result.model_id);
        total_cost += cost;
        record_history(history.as_ref(), result, cost);
    }

    match options.output {
        Some(path) => {
            write_json_lines(Path::new(path), &outcome)?;
            status!("Results written to {}", Style::secondary(path));
        }
        None => print_results(&outcome),
    }

    status!(
        "{} succeeded, {} failed, total cost {}",
        Style::success(outcome.success_count()),
        if outcome.failure_count() > 0 {
            Style::error(outcome.failure_count())
        } else {
            Style::secondary(0)
        },
        Style::cost(total_cost)
    );

    if outcome.success_count() == 0 {
        anyhow::bail!("Error: Every text in the batch failed");
    }

    Ok(())
}

/// Successful lines go to stdout in input order; failures become empty lines
/// so output stays aligned with input.
fn print_results(outcome: &BatchOutcome) {
    for item in &outcome.items {
        match item {
            Ok(result) => println!("{}", result.translated_text),
            Err(_) => println!(),
        }
    }
}

fn write_json_lines(path: &Path, outcome: &BatchOutcome) -> Result<()> {
    let mut contents = String::new();
    for (index, item) in outcome.items.iter().enumerate() {
        let line = match item {
            Ok(result) => BatchLine {
                line: index + 1,
                result: Some(result),
                error: None,
                error_kind: None,
            },
            Err(e) => BatchLine {
                line: index + 1,
                result: None,
                error: Some(e.to_string()),
                error_kind: Some(e.kind()),
            },
        };
        let json = serde_json::to_string(&line)?;
        let _ = writeln!(contents, "{json}");
    }

    crate::fs::atomic_write(path, &contents)
        .with_context(|| format!("Failed to write results: {}", path.display()))
}
