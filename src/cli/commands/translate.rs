use anyhow::{Result, bail};
use serde::Serialize;

use crate::cli::args::{GlobalArgs, TranslateArgs};
use crate::config::{DEEPSEEK_KEY_ENV, OPENAI_KEY_ENV, resolve_config};
use crate::input::InputReader;
use crate::status;
use crate::translation::{
    Provider, TranslateError, TranslationResult, Translator, language_name,
};
use crate::ui::{Spinner, Style};

use super::{load_config_file, open_history, record_history, resolve_options};

/// JSON shape printed by `--json`.
#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    result: &'a TranslationResult,
    cost: f64,
}

pub async fn run_translate(args: &TranslateArgs, global: &GlobalArgs) -> Result<()> {
    let config_file = load_config_file(global)?;
    let resolved = resolve_config(&resolve_options(&args.model, None), &config_file)?;

    let source_text = match &args.text {
        Some(text) => text.clone(),
        None => InputReader::read(args.file.as_deref())?,
    };

    if source_text.trim().is_empty() {
        bail!("Error: Input is empty");
    }

    let translator = Translator::new(resolved.registry.clone());
    let options = resolved.translate_options();

    let spinner = Spinner::new(&format!("Translating with {}...", resolved.model));
    let outcome = translator.translate(&source_text, &options).await;
    spinner.stop();

    let result = outcome.map_err(with_hint)?;
    let cost = translator.calculate_cost(result.usage.as_ref(), &result.model_id);

    let history = open_history(args.model.no_history);
    record_history(history.as_ref(), &result, cost);

    if args.json {
        let report = Report {
            result: &result,
            cost,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", result.translated_text);
    print_summary(&result, cost);

    Ok(())
}

fn print_summary(result: &TranslationResult, cost: f64) {
    if result.short_circuited {
        status!(
            "{}",
            Style::secondary(format!(
                "Source is already {}, returned unchanged",
                language_name(&result.target_lang)
            ))
        );
        return;
    }

    for replacement in &result.replacements {
        status!("{} {}", Style::label("term"), Style::secondary(replacement));
    }

    let tokens = result.usage.as_ref().map_or(0, |u| u.total_tokens);
    status!(
        "{} {} → {}  {} {}  {} {}",
        Style::label("lang"),
        Style::code(&result.source_lang),
        Style::code(&result.target_lang),
        Style::label("tokens"),
        Style::value(tokens),
        Style::label("cost"),
        Style::cost(cost)
    );
}

/// Adds a remedy to errors the user can fix locally.
pub fn with_hint(error: TranslateError) -> anyhow::Error {
    match &error {
        TranslateError::MissingCredential { provider } => {
            let env_var = match provider {
                Provider::DeepSeek => DEEPSEEK_KEY_ENV,
                Provider::OpenAi => OPENAI_KEY_ENV,
            };
            anyhow::anyhow!(
                "{error}\n\n\
                 Provide it via:\n  \
                 - Environment: export {env_var}=<key>\n  \
                 - Config file: [keys] {} = \"<key>\" in ~/.config/clip-tl/config.toml",
                provider.key()
            )
        }
        TranslateError::Validation(_) => {
            anyhow::anyhow!("{error}\n\nRun 'clip-tl --help' for usage")
        }
        _ => error.into(),
    }
}
