//! Model listing command handler.

use anyhow::Result;

use crate::cli::args::GlobalArgs;
use crate::config::ConfigFile;
use crate::translation::{DEFAULT_MODEL, ModelRegistry};
use crate::ui::Style;

use super::load_config_file;

/// Prints every model with its provider, prices and key status.
pub fn print_models(global: &GlobalArgs) -> Result<()> {
    let config = load_config_file(global)?;
    let registry = ModelRegistry::builtin().with_models(config.models.clone());
    print_registry(&registry, &config);
    Ok(())
}

fn print_registry(registry: &ModelRegistry, config: &ConfigFile) {
    let default_model = config.defaults.model.as_deref().unwrap_or(DEFAULT_MODEL);
    let credentials = config.keys.credentials();

    println!(
        "{}\n",
        Style::header("Available models (USD per 1M tokens, input/output)")
    );
    for (id, model) in registry.iter() {
        let marker = if id == default_model {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        };
        println!("  {}{marker}", Style::value(id));
        println!(
            "    {} {}  {} ${}/${}",
            Style::label("provider"),
            model.provider.display_name(),
            Style::label("price"),
            model.input_price,
            model.output_price
        );
        if !model.description.is_empty() {
            println!("    {}", Style::secondary(&model.description));
        }
        if credentials.for_provider(model.provider).is_none() {
            println!(
                "    {}",
                Style::warning(format!("no {} API key configured", model.provider.key()))
            );
        }
    }
}
