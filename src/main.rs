use anyhow::Result;
use clap::Parser;

use clip_tl::cli::commands::{batch, configure, estimate, history, models, translate};
use clip_tl::cli::{Args, Command, HistoryCommand};
use clip_tl::output::{self, OutputConfig};
use clip_tl::translation::print_languages;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.global.quiet,
        no_color: args.global.no_color || std::env::var("NO_COLOR").is_ok(),
        verbose: args.global.verbose,
    });

    let global = &args.global;

    match args.command {
        Some(Command::Batch {
            file,
            concurrency,
            output,
            model,
        }) => {
            let options = batch::BatchOptions {
                file: &file,
                concurrency,
                output: output.as_deref(),
                model: &model,
            };
            batch::run_batch(&options, global).await?;
        }
        Some(Command::Detect { text }) => {
            estimate::run_detect(text.as_deref())?;
        }
        Some(Command::Models) => {
            models::print_models(global)?;
        }
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Cost {
            model,
            prompt_tokens,
            completion_tokens,
        }) => {
            estimate::run_cost(model, prompt_tokens, completion_tokens, global)?;
        }
        Some(Command::Estimate { text, model }) => {
            estimate::run_estimate(text.as_deref(), model, global)?;
        }
        Some(Command::History {
            command: Some(HistoryCommand::Clear),
            ..
        }) => {
            history::clear_history()?;
        }
        Some(Command::History {
            command: Some(HistoryCommand::Export { format, output }),
            ..
        }) => {
            history::export_history(format, &output)?;
        }
        Some(Command::History {
            limit,
            command: None,
        }) => {
            history::print_history(limit)?;
        }
        Some(Command::Stats) => {
            history::print_statistics()?;
        }
        Some(Command::Configure { show }) => {
            if show {
                configure::show_config(global)?;
            } else {
                configure::run_configure(global)?;
            }
        }
        None => {
            translate::run_translate(&args.translate, global).await?;
        }
    }

    Ok(())
}
