use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::history::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "clip-tl")]
#[command(about = "LLM translation CLI with terminology, retries and cost tracking")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(flatten)]
    pub translate: TranslateArgs,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Flags accepted by every command.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Suppress progress and status output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Show debug diagnostics on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.config/clip-tl/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,
}

/// Overrides shared by `translate` and `batch`.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Source language code, or `auto` to detect
    #[arg(short = 'f', long = "from")]
    pub from: Option<String>,

    /// Target language code (ISO 639-1, e.g., zh, ja, en)
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    /// Model identifier (see `clip-tl models`)
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Attempts per translation, including the first
    #[arg(long = "retries", value_name = "N")]
    pub max_retries: Option<u32>,

    /// Do not record the translation in history
    #[arg(long)]
    pub no_history: bool,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct TranslateArgs {
    /// File to translate, or `-` for stdin (reads stdin if omitted)
    pub file: Option<String>,

    /// Text to translate instead of a file
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a file line by line
    Batch {
        /// File with one text per line, or `-` for stdin
        file: String,

        /// Concurrent requests per window
        #[arg(short = 'c', long)]
        concurrency: Option<usize>,

        /// Write results as JSON lines to this file
        #[arg(short = 'o', long, value_name = "PATH")]
        output: Option<String>,

        #[command(flatten)]
        model: ModelArgs,
    },
    /// Detect the language of a text
    Detect {
        /// Text to inspect (reads stdin if omitted)
        text: Option<String>,
    },
    /// List available models and prices
    Models,
    /// List supported language codes
    Languages,
    /// Compute the cost of a token count
    Cost {
        #[arg(short = 'm', long)]
        model: Option<String>,

        #[arg(long)]
        prompt_tokens: u64,

        #[arg(long)]
        completion_tokens: u64,
    },
    /// Estimate tokens and cost for a text before sending it
    Estimate {
        /// Text to estimate (reads stdin if omitted)
        text: Option<String>,

        #[arg(short = 'm', long)]
        model: Option<String>,
    },
    /// Show recent translations
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,

        #[command(subcommand)]
        command: Option<HistoryCommand>,
    },
    /// Show usage statistics
    Stats,
    /// Configure default settings
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// Delete all history entries (statistics are kept)
    Clear,
    /// Write all history entries to a file
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Destination file
        #[arg(short = 'o', long, value_name = "PATH")]
        output: String,
    },
}
