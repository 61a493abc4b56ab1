//! # clip-tl - LLM Translation CLI
//!
//! `clip-tl` translates text through DeepSeek and OpenAI-compatible chat
//! completion APIs. Before each request it detects the source language,
//! substitutes fixed terminology and builds the prompt; failed requests are
//! retried with backoff and every result carries its token usage and cost.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a file into the default target language (zh)
//! clip-tl ./notes.txt
//!
//! # Translate text with an explicit pair and model
//! clip-tl --text "アバターとは" -f ja -t en -m gpt-4o-mini
//!
//! # Translate a file line by line, three requests at a time
//! clip-tl batch ./lines.txt -c 3
//!
//! # Estimate before sending
//! clip-tl estimate "Hello world" -m gpt-4o
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/clip-tl/config.toml`:
//!
//! ```toml
//! [defaults]
//! model = "deepseek-v3-0324"
//! from = "auto"
//! to = "zh"
//!
//! [keys]
//! deepseek_env = "DEEPSEEK_API_KEY"
//!
//! [terms]
//! "アバター" = "虚拟形象"
//! ```
//!
//! ## Library use
//!
//! [`translation::Translator`] is generic over its [`translation::Transport`],
//! so the whole pipeline runs against [`translation::mock::MockTransport`]
//! without a network.

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and option resolution.
pub mod config;

/// File system utilities.
pub mod fs;

/// Translation history and usage statistics in `SQLite`.
pub mod history;

/// Input reading from files and stdin.
pub mod input;

/// Global output configuration (quiet mode, colors, diagnostics).
pub mod output;

/// XDG-style path utilities for configuration and history.
pub mod paths;

/// Language detection, terminology, prompts, providers, retries and cost.
pub mod translation;

/// Terminal UI components (spinner, progress bar, colors).
pub mod ui;
