//! XDG-style path utilities for configuration and history.
//!
//! XDG Base Directory conventions are preferred over OS-specific
//! locations on every platform.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "clip-tl";

/// Returns the configuration directory for clip-tl.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/clip-tl` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/clip-tl` otherwise
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Returns the data directory holding the translation history.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/clip-tl` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/clip-tl` otherwise
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn data_dir() -> Result<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share")
}

fn xdg_dir(env_var: &str, fallback: &str) -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var(env_var)
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }
    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(fallback).join(APP_DIR))
}
