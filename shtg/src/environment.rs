//! Environment lookups: invoking shell, history locations, preview paths.

use crate::config::Config;
use anyhow::{Context as _, Result};
use shtg_types::{Dialect, ShtgError};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const APP_NAME: &str = "shtg";

/// Guess the dialect from a `$SHELL` value such as `/usr/bin/fish`.
pub fn dialect_of_shell(shell: &str) -> Option<Dialect> {
    let name = Path::new(shell).file_name()?.to_str()?;
    name.parse().ok()
}

/// Pick the dialect: explicit flag, then `$SHELL`, then the config file.
pub fn resolve_dialect(explicit: Option<Dialect>, config: &Config) -> Result<Dialect, ShtgError> {
    if let Some(dialect) = explicit {
        return Ok(dialect);
    }
    let shell = env::var("SHELL").ok();
    resolve_dialect_from(shell.as_deref(), config)
}

fn resolve_dialect_from(shell: Option<&str>, config: &Config) -> Result<Dialect, ShtgError> {
    if let Some(dialect) = shell.and_then(dialect_of_shell) {
        debug!("detected {dialect} from SHELL");
        return Ok(dialect);
    }
    config.default_type.ok_or_else(|| {
        ShtgError::Usage(format!(
            "cannot detect shell type from SHELL={}, use --type zsh|fish",
            shell.unwrap_or_default()
        ))
    })
}

/// The shell's own history location.
pub fn default_history_path(dialect: Dialect) -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;
    Ok(history_path_from(
        dialect,
        env::var("HISTFILE").ok(),
        env::var("XDG_DATA_HOME").ok(),
        &home,
    ))
}

fn history_path_from(
    dialect: Dialect,
    histfile: Option<String>,
    xdg_data_home: Option<String>,
    home: &Path,
) -> PathBuf {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
    match dialect {
        Dialect::Zsh => non_empty(histfile)
            .map(|file| PathBuf::from(shellexpand::tilde(&file).to_string()))
            .unwrap_or_else(|| home.join(".zsh_history")),
        Dialect::Fish => non_empty(xdg_data_home)
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".local/share"))
            .join("fish/fish_history"),
    }
}

/// Resolve the history file: `--path`, then config, then the default.
pub fn resolve_history_path(
    dialect: Dialect,
    flag: Option<&Path>,
    config: &Config,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(PathBuf::from(
            shellexpand::tilde(&path.to_string_lossy()).to_string(),
        ));
    }
    if let Some(path) = config.history_path(dialect) {
        return Ok(path);
    }
    default_history_path(dialect)
}

/// Fixed dry-run output location for a dialect.
pub fn preview_path(dir: &Path, dialect: Dialect) -> PathBuf {
    dir.join(format!("{APP_NAME}_{dialect}_history"))
}
