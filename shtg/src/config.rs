use crate::environment::APP_NAME;
use anyhow::{Context as _, Result};
use serde::Deserialize;
use shtg_types::Dialect;
use std::path::PathBuf;
use tracing::debug;

pub const CONFIG_FILE: &str = "config.toml";

/// Optional settings from `$XDG_CONFIG_HOME/shtg/config.toml`.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Dialect used when the invoking shell is neither zsh nor fish.
    pub default_type: Option<Dialect>,
    pub zsh_history: Option<String>,
    pub fish_history: Option<String>,
    /// Directory receiving dry-run previews.
    pub dry_run_dir: Option<String>,
}

impl Config {
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str).context("failed to parse config")?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults when there is none.
    pub fn load() -> Result<Self> {
        let xdg_dir =
            xdg::BaseDirectories::with_prefix(APP_NAME).context("failed get xdg directory")?;
        let Some(file_path) = xdg_dir.find_config_file(CONFIG_FILE) else {
            return Ok(Config::default());
        };
        debug!("loading config from {}", file_path.display());
        let toml_str = std::fs::read_to_string(&file_path)
            .with_context(|| format!("failed to read {}", file_path.display()))?;
        Config::from_toml(&toml_str).with_context(|| file_path.display().to_string())
    }

    /// Configured history file for a dialect, with `~` expanded.
    pub fn history_path(&self, dialect: Dialect) -> Option<PathBuf> {
        let path = match dialect {
            Dialect::Zsh => self.zsh_history.as_deref(),
            Dialect::Fish => self.fish_history.as_deref(),
        }?;
        Some(PathBuf::from(shellexpand::tilde(path).to_string()))
    }

    pub fn dry_run_dir(&self) -> PathBuf {
        match &self.dry_run_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).to_string()),
            None => std::env::temp_dir(),
        }
    }
}
