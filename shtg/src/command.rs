//! Subcommand implementations.

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::environment::{preview_path, resolve_dialect, resolve_history_path};
use crate::output;
use anyhow::Result;
use shtg_history::{Destination, HistoryStore, Transform, current_time_secs};
use shtg_types::{Dialect, ShtgError, ShtgResult};
use std::path::Path;
use tracing::debug;

/// Global flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Options<'a> {
    pub dialect: Option<Dialect>,
    pub dry_run: bool,
    pub path: Option<&'a Path>,
}

impl<'a> From<&'a Cli> for Options<'a> {
    fn from(cli: &'a Cli) -> Self {
        Options {
            dialect: cli.dialect,
            dry_run: cli.dry_run,
            path: cli.path.as_deref(),
        }
    }
}

pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let options = Options::from(cli);
    match &cli.command {
        Commands::Sync => sync(&options, config),
        command => match transform_for(command)? {
            Some(transform) => tidy(&options, config, &transform),
            None => {
                output::warn(format!("Usage: {}", command.usage()));
                Ok(())
            }
        },
    }
}

/// The filter a subcommand runs, or `None` when its argument is missing.
fn transform_for(command: &Commands) -> ShtgResult<Option<Transform>> {
    match command {
        Commands::Dup => Ok(Some(Transform::Dedup)),
        Commands::Re { pattern } => pattern.as_deref().map(Transform::pattern).transpose(),
        Commands::Recent { duration } => duration.as_deref().map(Transform::recency).transpose(),
        Commands::Sync => Ok(None),
    }
}

fn destination(options: &Options, config: &Config, dialect: Dialect) -> Destination {
    if options.dry_run {
        let path = preview_path(&config.dry_run_dir(), dialect);
        output::info(format!("output: {}", path.display()));
        Destination::Preview(path)
    } else {
        Destination::Real
    }
}

fn open(dialect: Dialect, flag: Option<&Path>, config: &Config) -> Result<HistoryStore> {
    let path = resolve_history_path(dialect, flag, config)?;
    let mut store = HistoryStore::new(dialect, path);
    store.read()?;
    Ok(store)
}

/// Filter the history of one shell.
pub fn tidy(options: &Options, config: &Config, transform: &Transform) -> Result<()> {
    let dialect = resolve_dialect(options.dialect, config)?;
    let mut store = open(dialect, options.path, config)?;

    let before = store.len()?;
    store.apply(transform, current_time_secs())?;
    let after = store.len()?;
    output::print_changes(dialect, before, after);

    let destination = destination(options, config, dialect);
    store.write(&destination)?;
    Ok(())
}

/// Make zsh and fish history contain the same commands.
pub fn sync(options: &Options, config: &Config) -> Result<()> {
    if options.path.is_some() && options.dialect.is_none() {
        return Err(ShtgError::Usage(
            "sync needs --type to know which history --path refers to".to_string(),
        )
        .into());
    }
    let path_for = |dialect: Dialect| options.path.filter(|_| options.dialect == Some(dialect));

    let mut zsh = open(Dialect::Zsh, path_for(Dialect::Zsh), config)?;
    let mut fish = open(Dialect::Fish, path_for(Dialect::Fish), config)?;

    let fish_before = fish.len()?;
    let zsh_before = zsh.len()?;
    fish.combine(&zsh)?;
    zsh.combine(&fish)?;
    output::print_changes(Dialect::Fish, fish_before, fish.len()?);
    output::print_changes(Dialect::Zsh, zsh_before, zsh.len()?);

    for store in [&mut fish, &mut zsh] {
        let destination = destination(options, config, store.dialect());
        let written = store.write(&destination)?;
        debug!("{} history written to {}", store.dialect(), written.display());
    }
    Ok(())
}
