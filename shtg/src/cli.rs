use clap::{Parser, Subcommand};
use shtg_types::Dialect;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shtg", author, version, about = "Shell history tool for zsh / fish", long_about = None)]
pub struct Cli {
    /// fish / zsh (defaults to the invoking shell)
    #[arg(short = 't', long = "type", global = true)]
    pub dialect: Option<Dialect>,

    /// Write the result to a preview file instead of the history file
    #[arg(short, long, global = true)]
    pub dry_run: bool,

    /// History file path
    #[arg(short, long, global = true)]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Remove duplicate history
    #[command(visible_alias = "d")]
    Dup,

    /// Remove history which match regex
    #[command(visible_alias = "r")]
    Re { pattern: Option<String> },

    /// Remove history in duration
    #[command(visible_alias = "o")]
    Recent { duration: Option<String> },

    /// Sync history between zsh / fish
    #[command(visible_alias = "s")]
    Sync,
}

impl Commands {
    pub fn usage(&self) -> &'static str {
        match self {
            Commands::Dup => "shtg dup",
            Commands::Re { .. } => "shtg re 'scp xx x:/xxx'",
            Commands::Recent { .. } => "shtg recent 12h",
            Commands::Sync => "shtg sync",
        }
    }
}
