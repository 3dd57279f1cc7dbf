//! Console output.

use crossterm::style::Stylize;
use shtg_types::Dialect;
use std::fmt::Display;

pub fn info(msg: impl Display) {
    println!("{} {}", "INFO".green().bold(), msg);
}

pub fn warn(msg: impl Display) {
    eprintln!("{} {}", "WARN".yellow().bold(), msg);
}

pub fn error(err: &anyhow::Error) {
    eprintln!("{}: {:#}", "shtg".red().bold(), err);
}

/// Summary line for a store whose length went from `before` to `after`.
pub fn change_summary(dialect: Dialect, before: usize, after: usize) -> String {
    if before > after {
        format!(
            "[{dialect}] Origin {before}, Removed {}, Now {after}",
            before - after
        )
    } else if before < after {
        format!(
            "[{dialect}] Origin {before}, Added {}, Now {after}",
            after - before
        )
    } else {
        format!("[{dialect}] No history changed")
    }
}

pub fn print_changes(dialect: Dialect, before: usize, after: usize) {
    info(change_summary(dialect, before, after));
}
