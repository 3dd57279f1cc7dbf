use crate::ShtgError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Supported history file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Line oriented zsh history, optionally with `: <when>:<elapsed>;` metadata.
    Zsh,
    /// Block structured fish history (`- cmd:` / `when:` / `paths:`).
    Fish,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Zsh, Dialect::Fish];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Zsh => "zsh",
            Dialect::Fish => "fish",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = ShtgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zsh" => Ok(Dialect::Zsh),
            "fish" => Ok(Dialect::Fish),
            _ => Err(ShtgError::UnknownDialect(s.to_string())),
        }
    }
}
