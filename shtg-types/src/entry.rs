//! Entry structure for shell history.
//!
//! An entry holds the fields both dialects understand plus an [`Extra`] slot
//! with whatever the owning dialect's grammar carries beyond them.

use crate::Dialect;

/// A single logical history record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The command text with continuations joined and escapes decoded.
    pub command: String,
    /// Unix timestamp when the command was executed.
    pub timestamp: Option<i64>,
    /// Seconds the command ran.
    pub duration: Option<i64>,
    pub extra: Extra,
    /// Which dialect produced this entry's shape.
    pub dialect: Dialect,
}

/// Dialect-only payload of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Extra {
    /// Nothing beyond the common fields; the codec synthesizes a record.
    #[default]
    None,
    Zsh(ZshExtra),
    Fish(FishExtra),
}

/// What a zsh record holds beyond the common fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZshExtra {
    /// Exact bytes of the record as read, including the line terminator.
    pub raw: Vec<u8>,
}

/// What a fish block holds beyond the common fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FishExtra {
    /// Decoded items of the `paths:` list.
    pub paths: Vec<String>,
    /// Exact bytes of the block as read.
    pub raw: Vec<u8>,
}

impl Entry {
    /// Create an entry with no dialect payload.
    pub fn new(dialect: Dialect, command: impl Into<String>, timestamp: Option<i64>) -> Self {
        Entry {
            command: command.into(),
            timestamp,
            duration: None,
            extra: Extra::None,
            dialect,
        }
    }

    /// Copy this entry out of a store of the `origin` dialect.
    ///
    /// Only the command and timestamp survive; the origin is recorded so the
    /// receiving codec knows it must synthesize a record.
    pub fn copied(&self, origin: Dialect) -> Self {
        Entry {
            command: self.command.clone(),
            timestamp: self.timestamp,
            duration: None,
            extra: Extra::None,
            dialect: origin,
        }
    }

    /// Verbatim record bytes, if this entry still carries its native shape.
    pub fn native_raw(&self, dialect: Dialect) -> Option<&[u8]> {
        if self.dialect != dialect {
            return None;
        }
        match (&self.extra, dialect) {
            (Extra::Zsh(extra), Dialect::Zsh) => Some(&extra.raw),
            (Extra::Fish(extra), Dialect::Fish) => Some(&extra.raw),
            _ => None,
        }
    }

    pub fn paths(&self) -> &[String] {
        match &self.extra {
            Extra::Fish(extra) => &extra.paths,
            _ => &[],
        }
    }
}
