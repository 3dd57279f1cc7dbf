//! fish history.
//!
//! ```text
//! - cmd: cargo test
//!   when: 1700000000
//!   paths:
//!     - src/lib.rs
//! ```

use super::{Codec, decode_text, lines};
use shtg_types::{Dialect, Entry, Extra, FishExtra, ParseError};
use std::io::Write;
use tracing::debug;

const CMD_PREFIX: &[u8] = b"- cmd:";
const WHEN_PREFIX: &[u8] = b"  when:";
const PATHS_KEY: &[u8] = b"  paths:";
const PATH_ITEM_PREFIX: &[u8] = b"    - ";

#[derive(Debug, Default, Clone, Copy)]
pub struct FishCodec;

/// Decode fish's `\\` and `\n` escapes. Other backslashes are literal.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                    continue;
                }
                Some('n') => {
                    chars.next();
                    out.push('\n');
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }
    out
}

pub fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\n', "\\n")
}

struct Block {
    start: usize,
    command: String,
    timestamp: Option<i64>,
    paths: Vec<String>,
    in_paths: bool,
}

impl Block {
    fn finish(self, bytes: &[u8], end: usize) -> Result<Entry, ParseError> {
        if self.command.is_empty() {
            return Err(ParseError::new(Dialect::Fish, self.start, "empty command"));
        }
        Ok(Entry {
            command: self.command,
            timestamp: self.timestamp,
            duration: None,
            extra: Extra::Fish(FishExtra {
                paths: self.paths,
                raw: bytes[self.start..end].to_vec(),
            }),
            dialect: Dialect::Fish,
        })
    }
}

impl Codec for FishCodec {
    fn dialect(&self) -> Dialect {
        Dialect::Fish
    }

    fn parse(&self, bytes: &[u8]) -> Result<Vec<Entry>, ParseError> {
        let mut entries = Vec::new();
        let mut current: Option<Block> = None;

        for line in lines(bytes) {
            let content = line.content;

            if let Some(value) = content.strip_prefix(CMD_PREFIX) {
                if let Some(block) = current.take() {
                    entries.push(block.finish(bytes, line.start)?);
                }
                let value = value.strip_prefix(b" ").unwrap_or(value);
                current = Some(Block {
                    start: line.start,
                    command: unescape(&decode_text(Dialect::Fish, line.start, value)),
                    timestamp: None,
                    paths: Vec::new(),
                    in_paths: false,
                });
                continue;
            }

            let Some(block) = current.as_mut() else {
                return Err(ParseError::new(
                    Dialect::Fish,
                    line.start,
                    "expected '- cmd:' at start of record",
                ));
            };

            if let Some(item) = content.strip_prefix(PATH_ITEM_PREFIX) {
                if !block.in_paths {
                    return Err(ParseError::new(
                        Dialect::Fish,
                        line.start,
                        "path item outside of a paths list",
                    ));
                }
                block
                    .paths
                    .push(unescape(&decode_text(Dialect::Fish, line.start, item)));
            } else if let Some(value) = content.strip_prefix(WHEN_PREFIX) {
                if block.timestamp.is_some() {
                    return Err(ParseError::new(Dialect::Fish, line.start, "duplicate 'when'"));
                }
                let when = std::str::from_utf8(value)
                    .ok()
                    .and_then(|s| s.trim().parse::<i64>().ok())
                    .ok_or_else(|| {
                        ParseError::new(Dialect::Fish, line.start, "'when' is not an integer")
                    })?;
                block.timestamp = Some(when);
                block.in_paths = false;
            } else if content == PATHS_KEY {
                block.in_paths = true;
            } else if content.is_empty() || content.starts_with(b"  ") {
                // unknown keys are carried verbatim in the raw block
                block.in_paths = false;
            } else {
                return Err(ParseError::new(
                    Dialect::Fish,
                    line.start,
                    "unexpected line outside of a record",
                ));
            }
        }

        if let Some(block) = current.take() {
            entries.push(block.finish(bytes, bytes.len())?);
        }

        debug!("parsed {} fish history entries", entries.len());
        Ok(entries)
    }

    fn synthesize(&self, entry: &Entry, out: &mut Vec<u8>) {
        let _ = writeln!(out, "- cmd: {}", escape(&entry.command));
        if let Some(when) = entry.timestamp {
            let _ = writeln!(out, "  when: {when}");
        }
    }
}
