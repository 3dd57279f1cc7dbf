//! zsh history.
//!
//! ```text
//! : 1690000000:3;make test
//! echo multi \
//! line
//! ```
//!
//! A trailing backslash continues the record on the next line. The
//! `: <when>:<elapsed>;` prefix is only written with `EXTENDED_HISTORY`.
//! Non-ASCII text is stored metafied: bytes in `0x83..=0xA1` (and NUL) are
//! written as `0x83` followed by the byte XOR `0x20`.

use super::{Codec, decode_text, lines};
use shtg_types::{Dialect, Entry, Extra, ParseError, ZshExtra};
use std::io::Write;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct ZshCodec;

const META: u8 = 0x83;

fn is_meta(b: u8) -> bool {
    b == 0 || (META..=0xA1).contains(&b)
}

/// Undo zsh's metafication of stored bytes.
pub fn unmetafy(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter();
    while let Some(&b) = iter.next() {
        if b == META {
            if let Some(&next) = iter.next() {
                out.push(next ^ 0x20);
            }
        } else {
            out.push(b);
        }
    }
    out
}

pub fn metafy(bytes: &[u8], out: &mut Vec<u8>) {
    for &b in bytes {
        if is_meta(b) {
            out.push(META);
            out.push(b ^ 0x20);
        } else {
            out.push(b);
        }
    }
}

/// Split `: <digits>:<digits>;` off the front of a record.
///
/// Returns `None` if the record does not carry the full prefix, in which
/// case it is a plain command (`: foo` is valid shell).
fn split_metadata(record: &[u8]) -> Option<(&[u8], &[u8], &[u8])> {
    let rest = record.strip_prefix(b": ")?;
    let colon = rest.iter().position(|&b| b == b':')?;
    let (when, rest) = (&rest[..colon], &rest[colon + 1..]);
    let semi = rest.iter().position(|&b| b == b';')?;
    let (elapsed, command) = (&rest[..semi], &rest[semi + 1..]);
    let is_number = |s: &[u8]| !s.is_empty() && s.iter().all(u8::is_ascii_digit);
    if is_number(when) && is_number(elapsed) {
        Some((when, elapsed, command))
    } else {
        None
    }
}

fn parse_number(offset: usize, field: &str, digits: &[u8]) -> Result<i64, ParseError> {
    // digits are ASCII, so this only fails on overflow
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| ParseError::new(Dialect::Zsh, offset, format!("{field} out of range")))
}

impl ZshCodec {
    fn parse_record(&self, start: usize, logical: &[u8], raw: &[u8]) -> Result<Entry, ParseError> {
        let (timestamp, duration, command) = match split_metadata(logical) {
            Some((when, elapsed, command)) => (
                Some(parse_number(start, "timestamp", when)?),
                Some(parse_number(start, "duration", elapsed)?),
                command,
            ),
            None => (None, None, logical),
        };
        if command.is_empty() {
            return Err(ParseError::new(Dialect::Zsh, start, "empty command"));
        }
        Ok(Entry {
            command: decode_text(Dialect::Zsh, start, &unmetafy(command)),
            timestamp,
            duration,
            extra: Extra::Zsh(ZshExtra { raw: raw.to_vec() }),
            dialect: Dialect::Zsh,
        })
    }
}

impl Codec for ZshCodec {
    fn dialect(&self) -> Dialect {
        Dialect::Zsh
    }

    fn parse(&self, bytes: &[u8]) -> Result<Vec<Entry>, ParseError> {
        let mut entries = Vec::new();
        let mut pending: Option<(usize, Vec<u8>)> = None;

        for line in lines(bytes) {
            let (start, mut logical) = pending
                .take()
                .unwrap_or_else(|| (line.start, Vec::new()));
            let continues = line.terminated() && line.end < bytes.len();
            match line.content.strip_suffix(b"\\") {
                Some(body) if continues => {
                    logical.extend_from_slice(body);
                    logical.push(b'\n');
                    pending = Some((start, logical));
                }
                _ => {
                    logical.extend_from_slice(line.content);
                    entries.push(self.parse_record(start, &logical, &bytes[start..line.end])?);
                }
            }
        }

        debug!("parsed {} zsh history entries", entries.len());
        Ok(entries)
    }

    fn synthesize(&self, entry: &Entry, out: &mut Vec<u8>) {
        if let Some(when) = entry.timestamp {
            let _ = write!(out, ": {}:{};", when, entry.duration.unwrap_or(0));
        }
        for (i, part) in entry.command.split('\n').enumerate() {
            if i > 0 {
                out.extend_from_slice(b"\\\n");
            }
            metafy(part.as_bytes(), out);
        }
        out.push(b'\n');
    }
}
