//! History file codecs.
//!
//! Each dialect parses raw file bytes into [`Entry`] values and serializes
//! them back. Entries that still carry their native payload are replayed
//! byte for byte; everything else is synthesized from the common fields.

mod fish;
mod zsh;

pub use fish::FishCodec;
pub use zsh::ZshCodec;

use shtg_types::{Dialect, Entry, ParseError};
use tracing::warn;

/// Trait for history file formats
pub trait Codec {
    fn dialect(&self) -> Dialect;

    /// Parse a whole history file.
    fn parse(&self, bytes: &[u8]) -> Result<Vec<Entry>, ParseError>;

    /// Append a freshly built record for an entry without a native payload.
    fn synthesize(&self, entry: &Entry, out: &mut Vec<u8>);

    /// Serialize entries into file contents.
    fn serialize(&self, entries: &[Entry]) -> Vec<u8> {
        let dialect = self.dialect();
        let mut out = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            match entry.native_raw(dialect) {
                Some(raw) => {
                    out.extend_from_slice(raw);
                    // a final record read without its newline must not swallow what follows
                    if i + 1 < entries.len() && !raw.ends_with(b"\n") {
                        out.push(b'\n');
                    }
                }
                None => self.synthesize(entry, &mut out),
            }
        }
        out
    }
}

/// Factory function to create the codec for the specified dialect
pub fn codec_for(dialect: Dialect) -> Box<dyn Codec> {
    match dialect {
        Dialect::Zsh => Box::new(ZshCodec),
        Dialect::Fish => Box::new(FishCodec),
    }
}

/// A single physical line.
struct Line<'a> {
    /// Byte offset of the first byte of the line.
    start: usize,
    /// Line content without the terminator.
    content: &'a [u8],
    /// Offset just past the terminator (or the end of input).
    end: usize,
}

impl Line<'_> {
    fn terminated(&self) -> bool {
        self.end > self.start + self.content.len()
    }
}

fn lines(bytes: &[u8]) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;
    std::iter::from_fn(move || {
        if offset >= bytes.len() {
            return None;
        }
        let start = offset;
        let rest = &bytes[start..];
        let (content, end) = match rest.iter().position(|&b| b == b'\n') {
            Some(pos) => (&rest[..pos], start + pos + 1),
            None => (rest, bytes.len()),
        };
        offset = end;
        Some(Line {
            start,
            content,
            end,
        })
    })
}

/// Decode command bytes, replacing invalid UTF-8.
fn decode_text(dialect: Dialect, offset: usize, bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            warn!(
                "{dialect} record at byte {offset} contains invalid UTF-8 characters, replaced with '\\u{{FFFD}}'"
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
