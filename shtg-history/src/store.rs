use crate::codec::codec_for;
use crate::merge::missing_entries;
use crate::transform::Transform;
use shtg_types::{Dialect, Entry, ShtgError, ShtgResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unread,
    Read,
    Written,
}

/// Where [`HistoryStore::write`] puts the serialized history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Replace the backing file.
    Real,
    /// Write a preview file and leave the backing file alone.
    Preview(PathBuf),
}

/// The entries of one history file.
#[derive(Debug)]
pub struct HistoryStore {
    dialect: Dialect,
    path: PathBuf,
    entries: Vec<Entry>,
    state: State,
}

impl HistoryStore {
    pub fn new(dialect: Dialect, path: impl Into<PathBuf>) -> Self {
        HistoryStore {
            dialect,
            path: path.into(),
            entries: Vec::new(),
            state: State::Unread,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_read(&self) -> ShtgResult<()> {
        match self.state {
            State::Unread => Err(ShtgError::NotRead {
                dialect: self.dialect,
            }),
            _ => Ok(()),
        }
    }

    fn ensure_mutable(&self) -> ShtgResult<()> {
        self.ensure_read()?;
        if self.state == State::Written {
            return Err(ShtgError::AlreadyWritten {
                dialect: self.dialect,
            });
        }
        Ok(())
    }

    /// Load and parse the backing file, replacing the current entries.
    pub fn read(&mut self) -> ShtgResult<()> {
        if self.state == State::Written {
            return Err(ShtgError::AlreadyWritten {
                dialect: self.dialect,
            });
        }
        debug!("reading {} history from {}", self.dialect, self.path.display());
        let bytes = fs::read(&self.path).map_err(|e| ShtgError::io("read", &self.path, e))?;
        self.entries = codec_for(self.dialect).parse(&bytes)?;
        self.state = State::Read;
        Ok(())
    }

    pub fn len(&self) -> ShtgResult<usize> {
        self.ensure_read()?;
        Ok(self.entries.len())
    }

    pub fn is_empty(&self) -> ShtgResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn entries(&self) -> ShtgResult<&[Entry]> {
        self.ensure_read()?;
        Ok(&self.entries)
    }

    /// Run a filter over the entries and return how many were removed.
    pub fn apply(&mut self, transform: &Transform, now: i64) -> ShtgResult<usize> {
        self.ensure_mutable()?;
        let entries = std::mem::take(&mut self.entries);
        let (kept, removed) = transform.apply(entries, now);
        self.entries = kept;
        debug!("{:?} removed {} {} entries", transform, removed, self.dialect);
        Ok(removed)
    }

    /// Append the commands of `other` this store is missing.
    ///
    /// Returns the number of appended entries. Existing entries keep their
    /// positions.
    pub fn combine(&mut self, other: &HistoryStore) -> ShtgResult<usize> {
        self.ensure_mutable()?;
        let missing = missing_entries(&self.entries, other.entries()?, other.dialect);
        let added = missing.len();
        self.entries.extend(missing);
        debug!(
            "combined {} {} entries into {} history",
            added, other.dialect, self.dialect
        );
        Ok(added)
    }

    /// Serialize the entries and write them out. Returns the written path.
    ///
    /// The store cannot be changed afterwards.
    pub fn write(&mut self, destination: &Destination) -> ShtgResult<PathBuf> {
        self.ensure_mutable()?;
        let bytes = codec_for(self.dialect).serialize(&self.entries);
        let target = match destination {
            Destination::Real => {
                write_atomic(&self.path, &bytes)?;
                self.path.clone()
            }
            Destination::Preview(path) => {
                fs::write(path, &bytes).map_err(|e| ShtgError::io("write", path, e))?;
                path.clone()
            }
        };
        self.state = State::Written;
        info!(
            "wrote {} {} entries to {}",
            self.entries.len(),
            self.dialect,
            target.display()
        );
        Ok(target)
    }
}

/// Replace `path` with `bytes` via a temporary file in the same directory,
/// so the original is either fully replaced or untouched.
///
/// A symlinked history file is written through to its target.
fn write_atomic(path: &Path, bytes: &[u8]) -> ShtgResult<()> {
    let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let path = resolved.as_path();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp_file =
        NamedTempFile::new_in(dir).map_err(|e| ShtgError::io("create temp file in", dir, e))?;
    tmp_file
        .write_all(bytes)
        .and_then(|_| tmp_file.as_file().sync_all())
        .map_err(|e| ShtgError::io("write", tmp_file.path(), e))?;
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp_file.path(), metadata.permissions())
            .map_err(|e| ShtgError::io("set permissions on", tmp_file.path(), e))?;
    }
    tmp_file
        .persist(path)
        .map_err(|e| ShtgError::io("replace", path, e.error))?;
    Ok(())
}
