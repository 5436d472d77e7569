//! the staging index: files queued for the next commit
//!
//! on disk the index is one record per line, `<path> <digest>\n`, with no
//! header. the digest is always 64 hex chars, so a record is split at its
//! last space and paths may contain spaces freely. inside the path a
//! backslash is written `\\` and a newline `\n`; any other escape is
//! rejected.
//!
//! entries keep the order of their last write: restaging a path moves it
//! to the end.

use std::fs;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::atomic_write;
use crate::hash::Hash;
use crate::repo::Repo;
use crate::types::IndexEntry;

/// in-memory view of the staging index
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Index {
    entries: Vec<IndexEntry>,
}

impl Index {
    /// empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// load the index file; a missing file is an error
    pub fn load(repo: &Repo) -> Result<Self> {
        let path = repo.index_path();
        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::IndexMissing(path.clone())
            } else {
                Error::Io {
                    path: path.clone(),
                    source: e,
                }
            }
        })?;
        Self::parse(&content)
    }

    /// load the index file, treating a missing file as empty
    pub fn load_or_default(repo: &Repo) -> Result<Self> {
        match Self::load(repo) {
            Err(Error::IndexMissing(_)) => Ok(Self::new()),
            other => other,
        }
    }

    /// parse the on-disk representation
    ///
    /// duplicate records for a path collapse to the last one.
    pub fn parse(content: &str) -> Result<Self> {
        let mut index = Self::new();

        for (i, line) in content.split('\n').enumerate() {
            if line.is_empty() {
                continue;
            }
            let invalid = || Error::InvalidIndexLine {
                line: i + 1,
                content: line.to_string(),
            };

            let (escaped, hex) = line.rsplit_once(' ').ok_or_else(invalid)?;
            if escaped.is_empty() {
                return Err(invalid());
            }
            let path = unescape_path(escaped).ok_or_else(invalid)?;
            let hash = Hash::from_hex(hex).map_err(|_| invalid())?;

            index.stage(path, hash);
        }

        Ok(index)
    }

    /// render the on-disk representation
    pub fn to_file_string(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&escape_path(&entry.path));
            out.push(' ');
            out.push_str(&entry.hash.to_hex());
            out.push('\n');
        }
        out
    }

    /// durably replace the index file with this index
    pub fn save(&self, repo: &Repo) -> Result<()> {
        let path = repo.index_path();
        atomic_write(&repo.tmp_file()?, &path, self.to_file_string().as_bytes())?;
        tracing::debug!(entries = self.entries.len(), "saved index");
        Ok(())
    }

    /// insert or replace the entry for `path`
    ///
    /// returns the digest previously staged for that path, if any.
    pub fn stage(&mut self, path: impl Into<String>, hash: Hash) -> Option<Hash> {
        let path = path.into();
        let previous = self
            .entries
            .iter()
            .position(|e| e.path == path)
            .map(|pos| self.entries.remove(pos).hash);
        self.entries.push(IndexEntry::new(path, hash));
        previous
    }

    /// staged entries in last-write order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// consume into staged entries
    pub fn into_entries(self) -> Vec<IndexEntry> {
        self.entries
    }

    /// look up the entry for a path
    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// stage one path and persist the index
///
/// callers hold the repository lock; the index trusts the digest given.
pub fn stage_path(repo: &Repo, path: &str, hash: &Hash) -> Result<Option<Hash>> {
    let mut index = Index::load_or_default(repo)?;
    let previous = index.stage(path, *hash);
    index.save(repo)?;
    Ok(previous)
}

/// empty the persisted index
pub fn clear_index(repo: &Repo) -> Result<()> {
    Index::new().save(repo)
}

/// escape a path for a single index record
fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_path(escaped: &str) -> Option<String> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            _ => return None,
        }
    }
    Some(out)
}
