use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::read_commit;
use crate::refs::read_head;
use crate::repo::Repo;
use crate::types::Commit;

/// commit with its hash for log output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub hash: Hash,
    pub commit: Commit,
}

/// lazy walk from head towards the root commit
///
/// yields commits newest first. a link to a missing commit yields
/// `BrokenChain` and a link back to an already visited commit yields
/// `CommitCycle`; the walk ends after either.
pub struct Log<'a> {
    repo: &'a Repo,
    next: Option<Hash>,
    visited: HashSet<Hash>,
}

impl<'a> Log<'a> {
    /// start a walk at an arbitrary commit
    pub fn from_commit(repo: &'a Repo, start: Option<Hash>) -> Self {
        Self {
            repo,
            next: start,
            visited: HashSet::new(),
        }
    }
}

impl Iterator for Log<'_> {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let hash = self.next.take()?;

        if !self.visited.insert(hash) {
            tracing::warn!(%hash, "commit chain revisits a commit");
            return Some(Err(Error::CommitCycle(hash)));
        }

        match read_commit(self.repo, &hash) {
            Ok(commit) => {
                self.next = commit.parent;
                Some(Ok(LogEntry { hash, commit }))
            }
            Err(Error::ObjectNotFound(_)) => {
                tracing::warn!(%hash, "commit chain references a missing commit");
                Some(Err(Error::BrokenChain(hash)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl std::iter::FusedIterator for Log<'_> {}

/// walk history from the current head
///
/// each call re-reads head. with no commits the walk is empty.
pub fn log(repo: &Repo) -> Result<Log<'_>> {
    Ok(Log::from_commit(repo, read_head(repo)?))
}

/// collect history from head, newest first, optionally limited
pub fn log_entries(repo: &Repo, max_count: Option<usize>) -> Result<Vec<LogEntry>> {
    let walk = log(repo)?;
    match max_count {
        Some(max) => walk.take(max).collect(),
        None => walk.collect(),
    }
}

/// format a log entry for display
impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Commit: {}", self.hash)?;
        writeln!(f, "Message: {}", self.commit.message)?;
        writeln!(f, "Timestamp: {}", self.commit.timestamp)?;
        write!(f, "----")
    }
}
