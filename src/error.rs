use std::path::PathBuf;

use crate::Hash;

/// error type for ogit operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not an ogit repository (or .ogit missing) at {0}")]
    NoRepo(PathBuf),

    #[error("ogit repository already exists at {0}")]
    RepoExists(PathBuf),

    #[error("file {0} does not exist")]
    FileNotFound(PathBuf),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid ref name: {0}")]
    InvalidRef(String),

    #[error("object not found: {0}")]
    ObjectNotFound(Hash),

    #[error("corrupt object: hash mismatch for {0}")]
    CorruptObject(Hash),

    #[error("nothing to commit: index file {0} does not exist")]
    IndexMissing(PathBuf),

    #[error("nothing to commit: index is empty")]
    EmptyIndex,

    #[error("commit message must not be empty")]
    EmptyMessage,

    #[error("commit chain broken: commit {0} not found")]
    BrokenChain(Hash),

    #[error("commit chain loops back to {0}")]
    CommitCycle(Hash),

    #[error("repository integrity check failed: {0}")]
    IntegrityCheck(String),

    #[error("malformed index record at line {line}: {content:?}")]
    InvalidIndexLine { line: usize, content: String },

    #[error("lock contention on repository")]
    LockContention,

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("commit encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("invalid ignore pattern {pattern:?}: {message}")]
    InvalidIgnorePattern { pattern: String, message: String },

    #[error("invalid hash hex: {0}")]
    InvalidHashHex(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
