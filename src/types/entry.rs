use serde::{Deserialize, Serialize};

use crate::hash::Hash;

/// a staged file: working path and the digest of its content
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// path relative to the working directory, `/` separated
    pub path: String,
    /// digest of the file content in the object store
    pub hash: Hash,
}

impl IndexEntry {
    pub fn new(path: impl Into<String>, hash: Hash) -> Self {
        Self {
            path: path.into(),
            hash,
        }
    }
}
