use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::store::{object_exists, read_object, write_object};
use crate::repo::Repo;
use crate::types::Commit;

/// write a commit to the object store
///
/// commits are stored as canonical JSON; the hash is computed over exactly
/// the bytes written, so the digest returned here is the commit id.
pub fn write_commit(repo: &Repo, commit: &Commit) -> Result<Hash> {
    let bytes = commit.to_canonical_bytes()?;
    write_object(repo, &bytes)
}

/// read a commit from the object store
///
/// an object that exists but does not decode as a commit is reported as
/// corrupt.
pub fn read_commit(repo: &Repo, hash: &Hash) -> Result<Commit> {
    let bytes = read_object(repo, hash)?;
    Commit::from_bytes(&bytes).map_err(|e| {
        tracing::warn!(%hash, error = %e, "object is not a commit");
        Error::CorruptObject(*hash)
    })
}

/// check if a commit object exists in the store
pub fn commit_exists(repo: &Repo, hash: &Hash) -> bool {
    object_exists(repo, hash)
}
