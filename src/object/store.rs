use std::fs;
use std::path::PathBuf;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::atomic_write;
use crate::hash::{hash_bytes, Hash};
use crate::repo::Repo;

/// write a payload to the object store
///
/// the digest is computed over the raw bytes. if an object with that digest
/// already exists nothing is written. returns the digest either way.
pub fn write_object(repo: &Repo, payload: &[u8]) -> Result<Hash> {
    let hash = hash_bytes(payload);
    let path = object_path(repo, &hash);

    // deduplication: if the object already exists, we're done
    if path.exists() {
        tracing::debug!(%hash, "object already present");
        return Ok(hash);
    }

    let objects_dir = repo.objects_path();
    fs::create_dir_all(&objects_dir).with_path(&objects_dir)?;

    atomic_write(&repo.tmp_file()?, &path, payload)?;
    tracing::debug!(%hash, size = payload.len(), "wrote object");

    Ok(hash)
}

/// read an object's payload
///
/// the bytes are re-hashed so a damaged file is reported as corrupt rather
/// than handed back silently.
pub fn read_object(repo: &Repo, hash: &Hash) -> Result<Vec<u8>> {
    let path = object_path(repo, hash);
    let payload = fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ObjectNotFound(*hash)
        } else {
            Error::Io { path, source: e }
        }
    })?;

    if hash_bytes(&payload) != *hash {
        return Err(Error::CorruptObject(*hash));
    }

    Ok(payload)
}

/// check if an object exists in the store
pub fn object_exists(repo: &Repo, hash: &Hash) -> bool {
    object_path(repo, hash).is_file()
}

/// get the filesystem path to an object
pub fn object_path(repo: &Repo, hash: &Hash) -> PathBuf {
    repo.objects_path().join(hash.to_hex())
}

/// list every object digest in the store, sorted
///
/// files whose names are not digests are skipped.
pub fn list_objects(repo: &Repo) -> Result<Vec<Hash>> {
    let dir = repo.objects_path();
    let mut hashes = Vec::new();

    if !dir.exists() {
        return Ok(hashes);
    }

    for entry in fs::read_dir(&dir).with_path(&dir)? {
        let entry = entry.with_path(&dir)?;
        let name = entry.file_name();
        if let Some(hash) = name.to_str().and_then(|n| Hash::from_hex(n).ok()) {
            hashes.push(hash);
        }
    }

    hashes.sort();
    Ok(hashes)
}
