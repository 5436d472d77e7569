use std::fs;
use std::path::PathBuf;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::atomic_write;
use crate::hash::Hash;
use crate::repo::Repo;

/// write a ref (create or overwrite)
pub fn write_ref(repo: &Repo, ref_name: &str, hash: &Hash) -> Result<()> {
    validate_ref_name(ref_name)?;

    let ref_path = ref_path(repo, ref_name);

    if let Some(parent) = ref_path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }

    let content = format!("{}\n", hash.to_hex());
    atomic_write(&repo.tmp_file()?, &ref_path, content.as_bytes())
}

/// read a ref
///
/// a ref that does not exist yet, or an empty ref file, reads as `None`.
pub fn read_ref(repo: &Repo, ref_name: &str) -> Result<Option<Hash>> {
    validate_ref_name(ref_name)?;

    let ref_path = ref_path(repo, ref_name);

    let content = match fs::read_to_string(&ref_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::Io {
                path: ref_path,
                source: e,
            })
        }
    };

    let hex = content.trim();
    if hex.is_empty() {
        return Ok(None);
    }
    Hash::from_hex(hex).map(Some)
}

/// check if a ref exists
pub fn ref_exists(repo: &Repo, ref_name: &str) -> bool {
    ref_path(repo, ref_name).is_file()
}

/// current head commit, if any commit exists
pub fn read_head(repo: &Repo) -> Result<Option<Hash>> {
    read_ref(repo, repo.head_ref())
}

/// point head at a commit
///
/// callers must have written the commit object first.
pub fn write_head(repo: &Repo, hash: &Hash) -> Result<()> {
    write_ref(repo, repo.head_ref(), hash)?;
    tracing::debug!(branch = repo.head_ref(), %hash, "moved head");
    Ok(())
}

/// get filesystem path for a ref
fn ref_path(repo: &Repo, ref_name: &str) -> PathBuf {
    repo.refs_path().join(ref_name)
}

/// validate ref name
pub(crate) fn validate_ref_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidRef("empty ref name".to_string()));
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(Error::InvalidRef(format!(
            "ref name cannot start or end with '/': {}",
            name
        )));
    }

    if name.contains("//") {
        return Err(Error::InvalidRef(format!(
            "ref name cannot contain '//': {}",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidRef(format!(
            "ref name cannot contain null byte: {}",
            name
        )));
    }

    // check for path traversal
    for component in name.split('/') {
        if component == "." || component == ".." {
            return Err(Error::InvalidRef(format!(
                "ref name cannot contain '.' or '..': {}",
                name
            )));
        }
    }

    Ok(())
}
