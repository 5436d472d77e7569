use std::fs;
use std::path::{Component, Path};

use crate::error::{Error, IoResultExt, Result};
use crate::hash::Hash;
use crate::index::stage_path;
use crate::object::{object_exists, write_object};
use crate::repo::{Repo, REPO_DIR};

/// result of staging a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// index key: path relative to the working directory, `/` separated
    pub path: String,
    /// digest of the file content
    pub hash: Hash,
    /// false when identical content was already in the object store
    pub newly_stored: bool,
}

/// store a file's content and stage it in the index
///
/// relative paths are resolved against the working directory. the object
/// is written before the index references it.
pub fn add(repo: &Repo, path: &Path) -> Result<AddOutcome> {
    let full = if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo.workdir().join(path)
    };

    if !full.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    if !full.is_file() {
        return Err(Error::InvalidPath(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let key = index_key(repo, &full)?;

    let _lock = repo.lock()?;

    let content = fs::read(&full).with_path(&full)?;
    let hash = crate::hash::hash_bytes(&content);
    let newly_stored = !object_exists(repo, &hash);
    write_object(repo, &content)?;

    let previous = stage_path(repo, &key, &hash)?;
    tracing::debug!(path = %key, %hash, restaged = previous.is_some(), "staged file");

    Ok(AddOutcome {
        path: key,
        hash,
        newly_stored,
    })
}

/// compute the index key for an existing file
///
/// the parent directory is resolved so `..` and symlinked directories map
/// onto the working tree; the file name itself is kept as given.
fn index_key(repo: &Repo, full: &Path) -> Result<String> {
    let workdir = repo.workdir();
    let workdir = fs::canonicalize(workdir).with_path(workdir)?;

    let name = full
        .file_name()
        .ok_or_else(|| Error::InvalidPath(full.display().to_string()))?;
    let parent = match full.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let parent = fs::canonicalize(parent).with_path(parent)?;

    let rel = parent
        .join(name)
        .strip_prefix(&workdir)
        .map(Path::to_path_buf)
        .map_err(|_| {
            Error::InvalidPath(format!(
                "{} is outside the working directory",
                full.display()
            ))
        })?;

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    Error::InvalidPath(format!("{} is not valid UTF-8", rel.display()))
                })?;
                parts.push(part);
            }
            _ => return Err(Error::InvalidPath(rel.display().to_string())),
        }
    }

    if parts.first() == Some(&REPO_DIR) {
        return Err(Error::InvalidPath(format!(
            "{} is inside the repository directory",
            rel.display()
        )));
    }

    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Index;
    use crate::object::{list_objects, read_object};
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_add_file() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("foo.txt"), "hello").unwrap();

        let outcome = add(&repo, Path::new("foo.txt")).unwrap();

        assert_eq!(outcome.path, "foo.txt");
        assert!(outcome.newly_stored);
        assert_eq!(read_object(&repo, &outcome.hash).unwrap(), b"hello");

        let index = Index::load(&repo).unwrap();
        assert_eq!(index.get("foo.txt").unwrap().hash, outcome.hash);
    }

    #[test]
    fn test_add_same_file_twice() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("a.txt"), "same").unwrap();

        let first = add(&repo, Path::new("a.txt")).unwrap();
        let second = add(&repo, Path::new("a.txt")).unwrap();

        assert!(first.newly_stored);
        assert!(!second.newly_stored);
        assert_eq!(first.hash, second.hash);

        assert_eq!(Index::load(&repo).unwrap().len(), 1);
        assert_eq!(list_objects(&repo).unwrap(), vec![first.hash]);
    }

    #[test]
    fn test_add_modified_file_replaces_entry() {
        let (dir, repo) = test_repo();
        let file = dir.path().join("a.txt");

        fs::write(&file, "v1").unwrap();
        add(&repo, Path::new("a.txt")).unwrap();
        fs::write(&file, "v2").unwrap();
        let second = add(&repo, Path::new("a.txt")).unwrap();

        let index = Index::load(&repo).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("a.txt").unwrap().hash, second.hash);
        // both versions stay in the store
        assert_eq!(list_objects(&repo).unwrap().len(), 2);
    }

    #[test]
    fn test_add_missing_file() {
        let (_dir, repo) = test_repo();

        let result = add(&repo, Path::new("missing.txt"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
        assert!(Index::load(&repo).unwrap().is_empty());
    }

    #[test]
    fn test_add_directory_rejected() {
        let (dir, repo) = test_repo();
        fs::create_dir(dir.path().join("sub")).unwrap();

        assert!(matches!(
            add(&repo, Path::new("sub")),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_add_nested_and_absolute() {
        let (dir, repo) = test_repo();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/inner.txt"), "x").unwrap();

        let outcome = add(&repo, &dir.path().join("sub/inner.txt")).unwrap();
        assert_eq!(outcome.path, "sub/inner.txt");

        let outcome = add(&repo, Path::new("sub/../sub/inner.txt")).unwrap();
        assert_eq!(outcome.path, "sub/inner.txt");
        assert_eq!(Index::load(&repo).unwrap().len(), 1);
    }

    #[test]
    fn test_add_outside_workdir_rejected() {
        let outer = tempdir().unwrap();
        let workdir = outer.path().join("work");
        fs::create_dir(&workdir).unwrap();
        fs::write(outer.path().join("secret.txt"), "x").unwrap();
        let repo = Repo::init(&workdir).unwrap();

        assert!(matches!(
            add(&repo, Path::new("../secret.txt")),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_add_repo_internals_rejected() {
        let (_dir, repo) = test_repo();

        assert!(matches!(
            add(&repo, Path::new(".ogit/index")),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_add_blocked_by_lock() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("a.txt"), "x").unwrap();

        let _held = repo.lock().unwrap();
        assert!(matches!(
            add(&repo, Path::new("a.txt")),
            Err(Error::LockContention)
        ));
    }
}
