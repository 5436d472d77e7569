use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::index::{clear_index, Index};
use crate::object::{object_exists, write_commit};
use crate::refs::{read_head, write_head};
use crate::repo::Repo;
use crate::types::Commit;

/// record the staged files as a new commit on head
///
/// order matters for crash safety: the commit object is written first, then
/// head is moved, and only then is the index cleared. a failure at any step
/// leaves head pointing at a readable commit and the staged files intact.
pub fn commit(repo: &Repo, message: &str) -> Result<Hash> {
    if message.trim().is_empty() {
        return Err(Error::EmptyMessage);
    }

    let _lock = repo.lock()?;

    let index = Index::load(repo)?;
    if index.is_empty() {
        return Err(Error::EmptyIndex);
    }

    // every staged digest must already resolve
    if let Some(missing) = index.entries().iter().find(|e| !object_exists(repo, &e.hash)) {
        return Err(Error::ObjectNotFound(missing.hash));
    }

    let parent = read_head(repo)?;
    let commit = Commit::new(message, index.into_entries(), parent);

    let commit_hash = write_commit(repo, &commit)?;
    write_head(repo, &commit_hash)?;
    clear_index(repo)?;

    tracing::info!(
        hash = %commit_hash,
        files = commit.files.len(),
        parent = ?commit.parent,
        "created commit"
    );

    Ok(commit_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_bytes;
    use crate::index::stage_path;
    use crate::object::{read_commit, write_object};
    use crate::ops::add;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn add_file(dir: &Path, repo: &Repo, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
        add(repo, Path::new(name)).unwrap();
    }

    #[test]
    fn test_first_commit() {
        let (dir, repo) = test_repo();
        add_file(dir.path(), &repo, "foo.txt", "hello");

        let hash = commit(&repo, "first").unwrap();

        assert_eq!(read_head(&repo).unwrap(), Some(hash));

        let c = read_commit(&repo, &hash).unwrap();
        assert_eq!(c.message, "first");
        assert!(c.is_root());
        assert_eq!(c.files.len(), 1);
        assert_eq!(c.files[0].path, "foo.txt");
        assert_eq!(c.files[0].hash, hash_bytes(b"hello"));
        assert_eq!(hash, c.hash().unwrap());
    }

    #[test]
    fn test_commit_clears_index() {
        let (dir, repo) = test_repo();
        add_file(dir.path(), &repo, "foo.txt", "hello");

        commit(&repo, "first").unwrap();

        assert!(Index::load(&repo).unwrap().is_empty());
    }

    #[test]
    fn test_second_commit_links_parent() {
        let (dir, repo) = test_repo();

        add_file(dir.path(), &repo, "a.txt", "1");
        let first = commit(&repo, "first").unwrap();

        add_file(dir.path(), &repo, "b.txt", "2");
        let second = commit(&repo, "second").unwrap();

        let c = read_commit(&repo, &second).unwrap();
        assert_eq!(c.parent, Some(first));
        // only what was staged since the last commit
        assert_eq!(c.files.len(), 1);
        assert_eq!(c.files[0].path, "b.txt");
        assert_eq!(read_head(&repo).unwrap(), Some(second));
    }

    #[test]
    fn test_commit_empty_index() {
        let (_dir, repo) = test_repo();

        assert!(matches!(commit(&repo, "nothing"), Err(Error::EmptyIndex)));
        assert_eq!(read_head(&repo).unwrap(), None);
    }

    #[test]
    fn test_commit_empty_index_keeps_head() {
        let (dir, repo) = test_repo();
        add_file(dir.path(), &repo, "a.txt", "1");
        let first = commit(&repo, "first").unwrap();

        assert!(matches!(commit(&repo, "again"), Err(Error::EmptyIndex)));
        assert_eq!(read_head(&repo).unwrap(), Some(first));
    }

    #[test]
    fn test_commit_empty_message() {
        let (dir, repo) = test_repo();
        add_file(dir.path(), &repo, "a.txt", "1");

        assert!(matches!(commit(&repo, ""), Err(Error::EmptyMessage)));
        assert!(matches!(commit(&repo, "  \n"), Err(Error::EmptyMessage)));

        // staged state is untouched
        assert_eq!(Index::load(&repo).unwrap().len(), 1);
    }

    #[test]
    fn test_commit_missing_index_file() {
        let (_dir, repo) = test_repo();
        fs::remove_file(repo.index_path()).unwrap();

        assert!(matches!(commit(&repo, "msg"), Err(Error::IndexMissing(_))));
    }

    #[test]
    fn test_commit_rejects_dangling_index_entry() {
        let (_dir, repo) = test_repo();
        let ghost = hash_bytes(b"never stored");
        stage_path(&repo, "ghost.txt", &ghost).unwrap();

        assert!(matches!(
            commit(&repo, "msg"),
            Err(Error::ObjectNotFound(h)) if h == ghost
        ));
        assert_eq!(read_head(&repo).unwrap(), None);
        assert_eq!(Index::load(&repo).unwrap().len(), 1);
    }

    #[test]
    fn test_commit_preserves_index_order() {
        let (_dir, repo) = test_repo();
        let b = write_object(&repo, b"b").unwrap();
        let a = write_object(&repo, b"a").unwrap();
        stage_path(&repo, "b.txt", &b).unwrap();
        stage_path(&repo, "a.txt", &a).unwrap();

        let hash = commit(&repo, "ordered").unwrap();
        let paths: Vec<_> = read_commit(&repo, &hash)
            .unwrap()
            .files
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(paths, vec!["b.txt", "a.txt"]);
    }
}
