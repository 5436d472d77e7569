use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::index::Index;
use crate::repo::{Repo, REPO_DIR};

/// top-level working directory entries split by index membership
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    /// names with an index entry, sorted
    pub staged: Vec<String>,
    /// names without an index entry, sorted
    pub untracked: Vec<String>,
}

/// classify the working directory's top-level entries
///
/// flat and content-blind: subdirectories are listed by name only and a
/// staged file edited after `add` is still reported as staged.
pub fn status(repo: &Repo) -> Result<Status> {
    let index = Index::load_or_default(repo)?;
    let ignore = repo.config().ignore_patterns()?;
    let mut status = Status::default();

    let walker = WalkDir::new(repo.workdir())
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(repo.workdir()).to_path_buf();
            Error::Io {
                path,
                source: e.into(),
            }
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if name == REPO_DIR || ignore.iter().any(|p| p.matches(&name)) {
            continue;
        }

        if index.contains(&name) {
            status.staged.push(name);
        } else {
            status.untracked.push(name);
        }
    }

    Ok(status)
}
