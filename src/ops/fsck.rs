use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::index::Index;
use crate::object::{list_objects, object_exists, read_object};
use crate::ops::log::Log;
use crate::refs::read_head;
use crate::repo::Repo;

/// fsck report
#[derive(Debug, Default)]
pub struct FsckReport {
    /// objects checked
    pub objects_checked: usize,
    /// commits reachable from head
    pub commits: usize,
    /// corrupt objects (hash mismatch or undecodable commit)
    pub corrupt_objects: Vec<CorruptObject>,
    /// missing objects referenced by commits or the index
    pub missing_objects: Vec<MissingObject>,
    /// objects not reachable from head or the index
    pub dangling_objects: Vec<Hash>,
}

impl FsckReport {
    pub fn is_ok(&self) -> bool {
        self.corrupt_objects.is_empty() && self.missing_objects.is_empty()
    }
}

#[derive(Debug)]
pub struct CorruptObject {
    pub hash: Hash,
    pub message: String,
}

#[derive(Debug)]
pub struct MissingObject {
    pub hash: Hash,
    pub object_type: ObjectType,
    pub referenced_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    File,
    Commit,
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectType::File => write!(f, "file"),
            ObjectType::Commit => write!(f, "commit"),
        }
    }
}

/// verify repository integrity
///
/// walks the chain from head and the staging index, then re-hashes every
/// object in the store. nothing is modified.
pub fn fsck(repo: &Repo) -> Result<FsckReport> {
    let mut report = FsckReport::default();
    let mut reachable = HashSet::new();
    let mut corrupt = HashSet::new();

    let mut referenced_by = format!("ref {}", repo.head_ref());
    for step in Log::from_commit(repo, read_head(repo)?) {
        match step {
            Ok(entry) => {
                report.commits += 1;
                reachable.insert(entry.hash);
                let owner = format!("commit {}", entry.hash);
                for file in &entry.commit.files {
                    reachable.insert(file.hash);
                    if !object_exists(repo, &file.hash) {
                        report.missing_objects.push(MissingObject {
                            hash: file.hash,
                            object_type: ObjectType::File,
                            referenced_by: format!("{} ({})", owner, file.path),
                        });
                    }
                }
                referenced_by = owner;
            }
            Err(Error::BrokenChain(hash)) => {
                report.missing_objects.push(MissingObject {
                    hash,
                    object_type: ObjectType::Commit,
                    referenced_by: referenced_by.clone(),
                });
            }
            Err(Error::CorruptObject(hash)) => {
                corrupt.insert(hash);
                report.corrupt_objects.push(CorruptObject {
                    hash,
                    message: format!("unreadable commit referenced by {}", referenced_by),
                });
            }
            Err(Error::CommitCycle(hash)) => {
                report.corrupt_objects.push(CorruptObject {
                    hash,
                    message: format!("commit chain loops back from {}", referenced_by),
                });
            }
            Err(e) => return Err(e),
        }
    }

    for entry in Index::load_or_default(repo)?.entries() {
        reachable.insert(entry.hash);
        if !object_exists(repo, &entry.hash) {
            report.missing_objects.push(MissingObject {
                hash: entry.hash,
                object_type: ObjectType::File,
                referenced_by: format!("index ({})", entry.path),
            });
        }
    }

    for hash in list_objects(repo)? {
        report.objects_checked += 1;

        match read_object(repo, &hash) {
            Ok(_) => {}
            Err(Error::CorruptObject(_)) if !corrupt.contains(&hash) => {
                report.corrupt_objects.push(CorruptObject {
                    hash,
                    message: "hash mismatch".to_string(),
                });
            }
            Err(Error::CorruptObject(_)) => {}
            Err(e) => return Err(e),
        }

        if !reachable.contains(&hash) {
            report.dangling_objects.push(hash);
        }
    }

    if !report.is_ok() {
        tracing::warn!(
            corrupt = report.corrupt_objects.len(),
            missing = report.missing_objects.len(),
            "repository integrity problems found"
        );
    }

    Ok(report)
}
