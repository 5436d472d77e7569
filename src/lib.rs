//! ogit - minimal local version control
//!
//! a content-addressed object store, a staging index and a linear commit
//! chain kept under `.ogit` in the working directory.
//!
//! # Core concepts
//!
//! - **Object**: raw bytes stored under their SHA-256 digest, written once
//! - **Index**: path -> digest entries queued for the next commit
//! - **Commit**: message, timestamp, snapshot of the index and a parent link,
//!   stored as canonical JSON and addressed by its digest
//! - **Head**: `refs/heads/<branch>`, the most recent commit
//!
//! # Layout
//!
//! ```text
//! .ogit/objects/<digest>      one file per object, raw bytes
//! .ogit/refs/heads/master     head commit digest
//! .ogit/index                 "path digest" records
//! .ogit/config.toml           branch name and ignore patterns
//! ```
//!
//! # Example usage
//!
//! ```no_run
//! use ogit::{ops, Repo};
//! use std::path::Path;
//!
//! let repo = Repo::init(Path::new("/path/to/work")).unwrap();
//! ops::add(&repo, Path::new("foo.txt")).unwrap();
//! let hash = ops::commit(&repo, "first").unwrap();
//!
//! for entry in ops::log(&repo).unwrap() {
//!     println!("{}", entry.unwrap().commit.message);
//! }
//! # let _ = hash;
//! ```

mod config;
mod error;
mod hash;
mod refs;
mod repo;

pub mod fs;
pub mod index;
pub mod object;
pub mod ops;
pub mod types;

pub use config::{Config, DEFAULT_BRANCH};
pub use error::{Error, IoResultExt, Result};
pub use hash::{hash_bytes, Hash};
pub use index::Index;
pub use object::{
    list_objects, object_exists, read_commit, read_object, write_commit, write_object,
};
pub use refs::{read_head, read_ref, ref_exists, write_head, write_ref};
pub use repo::{Repo, RepoLock, REPO_DIR};
pub use types::{Commit, IndexEntry};
