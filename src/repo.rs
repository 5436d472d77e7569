use std::fs::File;
use std::path::{Path, PathBuf};

use nix::fcntl::{Flock, FlockArg};

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};

/// name of the repository directory inside the working directory
pub const REPO_DIR: &str = ".ogit";

/// an ogit repository rooted in a working directory
pub struct Repo {
    workdir: PathBuf,
    path: PathBuf,
    config: Config,
}

impl Repo {
    /// initialize a new repository in the given working directory
    pub fn init(workdir: &Path) -> Result<Self> {
        let path = workdir.join(REPO_DIR);
        if path.exists() {
            return Err(Error::RepoExists(path));
        }

        std::fs::create_dir_all(path.join("objects")).with_path(&path)?;
        std::fs::create_dir_all(path.join("refs/heads")).with_path(&path)?;
        std::fs::create_dir_all(path.join("tmp")).with_path(&path)?;

        let index_path = path.join("index");
        File::create(&index_path).with_path(&index_path)?;

        let config = Config::default();
        config.save(&path.join("config.toml"))?;

        tracing::info!(path = %path.display(), "initialized repository");

        Ok(Self {
            workdir: workdir.to_path_buf(),
            path,
            config,
        })
    }

    /// open an existing repository
    pub fn open(workdir: &Path) -> Result<Self> {
        let path = workdir.join(REPO_DIR);
        if !path.is_dir() {
            return Err(Error::NoRepo(workdir.to_path_buf()));
        }

        let config = Config::load_or_default(&path.join("config.toml"))?;

        Ok(Self {
            workdir: workdir.to_path_buf(),
            path,
            config,
        })
    }

    /// working directory the repository tracks
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// repository root path (the .ogit directory)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// repository configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// mutable access to configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// save configuration changes
    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.config_path())
    }

    /// path to config.toml
    pub fn config_path(&self) -> PathBuf {
        self.path.join("config.toml")
    }

    /// path to objects directory
    pub fn objects_path(&self) -> PathBuf {
        self.path.join("objects")
    }

    /// path to refs directory
    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs/heads")
    }

    /// path to the staging index file
    pub fn index_path(&self) -> PathBuf {
        self.path.join("index")
    }

    /// path to tmp directory (for atomic writes)
    pub fn tmp_path(&self) -> PathBuf {
        self.path.join("tmp")
    }

    /// path to lock file
    pub fn lock_path(&self) -> PathBuf {
        self.path.join(".lock")
    }

    /// name of the ref that acts as head
    pub fn head_ref(&self) -> &str {
        &self.config.branch
    }

    /// fresh temp file path for an atomic write
    pub(crate) fn tmp_file(&self) -> Result<PathBuf> {
        let tmp_dir = self.tmp_path();
        std::fs::create_dir_all(&tmp_dir).with_path(&tmp_dir)?;
        Ok(tmp_dir.join(uuid::Uuid::new_v4().to_string()))
    }

    /// acquire exclusive lock on repository
    /// returns a guard that releases the lock on drop
    pub fn lock(&self) -> Result<RepoLock> {
        let lock_path = self.lock_path();
        let file = File::create(&lock_path).with_path(&lock_path)?;

        let flock = Flock::lock(file, FlockArg::LockExclusiveNonblock)
            .map_err(|_| Error::LockContention)?;

        Ok(RepoLock { flock })
    }

    /// try to acquire exclusive lock, returning None if already locked
    pub fn try_lock(&self) -> Result<Option<RepoLock>> {
        let lock_path = self.lock_path();
        let file = File::create(&lock_path).with_path(&lock_path)?;

        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(flock) => Ok(Some(RepoLock { flock })),
            Err((_, nix::errno::Errno::EWOULDBLOCK)) => Ok(None),
            Err(_) => Err(Error::LockContention),
        }
    }
}

/// guard that holds repository lock until dropped
pub struct RepoLock {
    #[allow(dead_code)]
    flock: Flock<File>,
}
// lock is released automatically when Flock is dropped
