use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{Error, IoResultExt, Result};

/// replace `dest` with `content` atomically
///
/// the bytes go to `tmp_path` first, are fsynced, then renamed over `dest`;
/// the parent directory is fsynced last so the rename itself is durable.
/// `tmp_path` must live on the same filesystem as `dest`.
pub fn atomic_write(tmp_path: &Path, dest: &Path, content: &[u8]) -> Result<()> {
    {
        let mut tmp_file = File::create(tmp_path).with_path(tmp_path)?;
        tmp_file.write_all(content).with_path(tmp_path)?;
        tmp_file.sync_all().with_path(tmp_path)?;
    }

    if let Err(e) = fs::rename(tmp_path, dest) {
        let _ = fs::remove_file(tmp_path);
        return Err(Error::Io {
            path: dest.to_path_buf(),
            source: e,
        });
    }

    if let Some(parent) = dest.parent() {
        fsync_dir(parent)?;
    }

    Ok(())
}

/// sync a directory to disk
pub fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_path(path)?;
    dir.sync_all().with_path(path)?;
    Ok(())
}
