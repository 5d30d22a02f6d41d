//! File reads and atomic writes
//!
//! A write lands in a staging file next to its target and is renamed over
//! it, so a tsconfig is never observed half-written. The staging file is
//! removed again whenever a step fails.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Sibling of a target file that holds new content until it is committed.
///
/// Dropping it uncommitted deletes it.
struct StagedFile {
    path: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// `.{name}.{pid}.tmp` in the target's directory; same directory keeps
    /// the rename on one filesystem.
    fn beside(target: &Path) -> Self {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        Self {
            path: target.with_file_name(format!(".{name}.{}.tmp", std::process::id())),
            committed: false,
        }
    }

    /// Write and flush `content` while holding an exclusive lock.
    fn fill(&self, target: &Path, content: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;

        let lock_failed = |_| Error::LockFailed {
            path: target.to_path_buf(),
        };
        file.lock_exclusive().map_err(lock_failed)?;
        file.write_all(content)
            .and_then(|()| file.sync_all())
            .map_err(|e| Error::io(&self.path, e))?;
        file.unlock().map_err(lock_failed)
    }

    fn commit(mut self, target: &Path) -> Result<()> {
        fs::rename(&self.path, target).map_err(|e| Error::io(target, e))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path)
            && e.kind() != ErrorKind::NotFound
        {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove staging file");
        }
    }
}

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();

    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let staged = StagedFile::beside(&target);
    staged.fill(&target, content)?;
    staged.commit(&target)?;

    tracing::trace!(path = %path, bytes = content.len(), "wrote file");
    Ok(())
}

/// Read a UTF-8 file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// [`write_atomic`] for text.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
