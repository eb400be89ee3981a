//! Atomic replacement of files on disk.
//!
//! Content is written to a temporary file next to the target, given the
//! target's permissions, flushed and then renamed over the target. A failed
//! write leaves the original untouched. Symlinks are followed, so the link
//! stays in place and the file it points to is replaced.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

/// Replaces `path` with `contents`. Lines in `contents` end in `\n`; they are
/// converted to the platform convention on write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let target = resolve(path)?;
    let path = target.as_path();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;

    let data = platform::line_endings(contents);
    tmp.write_all(&data)
        .map_err(|e| Error::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| Error::io(tmp.path(), e))?;

    match fs::metadata(path) {
        Ok(meta) => platform::copy_attributes(tmp.path(), &meta)?,
        Err(e) => debug!("Not copying attributes of {}: {e}", path.display()),
    }

    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    debug!("Replaced {}", path.display());

    Ok(())
}

/// Final target of `path` after following symlinks. A path that does not
/// exist yet is used as given.
fn resolve(path: &Path) -> Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(target) => {
            if target != path {
                debug!("{} resolves to {}", path.display(), target.display());
            }
            Ok(target)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Copies `path` to `backup`, overwriting any previous backup.
pub fn backup(path: &Path, backup: &Path) -> Result<()> {
    fs::copy(path, backup).map_err(|e| Error::io(backup, e))?;
    debug!("Backed up {} to {}", path.display(), backup.display());
    Ok(())
}

#[cfg(unix)]
mod platform {
    use std::borrow::Cow;
    use std::fs::{self, Metadata};
    use std::os::unix::fs::MetadataExt;
    use std::path::Path;

    use tracing::debug;

    use crate::error::{Error, Result};

    pub fn line_endings(contents: &[u8]) -> Cow<'_, [u8]> {
        Cow::Borrowed(contents)
    }

    /// Mode is required to match; ownership is best effort since only root
    /// may hand a file to another user.
    pub fn copy_attributes(tmp: &Path, meta: &Metadata) -> Result<()> {
        fs::set_permissions(tmp, meta.permissions()).map_err(|e| Error::io(tmp, e))?;

        if let Err(e) = std::os::unix::fs::chown(tmp, Some(meta.uid()), Some(meta.gid())) {
            debug!("Could not copy ownership to {}: {e}", tmp.display());
        }
        Ok(())
    }
}

#[cfg(windows)]
mod platform {
    use std::borrow::Cow;
    use std::fs::{self, Metadata};
    use std::path::Path;

    use crate::error::{Error, Result};

    pub fn line_endings(contents: &[u8]) -> Cow<'_, [u8]> {
        let mut out = Vec::with_capacity(contents.len() + contents.len() / 16);
        for &byte in contents {
            if byte == b'\n' && out.last() != Some(&b'\r') {
                out.push(b'\r');
            }
            out.push(byte);
        }
        Cow::Owned(out)
    }

    pub fn copy_attributes(tmp: &Path, meta: &Metadata) -> Result<()> {
        fs::set_permissions(tmp, meta.permissions()).map_err(|e| Error::io(tmp, e))
    }
}
