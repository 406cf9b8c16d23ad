//! Filesystem helpers
//!
//! The handful of directory and file primitives every table operation is
//! built from.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{self, Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::config::WriteMode;
use crate::error::Result;

/// Suffix counter for temp files, unique within the process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Make sure `path` exists as a directory
///
/// An existing directory is success. Anything else (permission denied, a
/// regular file in the way) is returned to the caller.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    trace!(path = %path.display(), "creating directory");
    fs::create_dir_all(path)?;
    Ok(())
}

/// Whether `name` joins onto a directory as exactly one child entry
///
/// Rejects separators, NUL, `.`/`..`, and anything absolute or carrying a
/// drive prefix, so `dir.join(name)` can never leave `dir`.
pub fn is_single_segment(name: &str) -> bool {
    if name.is_empty() || name.contains('\0') || name.chars().any(path::is_separator) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Replace the whole contents of the file at `path`
pub fn write_file(path: &Path, bytes: &[u8], mode: WriteMode, sync: bool) -> Result<()> {
    match mode {
        WriteMode::Direct => {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?;
            file.write_all(bytes)?;
            if sync {
                file.sync_all()?;
            }
        }
        WriteMode::Atomic => {
            let temp = temp_path(path);
            if let Err(e) = write_temp(&temp, bytes, sync) {
                let _ = fs::remove_file(&temp);
                return Err(e);
            }
            if let Err(e) = fs::rename(&temp, path) {
                let _ = fs::remove_file(&temp);
                return Err(e.into());
            }
        }
    }
    trace!(path = %path.display(), len = bytes.len(), "wrote file");
    Ok(())
}

fn write_temp(temp: &Path, bytes: &[u8], sync: bool) -> Result<()> {
    let mut file = File::create(temp)?;
    file.write_all(bytes)?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

/// Sibling temp name: "apple.ns" → ".apple.ns.tmp<pid>-<n>"
fn temp_path(path: &Path) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp{}-{}", name, std::process::id(), n))
}

/// Delete a single file, reporting one removal
pub fn remove_file(path: &Path) -> Result<usize> {
    fs::remove_file(path)?;
    trace!(path = %path.display(), "removed file");
    Ok(1)
}

/// Delete a directory tree bottom-up, returning how many files went with it
///
/// Directories themselves are not counted. Symlinks are unlinked, never
/// followed.
pub fn remove_dir(path: &Path) -> Result<usize> {
    let metadata = fs::symlink_metadata(path)?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a directory: {}", path.display()),
        )
        .into());
    }

    let mut removed = 0;
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let child = entry.path();
        if entry.file_type()?.is_dir() {
            removed += remove_dir(&child)?;
        } else {
            removed += remove_file(&child)?;
        }
    }

    fs::remove_dir(path)?;
    Ok(removed)
}
