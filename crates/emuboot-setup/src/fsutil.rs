//! Idempotent directory and symlink helpers

use camino::{Utf8Path, Utf8PathBuf};
use emuboot_core::{EnsureOutcome, Error, Result};
use std::fs;
use std::io;
use tracing::{debug, warn};

/// Create a directory (and parents) unless it already exists
///
/// A non-directory at `path` is left alone and reported as occupied.
pub fn ensure_dir(path: &Utf8Path) -> Result<EnsureOutcome> {
    if path.is_dir() {
        return Ok(EnsureOutcome::Present);
    }
    if fs::symlink_metadata(path).is_ok() {
        warn!("{} exists and is not a directory, leaving it alone", path);
        return Ok(EnsureOutcome::Occupied);
    }
    fs::create_dir_all(path).map_err(|e| Error::fs("create directory", path, e))?;
    debug!("Created directory {}", path);
    Ok(EnsureOutcome::Created)
}

/// Make `link` a symlink to `target` unless something else already lives there
///
/// - a symlink already pointing at `target` is left untouched
/// - a symlink pointing elsewhere (or dangling) is replaced
/// - a real file or directory is left alone and reported as occupied
pub fn ensure_symlink(target: &Utf8Path, link: &Utf8Path) -> Result<EnsureOutcome> {
    match fs::symlink_metadata(link) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let current = fs::read_link(link).map_err(|e| Error::fs("read link", link, e))?;
            if current == target.as_std_path() {
                return Ok(EnsureOutcome::Present);
            }
            debug!(
                "Re-pointing {} from {} to {}",
                link,
                current.display(),
                target
            );
            replace_symlink(target, link)?;
            Ok(EnsureOutcome::Created)
        }
        Ok(_) => {
            warn!("{} exists and is not a symlink, leaving it alone", link);
            Ok(EnsureOutcome::Occupied)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            replace_symlink(target, link)?;
            Ok(EnsureOutcome::Created)
        }
        Err(e) => Err(Error::fs("inspect", link, e)),
    }
}

/// Point `link` at `target`, replacing whatever symlink or file is there
///
/// The new link is created beside `link` and renamed over it, so `link`
/// never goes missing or dangles half-way through.
pub fn replace_symlink(target: &Utf8Path, link: &Utf8Path) -> Result<()> {
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::fs("create directory", parent, e))?;
    }

    let staging = staging_path(link);
    match fs::remove_file(&staging) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::fs("remove", &staging, e)),
    }

    symlink(target, &staging).map_err(|e| Error::fs("create symlink", &staging, e))?;
    fs::rename(&staging, link).map_err(|e| Error::fs("replace", link, e))?;
    debug!("Linked {} -> {}", link, target);
    Ok(())
}

fn staging_path(link: &Utf8Path) -> Utf8PathBuf {
    let name = link.file_name().unwrap_or("link");
    link.with_file_name(format!(".{}.emuboot-new", name))
}

#[cfg(unix)]
fn symlink(target: &Utf8Path, link: &Utf8Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(_target: &Utf8Path, _link: &Utf8Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are only supported on unix",
    ))
}
