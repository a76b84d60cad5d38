//! Scratch directory management.

use std::io;
use std::path::Path;

use lion_test_core::Result;

/// Creates `path` and any missing parents. An existing directory is left alone.
///
/// # Errors
/// I/O error naming the directory that could not be created.
pub fn create_directory(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }

    std::fs::create_dir_all(path)
        .map_err(|e| with_path(e, "failed to create directory", path))?;
    tracing::debug!(path = %path.display(), "directory created");
    Ok(())
}

/// Removes `path` with everything below it. A missing directory is a no-op.
///
/// Symbolic links are unlinked, never followed. This includes `path` itself
/// when it is a link to a directory.
///
/// # Errors
/// I/O error naming the entry that could not be read or removed.
pub fn rmdir_recursively(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(with_path(e, "unable to stat", path).into()),
    };

    if metadata.file_type().is_symlink() {
        if path.is_dir() {
            std::fs::remove_file(path).map_err(|e| with_path(e, "failed to unlink", path))?;
            tracing::debug!(path = %path.display(), "directory link removed");
        }
        return Ok(());
    }
    if !metadata.is_dir() {
        return Ok(());
    }

    remove_tree(path)?;
    tracing::debug!(path = %path.display(), "directory removed");
    Ok(())
}

fn remove_tree(dir: &Path) -> Result<()> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| with_path(e, "unable to read directory", dir))?;

    for entry in entries {
        let entry = entry.map_err(|e| with_path(e, "unable to read directory", dir))?;
        let path = entry.path();
        let kind = entry
            .file_type()
            .map_err(|e| with_path(e, "unable to stat", &path))?;

        if kind.is_dir() {
            remove_tree(&path)?;
        } else {
            std::fs::remove_file(&path)
                .map_err(|e| with_path(e, "failed to delete file", &path))?;
        }
    }

    std::fs::remove_dir(dir).map_err(|e| with_path(e, "failed to remove directory", dir))?;
    Ok(())
}

fn with_path(err: io::Error, action: &str, path: &Path) -> io::Error {
    io::Error::new(err.kind(), format!("{action}: {}: {err}", path.display()))
}
