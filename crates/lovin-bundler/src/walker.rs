//! Recursive directory listing.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Error, Result};

/// List every regular file under `dir`, depth first.
///
/// Entries of each directory are visited in file-name order, and a
/// subdirectory's files are listed at the position of the subdirectory
/// itself. Directories are traversed but never yielded. Symlinks are
/// followed; a link that points back at one of its ancestors is reported as
/// [`Error::Walk`].
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `dir` does not exist.
pub fn walk(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|err| Error::Walk {
            root: dir.to_path_buf(),
            message: err.to_string(),
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Like [`walk`], keeping only files whose extension is in `extensions`.
///
/// Extensions are given without the leading dot and compared
/// case-insensitively.
pub fn walk_with_extensions(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    Ok(walk(dir)?
        .into_iter()
        .filter(|path| has_extension(path, extensions))
        .collect())
}

pub(crate) fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
