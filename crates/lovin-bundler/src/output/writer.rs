//! Writing artifacts into the output directory.
//!
//! Artifact names are checked to stay inside the output directory, and each
//! file is written to a temporary sibling first and renamed into place, so a
//! reader never sees a half-written file. If any write of a batch fails the
//! temporaries are removed; files already renamed are immutable and
//! content-addressed, so they are left alone.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use path_clean::PathClean;
use tracing::{debug, warn};

use super::{Artifact, WrittenArtifact};
use crate::{Error, Result};

/// Write a batch of artifacts into `dir`, creating it if needed.
///
/// # Examples
///
/// ```no_run
/// use lovin_bundler::output::write_artifacts;
/// use lovin_bundler::{Artifact, HashAlgorithm};
/// use std::path::Path;
///
/// # fn example() -> lovin_bundler::Result<()> {
/// let css = Artifact::hashed("shop-main", ".css", "a{}".into(), HashAlgorithm::Md5);
/// let written = write_artifacts(Path::new("public/assets"), &[css])?;
/// assert_eq!(written.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> Result<Vec<WrittenArtifact>> {
    let dir = normalize_dir(dir)?;

    fs::create_dir_all(&dir).map_err(|e| {
        Error::WriteFailure(format!(
            "Failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut operations = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let target_path = validate_output_path(&dir, artifact.filename())?;
        operations.push((target_path, artifact.contents().as_bytes()));
    }

    write_files_atomic(&operations)?;

    Ok(artifacts
        .iter()
        .zip(operations)
        .map(|(artifact, (path, _))| {
            debug!(file = %path.display(), target = artifact.target(), "Wrote artifact");
            WrittenArtifact {
                target: artifact.target().to_string(),
                filename: artifact.filename().to_string(),
                path,
                hash: artifact.hash().clone(),
            }
        })
        .collect())
}

/// Write one file through a temporary sibling and a rename.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    write_files_atomic(&[(path.to_path_buf(), content)])
}

/// Resolve `.`/`..` and make the directory absolute.
fn normalize_dir(dir: &Path) -> Result<PathBuf> {
    let cleaned = dir.clean();

    if cleaned.is_absolute() {
        return Ok(cleaned);
    }

    Ok(std::env::current_dir()
        .map_err(|e| Error::InvalidOutputPath(format!("Failed to get current directory: {}", e)))?
        .join(&cleaned)
        .clean())
}

/// Join `filename` onto `base_dir`, refusing anything that escapes it.
fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.is_empty() {
        return Err(Error::InvalidOutputPath("Filename is empty".to_string()));
    }

    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();

    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    name.push(format!(".{}.{}.tmp", std::process::id(), seq));
    target.with_file_name(name)
}

/// Two-phase write: every file to a temporary, then every rename.
fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut temp_files = Vec::new();

    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&temp_files);
                Error::WriteFailure(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = temp_path_for(target_path);
        fs::write(&temp_path, content).map_err(|e| {
            cleanup_temp_files(&temp_files);
            Error::WriteFailure(format!(
                "Failed to write temporary file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;

        temp_files.push((temp_path, target_path.clone()));
    }

    for (temp_path, target_path) in &temp_files {
        fs::rename(temp_path, target_path).map_err(|e| {
            cleanup_temp_files(&temp_files);
            Error::WriteFailure(format!(
                "Failed to rename '{}' to '{}': {}",
                temp_path.display(),
                target_path.display(),
                e
            ))
        })?;
    }

    Ok(())
}

/// Best-effort removal of leftover temporaries.
fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in temp_files {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                warn!(
                    file = %temp_path.display(),
                    error = %e,
                    "Failed to clean up temporary file"
                );
            }
        }
    }
}
