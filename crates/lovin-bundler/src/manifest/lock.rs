//! Mutual exclusion for manifest read-merge-write cycles.
//!
//! Two layers: a process-wide mutex per manifest path, so threads of one
//! process queue up, and an OS advisory lock on `<manifest>.lock`, so
//! separate processes building into the same directory do too.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use fs4::fs_std::FileExt;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RawMutex};
use parking_lot::lock_api::ArcMutexGuard;
use tracing::debug;

use crate::{Error, Result};

static PROCESS_LOCKS: Lazy<DashMap<PathBuf, Arc<Mutex<()>>>> = Lazy::new(DashMap::new);

/// Held for the duration of one manifest update. Released on drop.
pub struct ManifestLock {
    // Field order matters: the OS lock is released before the process mutex.
    _file: File,
    _guard: ArcMutexGuard<RawMutex, ()>,
    path: PathBuf,
}

impl ManifestLock {
    /// Block until the manifest at `manifest_path` is exclusively ours.
    ///
    /// The manifest's directory must exist.
    pub fn acquire(manifest_path: &Path) -> Result<Self> {
        let key = lock_key(manifest_path);
        let mutex = PROCESS_LOCKS
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_arc();

        let lock_path = sidecar_path(&key);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                Error::Manifest(format!(
                    "Failed to open lock file '{}': {}",
                    lock_path.display(),
                    e
                ))
            })?;
        file.lock_exclusive().map_err(|e| {
            Error::Manifest(format!(
                "Failed to lock '{}': {}",
                lock_path.display(),
                e
            ))
        })?;

        debug!(manifest = %key.display(), "Manifest lock acquired");

        Ok(Self {
            _file: file,
            _guard: guard,
            path: key,
        })
    }

    /// The manifest path this lock protects.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for ManifestLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestLock")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Drop for ManifestLock {
    fn drop(&mut self) {
        debug!(manifest = %self.path.display(), "Manifest lock released");
    }
}

/// Canonical form of the manifest path so `out/x.json` and `./out/x.json`
/// share a lock. Only the directory is canonicalized since the file may not
/// exist yet.
fn lock_key(manifest_path: &Path) -> PathBuf {
    match (manifest_path.parent(), manifest_path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|dir| dir.join(name))
                .unwrap_or_else(|_| manifest_path.to_path_buf())
        }
        _ => manifest_path.to_path_buf(),
    }
}

fn sidecar_path(manifest_path: &Path) -> PathBuf {
    let mut name = manifest_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    manifest_path.with_file_name(name)
}
