use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::lock::ManifestLock;
use super::{HISTORY_LIMIT, MANIFEST_FILE, Manifest, ManifestStore};
use crate::output::writer::write_atomic;
use crate::{Error, Result};

/// Manifest kept as a pretty-printed JSON document on disk.
///
/// A missing or unparsable file reads as an empty manifest. Every
/// [`ManifestStore::record`] holds a [`ManifestLock`] across its
/// read-merge-write, and the document is replaced atomically.
#[derive(Debug, Clone)]
pub struct JsonManifestStore {
    path: PathBuf,
    history_limit: usize,
}

impl JsonManifestStore {
    /// Store at `<dir>/buildManifest.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::at(dir.as_ref().join(MANIFEST_FILE))
    }

    /// Store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            history_limit: HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document without locking.
    fn read(&self) -> Result<Manifest> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Manifest::new()),
            Err(e) => return Err(Error::io("read manifest", &self.path, e)),
        };

        match Manifest::from_json_slice(&bytes) {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                warn!(
                    manifest = %self.path.display(),
                    error = %e,
                    "Manifest is unreadable, starting from an empty one"
                );
                Ok(Manifest::new())
            }
        }
    }
}

impl ManifestStore for JsonManifestStore {
    fn load(&self) -> Result<Manifest> {
        self.read()
    }

    fn record(&self, entries: &[(&str, &str)]) -> Result<Manifest> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io("create directory", parent, e))?;
            }
        }

        let _lock = ManifestLock::acquire(&self.path)?;

        let mut manifest = self.read()?;
        let mut changed = !self.path.exists();
        for (target, filename) in entries {
            changed |= manifest.upsert(target, filename, self.history_limit);
        }

        if changed {
            let text = manifest
                .to_json_pretty()
                .map_err(|e| Error::Manifest(format!("Failed to serialize manifest: {}", e)))?;
            write_atomic(&self.path, text.as_bytes())?;
            debug!(
                manifest = %self.path.display(),
                entries = entries.len(),
                "Manifest updated"
            );
        }

        Ok(manifest)
    }
}
