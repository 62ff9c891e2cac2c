use parking_lot::Mutex;

use super::{HISTORY_LIMIT, Manifest, ManifestStore};
use crate::Result;

/// Manifest held in memory, for embedders that persist it themselves.
#[derive(Debug, Default)]
pub struct MemoryManifestStore {
    manifest: Mutex<Manifest>,
    history_limit: Option<usize>,
}

impl MemoryManifestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit.max(1));
        self
    }

    /// Take a copy of the current manifest.
    pub fn snapshot(&self) -> Manifest {
        self.manifest.lock().clone()
    }
}

impl ManifestStore for MemoryManifestStore {
    fn load(&self) -> Result<Manifest> {
        Ok(self.snapshot())
    }

    fn record(&self, entries: &[(&str, &str)]) -> Result<Manifest> {
        let limit = self.history_limit.unwrap_or(HISTORY_LIMIT);
        let mut manifest = self.manifest.lock();
        for (target, filename) in entries {
            manifest.upsert(target, filename, limit);
        }
        Ok(manifest.clone())
    }
}
