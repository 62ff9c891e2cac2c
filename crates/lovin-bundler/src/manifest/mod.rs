//! The build manifest: logical asset name to its most recent builds.
//!
//! ```json
//! {
//!   "shop.js": ["shop-9c1f….js", "shop-77ab….js"],
//!   "shop-main.css": ["shop-main-0d3e….css"]
//! }
//! ```
//!
//! Deployed pages look up the newest filename for a target; the previous one
//! is kept so clients holding the old page can still fetch their assets.

mod json;
mod lock;
mod memory;

pub use json::JsonManifestStore;
pub use lock::ManifestLock;
pub use memory::MemoryManifestStore;

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Result;

/// Manifest file name inside the output directory.
pub const MANIFEST_FILE: &str = "buildManifest.json";

/// Builds remembered per target.
pub const HISTORY_LIMIT: usize = 2;

/// Target name to filenames, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: IndexMap<String, Vec<String>>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Parse raw bytes; invalid UTF-8 is reported as a parse error.
    pub fn from_json_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Pretty-printed with two-space indentation.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Put `filename` at the front of `target`'s history, keeping at most
    /// `limit` entries.
    ///
    /// Returns `false` if `filename` is already the most recent entry, in
    /// which case nothing changes. A filename found further back moves to
    /// the front instead of appearing twice.
    ///
    /// # Example
    ///
    /// ```
    /// use lovin_bundler::Manifest;
    ///
    /// let mut manifest = Manifest::new();
    /// manifest.upsert("shop.js", "shop-1.js", 2);
    /// manifest.upsert("shop.js", "shop-2.js", 2);
    /// manifest.upsert("shop.js", "shop-3.js", 2);
    /// assert_eq!(manifest.history("shop.js").unwrap(), ["shop-3.js", "shop-2.js"]);
    /// ```
    pub fn upsert(&mut self, target: &str, filename: &str, limit: usize) -> bool {
        let history = self.entries.entry(target.to_string()).or_default();

        if history.first().map(String::as_str) == Some(filename) {
            return false;
        }

        history.retain(|existing| existing != filename);
        history.insert(0, filename.to_string());
        history.truncate(limit.max(1));
        true
    }

    pub fn history(&self, target: &str) -> Option<&[String]> {
        self.entries.get(target).map(Vec::as_slice)
    }

    /// The most recent filename for `target`.
    pub fn latest(&self, target: &str) -> Option<&str> {
        self.entries
            .get(target)
            .and_then(|h| h.first())
            .map(String::as_str)
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Persistent home of a [`Manifest`].
///
/// Implementations must make [`ManifestStore::record`] atomic with respect
/// to other writers of the same store: concurrent builds sharing an output
/// directory may not lose each other's entries.
pub trait ManifestStore: Send + Sync {
    /// Current manifest contents.
    fn load(&self) -> Result<Manifest>;

    /// Apply `(target, filename)` updates in order and return the result.
    fn record(&self, entries: &[(&str, &str)]) -> Result<Manifest>;

    /// Record a single build.
    fn upsert(&self, target: &str, filename: &str) -> Result<()> {
        self.record(&[(target, filename)]).map(|_| ())
    }
}

/// Derive the logical target from a hashed filename.
///
/// The last `-` separated segment is taken as `<hash><extension>`, where the
/// extension starts at the segment's first dot:
///
/// ```
/// use lovin_bundler::logical_target;
///
/// assert_eq!(logical_target("shop-9c1f.js").as_deref(), Some("shop.js"));
/// assert_eq!(logical_target("shop-main-0d3e.css").as_deref(), Some("shop-main.css"));
/// assert_eq!(logical_target("shop-9c1f.js.map.js").as_deref(), Some("shop.js.map.js"));
/// assert_eq!(logical_target("unhashed.js"), None);
/// ```
///
/// Names containing hyphens after the hash are ambiguous; prefer the target
/// carried by [`crate::WrittenArtifact`] when it is available.
pub fn logical_target(filename: &str) -> Option<String> {
    let basename = Path::new(filename).file_name()?.to_str()?;
    let (stem, hashed) = basename.rsplit_once('-')?;
    if stem.is_empty() || hashed.is_empty() {
        return None;
    }

    let extension = hashed.find('.').map(|i| &hashed[i..]).unwrap_or("");
    Some(format!("{}{}", stem, extension))
}

/// Record already-written filenames in `<output>/buildManifest.json`,
/// deriving each target from its name.
///
/// Filenames without a hash segment are skipped with a warning.
pub fn update_manifest<S: AsRef<str>>(output: &Path, filenames: &[S]) -> Result<Manifest> {
    let mut entries = Vec::with_capacity(filenames.len());
    for filename in filenames {
        let filename = filename.as_ref();
        let basename = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(filename);
        match logical_target(basename) {
            Some(target) => entries.push((target, basename.to_string())),
            None => warn!(file = filename, "No hash segment in filename, not recorded"),
        }
    }

    let pairs: Vec<(&str, &str)> = entries
        .iter()
        .map(|(t, f)| (t.as_str(), f.as_str()))
        .collect();
    JsonManifestStore::in_dir(output).record(&pairs)
}
