//! File-based config discovery
//!
//! Finds the shared configuration one level above an app and the app's own
//! configuration, loads whichever exist, and merges them.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{ConfigError, Result};
use crate::merge::merge_documents;

/// Accepted configuration file names, in lookup order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["config.yml", "config.yaml", "config.json"];

/// Locates and loads the two configuration layers of an app.
///
/// # Example
///
/// ```no_run
/// use lovin_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new("apps/dashboard");
/// let config = discovery.resolve().unwrap();
/// ```
pub struct ConfigDiscovery {
    app: PathBuf,
}

impl ConfigDiscovery {
    /// Create a discovery for an app directory.
    pub fn new(app: impl AsRef<Path>) -> Self {
        Self {
            app: app.as_ref().to_path_buf(),
        }
    }

    /// The app directory itself.
    pub fn app_dir(&self) -> &Path {
        &self.app
    }

    /// The directory holding the shared configuration (the app's parent).
    pub fn shared_dir(&self) -> &Path {
        match self.app.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Find the first existing config file in a directory.
    pub fn find_in(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load the shared document, if present.
    pub fn load_shared(&self) -> Result<Option<Value>> {
        match Self::find_in(self.shared_dir()) {
            Some(path) => load_if_exists(&path),
            None => Ok(None),
        }
    }

    /// Load the app-level document, if present.
    pub fn load_app(&self) -> Result<Option<Value>> {
        match Self::find_in(&self.app) {
            Some(path) => load_if_exists(&path),
            None => Ok(None),
        }
    }

    /// The merged document: shared first, app-level on top.
    pub fn resolve_value(&self) -> Result<Value> {
        let shared = self.load_shared()?;
        let app = self.load_app()?;
        debug!(
            app = %self.app.display(),
            shared = shared.is_some(),
            local = app.is_some(),
            "Resolved configuration layers"
        );
        Ok(merge_documents(shared, app))
    }

    /// The effective typed configuration.
    pub fn resolve(&self) -> Result<AppConfig> {
        AppConfig::from_value(self.resolve_value()?)
    }
}

/// Load a configuration document, treating a missing file as absent.
///
/// A file that exists but cannot be parsed is an error, as is a document
/// whose top level is not a mapping. An empty file loads as an empty mapping.
pub fn load_if_exists(path: &Path) -> Result<Option<Value>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let value = parse_document(path, &content)?;
    match value {
        Value::Null => Ok(Some(Value::Object(serde_json::Map::new()))),
        Value::Object(_) => Ok(Some(value)),
        _ => Err(ConfigError::NotAMapping(path.to_path_buf())),
    }
}

fn parse_document(path: &Path, content: &str) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yml") | Some("yaml") => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
        Some("json") => serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Resolve the effective configuration of an app (convenience function)
///
/// # Example
///
/// ```no_run
/// use lovin_config::resolve;
///
/// let config = resolve("apps/dashboard").unwrap();
/// assert!(config.includes_default_vendor());
/// ```
pub fn resolve(app: impl AsRef<Path>) -> Result<AppConfig> {
    ConfigDiscovery::new(app).resolve()
}
