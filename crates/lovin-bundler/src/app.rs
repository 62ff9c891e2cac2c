//! The app directory and the paths derived from it.

use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::options::AppLayout;
use crate::{Error, Result};

/// One buildable app: a directory and the name taken from it.
///
/// The path is made absolute on construction so vendor paths, which are
/// relative to the app's parent, resolve the same way from any working
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    root: PathBuf,
    name: String,
}

impl App {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let root = absolutize(path.as_ref())?;
        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "App path '{}' has no usable directory name",
                    path.as_ref().display()
                ))
            })?;

        Ok(Self { root, name })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The directory holding this app and its siblings.
    pub fn workspace_dir(&self) -> &Path {
        self.root.parent().unwrap_or(&self.root)
    }

    pub fn style_dir(&self, layout: &AppLayout) -> PathBuf {
        self.root.join(&layout.style_dir)
    }

    pub fn templates_dir(&self, layout: &AppLayout) -> PathBuf {
        self.root.join(&layout.templates_dir)
    }

    /// Resolve a workspace-relative path (such as a vendor file).
    pub fn resolve_workspace_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.workspace_dir().join(relative).clean()
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    let cleaned = path.clean();
    if cleaned.is_absolute() {
        return Ok(cleaned);
    }

    let cwd = std::env::current_dir().map_err(|e| Error::IoError {
        message: format!("Failed to get current directory: {}", e),
        source: e,
    })?;
    Ok(cwd.join(cleaned).clean())
}
