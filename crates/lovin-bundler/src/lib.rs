#![cfg_attr(docsrs, feature(doc_cfg))]

//! # lovin-bundler
//!
//! Content-addressed CSS and JavaScript builds for single-page "apps".
//!
//! An app is a directory holding scripts, an optional `styles` directory and
//! an optional `templates` directory. Building an app writes files named
//! after a hash of their content (`shop-3f1a….js`, `shop-main-9bc2….css`)
//! and records them in `buildManifest.json`, which maps each logical asset
//! name to its two most recent builds.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lovin_bundler::{BuildOptions, Builder};
//!
//! # fn main() -> lovin_bundler::Result<()> {
//! let options = BuildOptions::new("public/assets").minify(true);
//! let build = Builder::default().build_app("apps/shop", &options)?;
//!
//! for artifact in build.artifacts() {
//!     println!("{} -> {}", artifact.target, artifact.filename);
//! }
//! # Ok(()) }
//! ```
//!
//! ## External tools
//!
//! CSS preprocessing, minification and template compilation are pluggable
//! through the traits in [`tools`]. [`Toolchain::passthrough`] leaves text
//! untouched; the `lovin-plugin-css` and `lovin-plugin-js` crates provide
//! real implementations.

pub mod app;
pub mod hash;
pub mod manifest;
pub mod options;
pub mod output;
pub mod sources;
pub mod stages;
pub mod templates;
pub mod tools;
pub mod walker;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use app::App;
pub use hash::{ContentHash, HashAlgorithm};
pub use manifest::{
    HISTORY_LIMIT, JsonManifestStore, MANIFEST_FILE, Manifest, ManifestStore,
    MemoryManifestStore, logical_target, update_manifest,
};
pub use options::{AppLayout, BuildOptions};
pub use output::{Artifact, WrittenArtifact};
pub use sources::{SourceSet, assemble_sources};
pub use stages::{AppBuild, Builder, StageOutput, build_app, build_app_css, build_app_js};
pub use templates::{TemplateAggregator, TemplateUnit};
pub use tools::{
    CssMinifier, CssMinifyOptions, CssPreprocessor, JsMinifier, JsMinifyOptions, JsOutput,
    JsSource, Passthrough, RawTemplateCompiler, TemplateCompiler, Toolchain,
};

// Re-export the configuration layer
pub use lovin_config::{AppConfig, ConfigError, VendorPrecedence};

use std::path::PathBuf;

/// Error types for lovin-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A directory that must exist does not.
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid configuration or build options provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Directory traversal failed (unreadable entry, symlink loop).
    #[error("Walk error under {}: {message}", root.display())]
    Walk { root: PathBuf, message: String },

    /// An external tool (preprocessor, minifier, template compiler) failed.
    #[error("{tool} failed on {}: {message}", path.display())]
    Tool {
        tool: String,
        path: PathBuf,
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with context message.
    #[error("{message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// The manifest could not be locked or persisted.
    #[error("Manifest error: {0}")]
    Manifest(String),
}

/// Result type alias for lovin-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error with a message naming the path involved.
    pub(crate) fn io(action: &str, path: &std::path::Path, source: std::io::Error) -> Self {
        Error::IoError {
            message: format!("Failed to {} '{}': {}", action, path.display(), source),
            source,
        }
    }

    /// Wrap an external tool failure.
    pub(crate) fn tool(tool: &str, path: &std::path::Path, err: anyhow::Error) -> Self {
        Error::Tool {
            tool: tool.to_string(),
            path: path.to_path_buf(),
            message: format!("{:#}", err),
        }
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::NotFound(_) => "NOT_FOUND",
            Error::Config(_) => "CONFIG_ERROR",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Walk { .. } => "WALK_ERROR",
            Error::Tool { .. } => "TOOL_FAILURE",
            Error::Io(_) => "IO_ERROR",
            Error::IoError { .. } => "IO_ERROR",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::Manifest(_) => "MANIFEST_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::NotFound(path) => Some(Box::new(format!(
                "Check that '{}' exists and is a directory.",
                path.display()
            ))),
            Error::Config(err) => Some(Box::new(format!(
                "Check config.yml in the app directory and its parent.\nError: {}",
                err
            ))),
            Error::Walk { .. } => Some(Box::new(
                "A directory could not be read or a symlink points back at one of its ancestors."
                    .to_string(),
            )),
            Error::Tool { tool, path, .. } => Some(Box::new(format!(
                "{} rejected '{}'. Fix the source file and rebuild.",
                tool,
                path.display()
            ))),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{}' is invalid. Artifact names must stay inside the output directory.",
                path
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            Error::Manifest(msg) => Some(Box::new(format!(
                "Another build may be holding the manifest lock, or the output directory is read-only.\nError: {}",
                msg
            ))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;
    use std::path::Path;

    #[test]
    fn tool_error_keeps_context_chain() {
        let err = anyhow::anyhow!("unexpected token").context("parsing main.css");
        let err = Error::tool("lightningcss", Path::new("styles/main.css"), err);
        let text = err.to_string();
        assert!(text.contains("lightningcss failed on styles/main.css"));
        assert!(text.contains("parsing main.css: unexpected token"));
    }

    #[test]
    fn diagnostic_codes_are_stable() {
        let err = Error::NotFound(PathBuf::from("apps/missing"));
        assert_eq!(err.code().unwrap().to_string(), "NOT_FOUND");
        assert!(err.help().is_some());

        let err = Error::Manifest("locked".to_string());
        assert_eq!(err.code().unwrap().to_string(), "MANIFEST_ERROR");
    }
}
