//! Configuration documents for buildlovin apps.
//!
//! An app may carry a `config.yml` next to its sources, and the workspace that
//! holds several apps may carry a shared one. Both are optional. The effective
//! configuration is the shared document deep-merged with the app document.

pub mod config;
pub mod discovery;
pub mod error;
pub mod merge;

// Re-export main types
pub use config::*;
pub use discovery::{CONFIG_FILE_NAMES, ConfigDiscovery, load_if_exists, resolve};
pub use error::*;
pub use merge::{merge_documents, merge_values};
