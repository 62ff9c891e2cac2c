//! Shared fixtures for lovin-bundler integration tests.

#![allow(dead_code)]

use lovin_bundler::BuildOptions;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway workspace: `<root>/<app>/...`, output in `<root>/public`.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn app(&self, name: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::create_dir_all(&path).expect("create app dir");
        path
    }

    /// Write `body` to a workspace-relative path, creating parents.
    pub fn write(&self, relative: &str, body: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(&path, body).expect("write fixture");
        path
    }

    pub fn output(&self) -> PathBuf {
        self.root().join("public")
    }

    /// Options writing into `public/` with a per-workspace template scratch.
    pub fn options(&self) -> BuildOptions {
        BuildOptions::new(self.output()).tmptemplate(self.root().join("scratch/templates.js"))
    }

    pub fn read_output(&self, filename: &str) -> String {
        fs::read_to_string(self.output().join(filename)).expect("read output")
    }

    pub fn manifest_json(&self) -> serde_json::Value {
        let text = fs::read_to_string(self.output().join("buildManifest.json")).expect("read manifest");
        serde_json::from_str(&text).expect("parse manifest")
    }

    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(self.output()) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

pub fn md5_hex(text: &str) -> String {
    lovin_bundler::HashAlgorithm::Md5
        .digest(text.as_bytes())
        .to_string()
}
