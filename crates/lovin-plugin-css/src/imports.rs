//! Source provider backing `@import` inlining.
//!
//! Every stylesheet under the style directory is read up front, so the
//! bundler can borrow file contents from the provider for its whole run.
//! The entry file's text comes from the caller, which may already have
//! transformed it.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lightningcss::bundler::{ResolveResult, SourceProvider};
use path_clean::PathClean;
use walkdir::WalkDir;

pub(crate) struct StyleDirProvider {
    files: HashMap<PathBuf, String>,
}

impl StyleDirProvider {
    pub(crate) fn load(base_dir: &Path, entry: &Path, entry_source: &str) -> io::Result<Self> {
        let mut files = HashMap::new();

        if base_dir.is_dir() {
            for item in WalkDir::new(base_dir).follow_links(true) {
                let item = item.map_err(io::Error::other)?;
                let path = item.path();
                if item.file_type().is_file() && path.extension().is_some_and(|ext| ext == "css") {
                    files.insert(path.clean(), fs::read_to_string(path)?);
                }
            }
        }

        files.insert(entry.clean(), entry_source.to_string());
        Ok(Self { files })
    }
}

impl SourceProvider for StyleDirProvider {
    type Error = io::Error;

    fn read<'a>(&'a self, file: &Path) -> Result<&'a str, Self::Error> {
        self.files
            .get(&file.clean())
            .map(String::as_str)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("'{}' is not a stylesheet in the style directory", file.display()),
                )
            })
    }

    fn resolve(&self, specifier: &str, originating_file: &Path) -> Result<ResolveResult, Self::Error> {
        let dir = originating_file.parent().unwrap_or_else(|| Path::new(""));
        Ok(ResolveResult::File(dir.join(specifier).clean()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn entry_text_overrides_disk() {
        let dir = TempDir::new().unwrap();
        let entry = dir.path().join("main.css");
        fs::write(&entry, "a { color: red }").unwrap();
        fs::write(dir.path().join("base.css"), "b {}").unwrap();

        let provider = StyleDirProvider::load(dir.path(), &entry, "a { color: blue }").unwrap();
        assert_eq!(provider.read(&entry).unwrap(), "a { color: blue }");
        assert_eq!(provider.read(&dir.path().join("base.css")).unwrap(), "b {}");
    }

    #[test]
    fn resolves_relative_to_importer() {
        let dir = TempDir::new().unwrap();
        let entry = dir.path().join("main.css");
        let provider = StyleDirProvider::load(dir.path(), &entry, "").unwrap();

        let resolved = provider
            .resolve("./partials/../base.css", &dir.path().join("sub/x.css"))
            .unwrap();
        match resolved {
            ResolveResult::File(path) => assert_eq!(path, dir.path().join("sub/base.css")),
            other => panic!("unexpected resolution: {other:?}"),
        }
    }

    #[test]
    fn files_outside_style_dir_are_unknown() {
        let dir = TempDir::new().unwrap();
        let styles = dir.path().join("styles");
        fs::create_dir_all(&styles).unwrap();
        fs::write(dir.path().join("secret.css"), "x {}").unwrap();

        let provider = StyleDirProvider::load(&styles, &styles.join("main.css"), "").unwrap();
        let err = provider.read(&dir.path().join("secret.css")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
