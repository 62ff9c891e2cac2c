//! Ordered JavaScript inputs for one app build.

use std::path::{Path, PathBuf};

use lovin_config::AppConfig;
use tracing::debug;

use crate::app::App;
use crate::options::AppLayout;
use crate::walker::walk_with_extensions;
use crate::Result;

/// Ordered list of script paths. A path appears at most once; the first
/// position it was placed at wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    files: Vec<PathBuf>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless it is already present.
    pub fn push(&mut self, path: PathBuf) -> bool {
        if self.contains(&path) {
            return false;
        }
        self.files.push(path);
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|p| p == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.files
    }
}

impl IntoIterator for SourceSet {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a SourceSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Assemble the inputs of an app's JavaScript build.
///
/// Order: vendor files in declaration order, then the template unit (if
/// any), then every script found under the app directory in walk order.
/// Vendor files are skipped entirely when the configuration sets
/// `defaultVendor: false`; `debug` selects the `vendorDebug` mapping as
/// governed by the layout's vendor precedence.
pub fn assemble_sources(
    app: &App,
    config: &AppConfig,
    layout: &AppLayout,
    template_unit: Option<&Path>,
    debug: bool,
) -> Result<SourceSet> {
    let mut set = SourceSet::new();

    if config.includes_default_vendor() {
        if let Some(vendor) = config.vendor_map(debug, layout.vendor_precedence) {
            for (name, relative) in vendor {
                let path = app.resolve_workspace_path(relative);
                debug!(vendor = %name, path = %path.display(), "Including vendor file");
                set.push(path);
            }
        }
    }

    if let Some(unit) = template_unit {
        set.push(unit.to_path_buf());
    }

    for file in walk_with_extensions(app.root(), &layout.script_extensions)? {
        set.push(file);
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        app: App,
    }

    fn fixture(files: &[&str]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("shop");
        fs::create_dir_all(&root).unwrap();
        for rel in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        let app = App::new(&root).unwrap();
        Fixture { _dir: dir, app }
    }

    fn names(set: &SourceSet, root: &Path) -> Vec<String> {
        set.iter()
            .map(|p| match p.strip_prefix(root) {
                Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
                Err(_) => p.to_string_lossy().into_owned(),
            })
            .collect()
    }

    #[test]
    fn app_scripts_only() {
        let fx = fixture(&["app.js", "models/user.js", "styles/main.css", "data.json"]);
        let set = assemble_sources(
            &fx.app,
            &AppConfig::default(),
            &AppLayout::default(),
            None,
            false,
        )
        .unwrap();

        assert_eq!(names(&set, fx.app.root()), ["app.js", "models/user.js"]);
    }

    #[test]
    fn vendors_then_templates_then_app() {
        let fx = fixture(&["app.js"]);
        let config = AppConfig::from_value(json!({
            "vendor": { "a": "vendor/p1.js", "b": "vendor/p2.js" }
        }))
        .unwrap();
        let unit = PathBuf::from("/tmp/bltemplates");

        let set = assemble_sources(
            &fx.app,
            &config,
            &AppLayout::default(),
            Some(&unit),
            false,
        )
        .unwrap();

        let workspace = fx.app.workspace_dir();
        assert_eq!(
            set.as_slice(),
            [
                workspace.join("vendor/p1.js"),
                workspace.join("vendor/p2.js"),
                unit.clone(),
                fx.app.root().join("app.js"),
            ]
        );
    }

    #[test]
    fn default_vendor_false_skips_vendors() {
        let fx = fixture(&["app.js"]);
        let config = AppConfig::from_value(json!({
            "defaultVendor": false,
            "vendor": { "a": "vendor/p1.js" }
        }))
        .unwrap();

        let set =
            assemble_sources(&fx.app, &config, &AppLayout::default(), None, false).unwrap();
        assert_eq!(names(&set, fx.app.root()), ["app.js"]);
    }

    #[test]
    fn debug_builds_use_debug_vendors() {
        let fx = fixture(&[]);
        let config = AppConfig::from_value(json!({
            "vendor": { "ember": "vendor/ember.min.js" },
            "vendorDebug": { "ember": "vendor/ember.js" }
        }))
        .unwrap();

        let set = assemble_sources(&fx.app, &config, &AppLayout::default(), None, true).unwrap();
        assert_eq!(
            set.as_slice(),
            [fx.app.workspace_dir().join("vendor/ember.js")]
        );
    }

    #[test]
    fn empty_vendor_map_changes_nothing() {
        let fx = fixture(&["b.js", "a.js"]);
        let empty = AppConfig::from_value(json!({ "vendor": {} })).unwrap();

        let with_empty =
            assemble_sources(&fx.app, &empty, &AppLayout::default(), None, false).unwrap();
        let without = assemble_sources(
            &fx.app,
            &AppConfig::default(),
            &AppLayout::default(),
            None,
            false,
        )
        .unwrap();

        assert_eq!(with_empty, without);
        assert_eq!(names(&with_empty, fx.app.root()), ["a.js", "b.js"]);
    }

    #[test]
    fn duplicate_paths_keep_first_position() {
        let fx = fixture(&["lib/shared.js", "main.js"]);
        let config = AppConfig::from_value(json!({
            "vendor": { "shared": "shop/lib/shared.js" }
        }))
        .unwrap();

        let set =
            assemble_sources(&fx.app, &config, &AppLayout::default(), None, false).unwrap();
        assert_eq!(names(&set, fx.app.root()), ["lib/shared.js", "main.js"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn owned_iteration_keeps_order() {
        let mut set = SourceSet::new();
        set.push(PathBuf::from("vendor/jquery.js"));
        set.push(PathBuf::from("main.js"));
        set.push(PathBuf::from("vendor/jquery.js"));

        let borrowed: Vec<PathBuf> = (&set).into_iter().cloned().collect();
        let owned: Vec<PathBuf> = set.into_iter().collect();
        assert_eq!(owned, borrowed);
        assert_eq!(owned, [PathBuf::from("vendor/jquery.js"), PathBuf::from("main.js")]);
    }

    #[test]
    fn missing_app_directory_fails() {
        let dir = TempDir::new().unwrap();
        let app = App::new(dir.path().join("ghost")).unwrap();
        let result = assemble_sources(
            &app,
            &AppConfig::default(),
            &AppLayout::default(),
            None,
            false,
        );
        assert!(matches!(result, Err(crate::Error::NotFound(_))));
    }
}
