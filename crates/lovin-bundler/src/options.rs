//! Caller-supplied build options and directory conventions.

use std::path::{Path, PathBuf};

use lovin_config::{AppConfig, VendorPrecedence};

use crate::app::App;
use crate::hash::HashAlgorithm;
use crate::manifest::{HISTORY_LIMIT, MANIFEST_FILE};

/// Directory under the system temp dir holding compiled template units when
/// the caller does not name a scratch file.
pub const DEFAULT_TEMPLATE_SCRATCH: &str = "bltemplates";

/// Options for one build invocation.
///
/// `minify` and `srcmaps` are optional: when unset the app configuration
/// decides, and when that is silent too the defaults apply (minify on,
/// source maps off).
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory receiving artifacts and `buildManifest.json`.
    pub output: PathBuf,
    pub minify: Option<bool>,
    pub srcmaps: Option<bool>,
    /// Selects `vendorDebug` over `vendor`.
    pub debug: bool,
    /// Where the compiled template unit is written before being fed to the
    /// JavaScript minifier.
    pub tmptemplate: Option<PathBuf>,
}

impl BuildOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            minify: None,
            srcmaps: None,
            debug: false,
            tmptemplate: None,
        }
    }

    pub fn minify(mut self, enabled: bool) -> Self {
        self.minify = Some(enabled);
        self
    }

    pub fn srcmaps(mut self, enabled: bool) -> Self {
        self.srcmaps = Some(enabled);
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn tmptemplate(mut self, path: impl Into<PathBuf>) -> Self {
        self.tmptemplate = Some(path.into());
        self
    }

    /// Effective minify flag: options, then configuration, then `true`.
    pub fn resolve_minify(&self, config: &AppConfig) -> bool {
        self.minify.or(config.minify).unwrap_or(true)
    }

    /// Effective source map flag: options, then configuration, then `false`.
    pub fn resolve_srcmaps(&self, config: &AppConfig) -> bool {
        self.srcmaps.or(config.srcmaps).unwrap_or(false)
    }

    /// Scratch path for an app's compiled template unit.
    ///
    /// Without `tmptemplate` each app gets its own file under
    /// `<tmp>/bltemplates/`, named `<app>-<digest of the app's absolute
    /// path>.js`, so same-named apps in different workspaces do not collide.
    pub fn template_scratch(&self, app: &App) -> PathBuf {
        self.tmptemplate.clone().unwrap_or_else(|| {
            let key = HashAlgorithm::Md5.digest(app.root().to_string_lossy().as_bytes());
            std::env::temp_dir()
                .join(DEFAULT_TEMPLATE_SCRATCH)
                .join(format!("{}-{}.js", app.name(), &key.as_hex()[..12]))
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output
    }
}

/// Directory and naming conventions shared by every app in a workspace.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Stylesheet directory inside the app. Older workspaces use `style`.
    pub style_dir: String,
    pub templates_dir: String,
    /// Extensions stripped from template names (without the dot).
    pub template_extensions: Vec<String>,
    /// Extensions picked up as app scripts (without the dot).
    pub script_extensions: Vec<String>,
    /// Stylesheet extension, matched directly inside `style_dir`.
    pub style_extension: String,
    pub manifest_file: String,
    pub hash: HashAlgorithm,
    pub vendor_precedence: VendorPrecedence,
    /// Number of builds remembered per manifest target.
    pub history_limit: usize,
}

impl Default for AppLayout {
    fn default() -> Self {
        Self {
            style_dir: "styles".to_string(),
            templates_dir: "templates".to_string(),
            template_extensions: vec!["hbs".to_string(), "handlebars".to_string()],
            script_extensions: vec!["js".to_string()],
            style_extension: "css".to_string(),
            manifest_file: MANIFEST_FILE.to_string(),
            hash: HashAlgorithm::default(),
            vendor_precedence: VendorPrecedence::default(),
            history_limit: HISTORY_LIMIT,
        }
    }
}

impl AppLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style_dir(mut self, name: impl Into<String>) -> Self {
        self.style_dir = name.into();
        self
    }

    pub fn with_templates_dir(mut self, name: impl Into<String>) -> Self {
        self.templates_dir = name.into();
        self
    }

    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_vendor_precedence(mut self, precedence: VendorPrecedence) -> Self {
        self.vendor_precedence = precedence;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn with_manifest_file(mut self, name: impl Into<String>) -> Self {
        self.manifest_file = name.into();
        self
    }
}
