//! Contracts for the external tools a build drives.
//!
//! The pipeline never looks inside these tools: source text goes in,
//! transformed text or compiled code comes out. Failures are reported as
//! `anyhow::Error` and surface from the stage as [`crate::Error::Tool`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Expands a stylesheet (imports, mixins, variables) into plain CSS.
pub trait CssPreprocessor: Send + Sync {
    fn name(&self) -> &str;

    /// `base_dir` is the stylesheet directory, for resolving relative imports.
    fn preprocess(&self, source: &str, path: &Path, base_dir: &Path) -> anyhow::Result<String>;
}

/// Settings handed to every [`CssMinifier`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CssMinifyOptions {
    /// How many `/*! ... */` comments survive minification.
    pub keep_special_comments: usize,
    /// Restrict rule merging to what legacy (IE8-era) engines understand.
    pub legacy_merge: bool,
}

impl Default for CssMinifyOptions {
    fn default() -> Self {
        Self {
            keep_special_comments: 1,
            legacy_merge: true,
        }
    }
}

pub trait CssMinifier: Send + Sync {
    fn name(&self) -> &str;

    fn minify(&self, css: &str, path: &Path, options: &CssMinifyOptions) -> anyhow::Result<String>;
}

/// One input of the JavaScript build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsSource {
    pub path: PathBuf,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsMinifyOptions {
    /// Compress and mangle. When false the sources are only concatenated.
    pub compress: bool,
    /// Request a source map; the value is the map's `file` name.
    pub source_map: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsOutput {
    pub code: String,
    pub map: Option<String>,
}

/// Combines the ordered script inputs into one program.
pub trait JsMinifier: Send + Sync {
    fn name(&self) -> &str;

    fn minify(&self, sources: &[JsSource], options: &JsMinifyOptions) -> anyhow::Result<JsOutput>;
}

/// Turns a template's source into a JavaScript expression that the
/// registration statement wraps.
pub trait TemplateCompiler: Send + Sync {
    fn name(&self) -> &str;

    fn precompile(&self, source: &str, name: &str) -> anyhow::Result<String>;
}

/// Identity tools: stylesheets pass unchanged and scripts are concatenated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl CssPreprocessor for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn preprocess(&self, source: &str, _path: &Path, _base_dir: &Path) -> anyhow::Result<String> {
        Ok(source.to_string())
    }
}

impl CssMinifier for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn minify(&self, css: &str, _path: &Path, _options: &CssMinifyOptions) -> anyhow::Result<String> {
        Ok(css.to_string())
    }
}

impl JsMinifier for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn minify(&self, sources: &[JsSource], _options: &JsMinifyOptions) -> anyhow::Result<JsOutput> {
        let mut code = String::new();
        for source in sources {
            code.push_str(&source.code);
            if !source.code.ends_with('\n') {
                code.push('\n');
            }
        }
        Ok(JsOutput { code, map: None })
    }
}

/// Embeds each template's raw source as a function returning the string.
///
/// Useful when templates are rendered at runtime by a client-side compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTemplateCompiler;

impl TemplateCompiler for RawTemplateCompiler {
    fn name(&self) -> &str {
        "raw-template"
    }

    fn precompile(&self, source: &str, _name: &str) -> anyhow::Result<String> {
        let literal = serde_json::to_string(source)?;
        Ok(format!("function() {{ return {}; }}", literal))
    }
}

/// The set of external tools a [`crate::Builder`] drives.
#[derive(Clone)]
pub struct Toolchain {
    pub css_preprocessor: Arc<dyn CssPreprocessor>,
    pub css_minifier: Arc<dyn CssMinifier>,
    pub js_minifier: Arc<dyn JsMinifier>,
    pub template_compiler: Arc<dyn TemplateCompiler>,
}

impl Toolchain {
    /// Tools that leave content untouched.
    pub fn passthrough() -> Self {
        Self {
            css_preprocessor: Arc::new(Passthrough),
            css_minifier: Arc::new(Passthrough),
            js_minifier: Arc::new(Passthrough),
            template_compiler: Arc::new(RawTemplateCompiler),
        }
    }

    pub fn with_css_preprocessor(mut self, tool: impl CssPreprocessor + 'static) -> Self {
        self.css_preprocessor = Arc::new(tool);
        self
    }

    pub fn with_css_minifier(mut self, tool: impl CssMinifier + 'static) -> Self {
        self.css_minifier = Arc::new(tool);
        self
    }

    pub fn with_js_minifier(mut self, tool: impl JsMinifier + 'static) -> Self {
        self.js_minifier = Arc::new(tool);
        self
    }

    pub fn with_template_compiler(mut self, tool: impl TemplateCompiler + 'static) -> Self {
        self.template_compiler = Arc::new(tool);
        self
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::passthrough()
    }
}

impl std::fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolchain")
            .field("css_preprocessor", &self.css_preprocessor.name())
            .field("css_minifier", &self.css_minifier.name())
            .field("js_minifier", &self.js_minifier.name())
            .field("template_compiler", &self.template_compiler.name())
            .finish()
    }
}
