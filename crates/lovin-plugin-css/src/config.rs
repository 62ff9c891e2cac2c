//! Options for the lightningcss adapter

/// Configuration for [`crate::LightningCss`].
#[derive(Debug, Clone)]
pub struct LightningCssOptions {
    /// Inline `@import`ed stylesheets during preprocessing.
    ///
    /// Imports resolve relative to the importing file and must stay inside
    /// the style directory handed to the preprocessor.
    pub inline_imports: bool,

    /// Browserslist queries used when minifying, e.g. `vec!["> 0.5%", "not dead"]`.
    ///
    /// Takes precedence over the legacy merge mode requested by the build.
    pub targets: Option<Vec<String>>,
}

impl Default for LightningCssOptions {
    fn default() -> Self {
        Self {
            inline_imports: true,
            targets: None,
        }
    }
}

impl LightningCssOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inline_imports(mut self, enabled: bool) -> Self {
        self.inline_imports = enabled;
        self
    }

    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.targets = Some(targets);
        self
    }
}
