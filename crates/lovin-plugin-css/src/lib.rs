//! lightningcss adapter for the buildlovin CSS stage
//!
//! [`LightningCss`] implements both stylesheet tools the bundler drives:
//!
//! - **Preprocessing**: `@import` statements are inlined, resolved relative
//!   to the importing file and confined to the app's style directory. The
//!   result is printed unminified.
//! - **Minification**: whitespace removal, rule merging and shorthand
//!   folding. Special `/*! ... */` comments are kept up to the requested
//!   count, and the legacy merge mode targets IE 8 so merged selectors stay
//!   readable by old engines.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lovin_bundler::{BuildOptions, Builder, Toolchain};
//! use lovin_plugin_css::LightningCss;
//!
//! # fn example() -> lovin_bundler::Result<()> {
//! let toolchain = Toolchain::passthrough()
//!     .with_css_preprocessor(LightningCss::new())
//!     .with_css_minifier(LightningCss::new());
//!
//! Builder::new(toolchain).build_app_css("apps/shop", &BuildOptions::new("public"))?;
//! # Ok(())
//! # }
//! ```

mod config;
mod imports;

pub use config::LightningCssOptions;

use std::path::Path;

use lightningcss::{
    bundler::Bundler,
    printer::PrinterOptions,
    stylesheet::{MinifyOptions, ParserOptions, StyleSheet},
    targets::{Browsers, Targets},
};
use lovin_bundler::{CssMinifier, CssMinifyOptions, CssPreprocessor};
use tracing::debug;

use crate::imports::StyleDirProvider;

/// IE 8, encoded the way lightningcss encodes browser versions (major << 16).
const IE8: u32 = 8 << 16;

#[derive(Debug, Clone, Default)]
pub struct LightningCss {
    options: LightningCssOptions,
}

impl LightningCss {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LightningCssOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LightningCssOptions {
        &self.options
    }

    fn targets(&self, options: &CssMinifyOptions) -> anyhow::Result<Targets> {
        if let Some(queries) = &self.options.targets {
            let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str))
                .map_err(|e| anyhow::anyhow!("Invalid browser targets {:?}: {}", queries, e))?;
            return Ok(Targets::from(browsers.unwrap_or_default()));
        }

        if options.legacy_merge {
            return Ok(Targets::from(Browsers {
                ie: Some(IE8),
                ..Browsers::default()
            }));
        }

        Ok(Targets::default())
    }

    fn print_parsed(source: &str, path: &Path) -> anyhow::Result<String> {
        let stylesheet = StyleSheet::parse(
            source,
            ParserOptions {
                filename: path.to_string_lossy().to_string(),
                ..Default::default()
            },
        )
        .map_err(|e| anyhow::anyhow!("Failed to parse CSS: {}", e))?;

        let result = stylesheet
            .to_css(PrinterOptions::default())
            .map_err(|e| anyhow::anyhow!("Failed to print CSS: {}", e))?;
        Ok(result.code)
    }
}

impl CssPreprocessor for LightningCss {
    fn name(&self) -> &str {
        "lightningcss"
    }

    fn preprocess(&self, source: &str, path: &Path, base_dir: &Path) -> anyhow::Result<String> {
        if !self.options.inline_imports {
            return Self::print_parsed(source, path);
        }

        let provider = StyleDirProvider::load(base_dir, path, source)?;
        let mut bundler = Bundler::new(&provider, None, ParserOptions::default());
        let stylesheet = bundler
            .bundle(path)
            .map_err(|e| anyhow::anyhow!("Failed to inline imports: {}", e))?;

        let result = stylesheet
            .to_css(PrinterOptions::default())
            .map_err(|e| anyhow::anyhow!("Failed to print CSS: {}", e))?;

        debug!(file = %path.display(), bytes = result.code.len(), "Preprocessed stylesheet");
        Ok(result.code)
    }
}

impl CssMinifier for LightningCss {
    fn name(&self) -> &str {
        "lightningcss"
    }

    fn minify(&self, css: &str, path: &Path, options: &CssMinifyOptions) -> anyhow::Result<String> {
        let targets = self.targets(options)?;

        let mut stylesheet = StyleSheet::parse(
            css,
            ParserOptions {
                filename: path.to_string_lossy().to_string(),
                ..Default::default()
            },
        )
        .map_err(|e| anyhow::anyhow!("Failed to parse CSS: {}", e))?;

        stylesheet
            .minify(MinifyOptions {
                targets,
                ..Default::default()
            })
            .map_err(|e| anyhow::anyhow!("Failed to minify CSS: {}", e))?;

        stylesheet
            .license_comments
            .truncate(options.keep_special_comments);

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                targets,
                ..Default::default()
            })
            .map_err(|e| anyhow::anyhow!("Failed to print CSS: {}", e))?;

        Ok(result.code)
    }
}
