//! oxc adapter for the buildlovin JavaScript stage
//!
//! [`OxcMinifier`] parses every input as a classic script, optionally
//! compresses and mangles it, and joins the generated code in input order.
//! Each input keeps its own scope analysis; top-level names are left alone
//! because the inputs share the page's global scope.
//!
//! When a source map is requested, each input gets its own map and the maps
//! are stitched together at the line each input starts on.
//!
//! ```rust,no_run
//! use lovin_bundler::{BuildOptions, Builder, Toolchain};
//! use lovin_plugin_js::OxcMinifier;
//!
//! # fn example() -> lovin_bundler::Result<()> {
//! let builder = Builder::new(Toolchain::passthrough().with_js_minifier(OxcMinifier::new()));
//! builder.build_app_js("apps/shop", &BuildOptions::new("public").srcmaps(true))?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, bail};
use lovin_bundler::{JsMinifier, JsMinifyOptions, JsOutput, JsSource};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_sourcemap::{ConcatSourceMapBuilder, SourceMap};
use oxc_span::SourceType;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OxcMinifierOptions {
    /// Shorten local names when compressing.
    pub mangle: bool,
    /// Also shorten top-level names. Only safe when the bundle is the sole
    /// script defining globals on the page.
    pub mangle_top_level: bool,
}

impl Default for OxcMinifierOptions {
    fn default() -> Self {
        Self {
            mangle: true,
            mangle_top_level: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OxcMinifier {
    options: OxcMinifierOptions,
}

/// One input after codegen.
struct Generated {
    code: String,
    map: Option<SourceMap>,
}

impl OxcMinifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: OxcMinifierOptions) -> Self {
        Self { options }
    }

    fn generate(&self, source: &JsSource, compress: bool, with_map: bool) -> anyhow::Result<Generated> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, &source.code, SourceType::default().with_script(true)).parse();

        if ret.panicked || !ret.errors.is_empty() {
            let first = ret
                .errors
                .first()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "parser gave up".to_string());
            bail!(
                "{}: {} ({} syntax error(s))",
                source.path.display(),
                first,
                ret.errors.len().max(1)
            );
        }

        let mut program = ret.program;
        let base = if compress {
            CodegenOptions::minify()
        } else {
            CodegenOptions::default()
        };
        let codegen_options = CodegenOptions {
            source_map_path: with_map.then(|| source.path.clone()),
            ..base
        };

        let codegen = if compress {
            let mangle = self.options.mangle.then(|| MangleOptions {
                top_level: self.options.mangle_top_level,
                ..MangleOptions::default()
            });
            let minified = Minifier::new(MinifierOptions {
                mangle,
                compress: Some(CompressOptions::default()),
            })
            .minify(&allocator, &mut program);
            Codegen::new()
                .with_options(codegen_options)
                .with_scoping(minified.scoping)
        } else {
            Codegen::new().with_options(codegen_options)
        };

        let out = codegen.build(&program);
        Ok(Generated {
            code: out.code,
            map: out.map,
        })
    }
}

impl JsMinifier for OxcMinifier {
    fn name(&self) -> &str {
        "oxc"
    }

    fn minify(&self, sources: &[JsSource], options: &JsMinifyOptions) -> anyhow::Result<JsOutput> {
        let with_map = options.source_map.is_some();

        let mut code = String::new();
        let mut maps: Vec<(SourceMap, u32)> = Vec::new();

        for source in sources {
            let generated = self
                .generate(source, options.compress, with_map)
                .with_context(|| format!("while combining {}", source.path.display()))?;

            let line_offset = u32::try_from(code.matches('\n').count())
                .context("bundle exceeds the source map line limit")?;
            if let Some(map) = generated.map {
                maps.push((map, line_offset));
            }

            code.push_str(&generated.code);
            if !code.ends_with('\n') {
                code.push('\n');
            }
        }

        let map = match &options.source_map {
            Some(file) if !maps.is_empty() => {
                let parts: Vec<(&SourceMap, u32)> = maps.iter().map(|(m, o)| (m, *o)).collect();
                let mut combined = ConcatSourceMapBuilder::from_sourcemaps(&parts).into_sourcemap();
                combined.set_file(file.as_str());
                Some(combined.to_json_string())
            }
            _ => None,
        };

        debug!(
            sources = sources.len(),
            bytes = code.len(),
            source_map = map.is_some(),
            "Combined scripts"
        );

        Ok(JsOutput { code, map })
    }
}
