use std::fs;
use std::path::{Path, PathBuf};

use lovin_config::AppConfig;
use tracing::debug;

use crate::app::App;
use crate::options::{AppLayout, BuildOptions};
use crate::output::Artifact;
use crate::tools::{CssMinifyOptions, Toolchain};
use crate::walker::has_extension;
use crate::{Error, Result};

pub(super) fn build(
    app: &App,
    config: &AppConfig,
    options: &BuildOptions,
    tools: &Toolchain,
    layout: &AppLayout,
) -> Result<Vec<Artifact>> {
    let style_dir = app.style_dir(layout);
    if !style_dir.is_dir() {
        debug!(dir = %style_dir.display(), "No style directory, skipping");
        return Ok(Vec::new());
    }

    let minify = options.resolve_minify(config);
    let minify_options = CssMinifyOptions::default();
    let mut artifacts = Vec::new();

    for path in stylesheets(&style_dir, &layout.style_extension)? {
        let source = fs::read_to_string(&path).map_err(|e| Error::io("read stylesheet", &path, e))?;

        let mut css = tools
            .css_preprocessor
            .preprocess(&source, &path, &style_dir)
            .map_err(|e| Error::tool(tools.css_preprocessor.name(), &path, e))?;

        if minify {
            css = tools
                .css_minifier
                .minify(&css, &path, &minify_options)
                .map_err(|e| Error::tool(tools.css_minifier.name(), &path, e))?;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let artifact = Artifact::hashed(
            &format!("{}-{}", app.name(), stem),
            &format!(".{}", layout.style_extension),
            css,
            layout.hash,
        );
        debug!(source = %path.display(), file = artifact.filename(), "Built stylesheet");
        artifacts.push(artifact);
    }

    Ok(artifacts)
}

/// Stylesheets directly inside `dir`, sorted by name. Subdirectories are
/// left for `@import`.
fn stylesheets(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let extensions = [extension.to_string()];
    let entries = fs::read_dir(dir).map_err(|e| Error::io("read directory", dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io("read directory", dir, e))?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, &extensions) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
