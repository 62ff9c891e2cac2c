use std::fs;

use lovin_config::AppConfig;
use tracing::debug;

use crate::app::App;
use crate::options::{AppLayout, BuildOptions};
use crate::output::Artifact;
use crate::sources::assemble_sources;
use crate::templates::TemplateAggregator;
use crate::tools::{JsMinifyOptions, JsSource, Toolchain};
use crate::{Error, Result};

/// Suffix of the source map written next to a bundle.
pub(crate) const SOURCE_MAP_SUFFIX: &str = ".map.js";

pub(super) fn build(
    app: &App,
    config: &AppConfig,
    options: &BuildOptions,
    tools: &Toolchain,
    layout: &AppLayout,
) -> Result<Vec<Artifact>> {
    let aggregator = TemplateAggregator::new(
        tools.template_compiler.as_ref(),
        &layout.template_extensions,
    );
    let unit = aggregator.write_unit(
        &app.templates_dir(layout),
        &options.template_scratch(app),
    )?;

    let set = assemble_sources(
        app,
        config,
        layout,
        unit.as_ref().map(|u| u.path.as_path()),
        options.debug,
    )?;
    if set.is_empty() {
        debug!(app = app.name(), "No script sources, skipping");
        return Ok(Vec::new());
    }

    let mut sources = Vec::with_capacity(set.len());
    for path in set {
        let code = fs::read_to_string(&path).map_err(|e| Error::io("read script", &path, e))?;
        sources.push(JsSource { path, code });
    }
    debug!(app = app.name(), sources = sources.len(), "Combining scripts");

    let bundle_target = format!("{}.js", app.name());
    let minify_options = JsMinifyOptions {
        compress: options.resolve_minify(config),
        source_map: options
            .resolve_srcmaps(config)
            .then(|| bundle_target.clone()),
    };

    let output = tools
        .js_minifier
        .minify(&sources, &minify_options)
        .map_err(|e| Error::tool(tools.js_minifier.name(), app.root(), e))?;

    let bundle = Artifact::hashed(app.name(), ".js", output.code, layout.hash);
    let mut artifacts = Vec::with_capacity(2);
    if let Some(map) = output.map {
        let map = bundle.companion(SOURCE_MAP_SUFFIX, map);
        artifacts.push(bundle);
        artifacts.push(map);
    } else {
        artifacts.push(bundle);
    }

    Ok(artifacts)
}
