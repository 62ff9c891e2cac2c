//! The CSS and JavaScript build stages and the [`Builder`] that runs them.
//!
//! A stage turns an app directory into [`Artifact`]s. The builder writes
//! them into the output directory and records each one in the manifest
//! store. Stages are independent: a failed JavaScript build leaves the
//! stylesheets written by the CSS stage in place.

mod css;
mod js;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::app::App;
use crate::manifest::{JsonManifestStore, ManifestStore};
use crate::options::{AppLayout, BuildOptions};
use crate::output::{Artifact, WrittenArtifact, write_artifacts};
use crate::tools::Toolchain;
use crate::Result;

/// Files written by one stage, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageOutput {
    pub artifacts: Vec<WrittenArtifact>,
}

impl StageOutput {
    /// True when the stage was skipped or found nothing to build.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn filenames(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.filename.as_str()).collect()
    }

    /// The artifact recorded under `target`, if this stage wrote one.
    pub fn get(&self, target: &str) -> Option<&WrittenArtifact> {
        self.artifacts.iter().find(|a| a.target == target)
    }
}

/// Result of [`Builder::build_app`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppBuild {
    pub css: StageOutput,
    pub js: StageOutput,
}

impl AppBuild {
    /// Every artifact written, stylesheets first.
    pub fn artifacts(&self) -> impl Iterator<Item = &WrittenArtifact> {
        self.css.artifacts.iter().chain(self.js.artifacts.iter())
    }
}

/// Runs the build stages with a fixed toolchain and layout.
///
/// Without an explicit store, the manifest is `buildManifest.json` (or the
/// layout's `manifest_file`) inside each build's output directory.
#[derive(Clone, Default)]
pub struct Builder {
    toolchain: Toolchain,
    layout: AppLayout,
    manifest: Option<Arc<dyn ManifestStore>>,
}

impl Builder {
    pub fn new(toolchain: Toolchain) -> Self {
        Self {
            toolchain,
            layout: AppLayout::default(),
            manifest: None,
        }
    }

    pub fn with_layout(mut self, layout: AppLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Record builds in `store` instead of the output directory's manifest.
    pub fn with_manifest_store(mut self, store: Arc<dyn ManifestStore>) -> Self {
        self.manifest = Some(store);
        self
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    pub fn layout(&self) -> &AppLayout {
        &self.layout
    }

    /// Build every stylesheet directly inside the app's style directory.
    ///
    /// Each becomes `<app>-<stylesheet>-<hash>.css`. A missing style
    /// directory is not an error; nothing is written.
    pub fn build_app_css(&self, app_path: impl AsRef<Path>, options: &BuildOptions) -> Result<StageOutput> {
        let app = App::new(app_path)?;
        let config = lovin_config::resolve(app.root())?;

        info!(app = app.name(), "Building stylesheets");
        let artifacts = css::build(&app, &config, options, &self.toolchain, &self.layout)?;
        self.emit(&app, options, artifacts)
    }

    /// Combine vendor files, compiled templates and app scripts into
    /// `<app>-<hash>.js`, plus `<app>-<hash>.js.map.js` when source maps are
    /// enabled.
    pub fn build_app_js(&self, app_path: impl AsRef<Path>, options: &BuildOptions) -> Result<StageOutput> {
        let app = App::new(app_path)?;
        let config = lovin_config::resolve(app.root())?;

        info!(app = app.name(), "Building scripts");
        let artifacts = js::build(&app, &config, options, &self.toolchain, &self.layout)?;
        self.emit(&app, options, artifacts)
    }

    /// Run the CSS stage, then the JavaScript stage. The first failure is
    /// returned; files written before it stay on disk.
    pub fn build_app(&self, app_path: impl AsRef<Path>, options: &BuildOptions) -> Result<AppBuild> {
        let app_path = app_path.as_ref();
        let css = self.build_app_css(app_path, options)?;
        let js = self.build_app_js(app_path, options)?;
        Ok(AppBuild { css, js })
    }

    fn emit(&self, app: &App, options: &BuildOptions, artifacts: Vec<Artifact>) -> Result<StageOutput> {
        if artifacts.is_empty() {
            debug!(app = app.name(), "Nothing to write");
            return Ok(StageOutput::default());
        }

        let written = write_artifacts(options.output_dir(), &artifacts)?;

        let entries: Vec<(&str, &str)> = written
            .iter()
            .map(|a| (a.target.as_str(), a.filename.as_str()))
            .collect();
        match &self.manifest {
            Some(store) => store.record(&entries)?,
            None => JsonManifestStore::at(options.output_dir().join(&self.layout.manifest_file))
                .with_history_limit(self.layout.history_limit)
                .record(&entries)?,
        };

        for artifact in &written {
            info!(app = app.name(), file = %artifact.filename, "Wrote");
        }

        Ok(StageOutput { artifacts: written })
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("toolchain", &self.toolchain)
            .field("layout", &self.layout)
            .field("custom_manifest", &self.manifest.is_some())
            .finish()
    }
}

/// [`Builder::build_app_css`] with the pass-through toolchain.
pub fn build_app_css(app_path: impl AsRef<Path>, options: &BuildOptions) -> Result<StageOutput> {
    Builder::default().build_app_css(app_path, options)
}

/// [`Builder::build_app_js`] with the pass-through toolchain.
pub fn build_app_js(app_path: impl AsRef<Path>, options: &BuildOptions) -> Result<StageOutput> {
    Builder::default().build_app_js(app_path, options)
}

/// [`Builder::build_app`] with the pass-through toolchain.
pub fn build_app(app_path: impl AsRef<Path>, options: &BuildOptions) -> Result<AppBuild> {
    Builder::default().build_app(app_path, options)
}
