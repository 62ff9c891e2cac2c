//! Precompiled template injection.
//!
//! Every file under an app's templates directory is compiled and registered
//! on the client-side template table under its path relative to the
//! directory, minus the template extension. The registrations are written to
//! one scratch file that the JavaScript build treats like any other source.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::tools::TemplateCompiler;
use crate::walker::{has_extension, walk};
use crate::{Error, Result};

/// The client-side table templates are registered on.
pub const TEMPLATE_REGISTRY: &str = "Ember.TEMPLATES";

/// The synthetic source unit produced by [`TemplateAggregator::write_unit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateUnit {
    /// Where the unit was written.
    pub path: PathBuf,
    /// Registered template names, in registration order.
    pub names: Vec<String>,
}

pub struct TemplateAggregator<'a> {
    compiler: &'a dyn TemplateCompiler,
    extensions: &'a [String],
}

impl<'a> TemplateAggregator<'a> {
    pub fn new(compiler: &'a dyn TemplateCompiler, extensions: &'a [String]) -> Self {
        Self {
            compiler,
            extensions,
        }
    }

    /// Registration name of `file` under `root`: forward slashes, template
    /// extension removed.
    pub fn template_name(&self, root: &Path, file: &Path) -> String {
        let relative = file.strip_prefix(root).unwrap_or(file);
        let stripped = if has_extension(relative, self.extensions) {
            relative.with_extension("")
        } else {
            relative.to_path_buf()
        };

        stripped
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Compile every template under `dir` into registration statements.
    ///
    /// Returns `None` when the directory is missing or holds no files.
    pub fn aggregate(&self, dir: &Path) -> Result<Option<(String, Vec<String>)>> {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "No templates directory, skipping");
            return Ok(None);
        }

        let mut statements = Vec::new();
        let mut names = Vec::new();
        for file in walk(dir)? {
            let source = fs::read_to_string(&file).map_err(|e| Error::io("read template", &file, e))?;
            let name = self.template_name(dir, &file);
            let compiled = self
                .compiler
                .precompile(&source, &name)
                .map_err(|e| Error::tool(self.compiler.name(), &file, e))?;

            statements.push(registration(&name, &compiled));
            names.push(name);
        }

        if statements.is_empty() {
            return Ok(None);
        }

        Ok(Some((statements.join("\n"), names)))
    }

    /// Compile the templates under `dir` and write the unit to `scratch`.
    pub fn write_unit(&self, dir: &Path, scratch: &Path) -> Result<Option<TemplateUnit>> {
        let Some((code, names)) = self.aggregate(dir)? else {
            return Ok(None);
        };

        if let Some(parent) = scratch.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io("create directory", parent, e))?;
        }
        fs::write(scratch, code).map_err(|e| Error::io("write template unit", scratch, e))?;

        debug!(
            unit = %scratch.display(),
            templates = names.len(),
            "Wrote template unit"
        );

        Ok(Some(TemplateUnit {
            path: scratch.to_path_buf(),
            names,
        }))
    }
}

fn registration(name: &str, compiled: &str) -> String {
    // Names come from file paths; quote them as JS string literals.
    let key = serde_json::Value::String(name.to_string()).to_string();
    format!(
        "{}[{}] = Ember.Handlebars.template({});",
        TEMPLATE_REGISTRY, key, compiled
    )
}
