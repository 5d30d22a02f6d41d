//! SyncEngine implementation
//!
//! The engine picks a package manager plugin, walks its packages in order and
//! either verifies (check mode) or rewrites (apply mode) each tsconfig.

use tsrefs_content::{JsoncDocument, RenderOptions};
use tsrefs_fs::{NormalizedPath, io};

use super::check;
use super::esm;
use super::filter::PackageFilter;
use super::mutator::TsconfigMutator;
use super::references::ReferenceResolver;
use super::report::SyncReport;
use crate::package::Package;
use crate::plugin::{PackageManagerPlugin, PluginContext, PluginRegistry, select_plugin};
use crate::{Error, Result, SyncOptions};

/// Engine for synchronizing project references
///
/// One engine performs one run over one monorepo. Fatal problems abort the
/// run with `Err`; check-mode drift is reported through [`SyncReport`].
pub struct SyncEngine {
    options: SyncOptions,
    plugins: Vec<Box<dyn PackageManagerPlugin>>,
}

impl SyncEngine {
    /// Create an engine whose plugins come from `registry`.
    pub fn new(options: SyncOptions, registry: &PluginRegistry) -> Self {
        let context = PluginContext {
            root: options.root().clone(),
        };
        let plugins = registry.instantiate(&context);
        Self { options, plugins }
    }

    /// Create an engine with already constructed plugins.
    pub fn with_plugins(options: SyncOptions, plugins: Vec<Box<dyn PackageManagerPlugin>>) -> Self {
        Self { options, plugins }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Run the synchronization.
    ///
    /// # Errors
    ///
    /// Returns an error if no plugin supports the root, a dependency
    /// resolves to a relative path or to its own package, a tsconfig cannot
    /// be read, parsed or written, or an allowlisted package is unknown.
    pub fn run(&self) -> Result<SyncReport> {
        let plugin = select_plugin(&self.plugins).ok_or_else(|| Error::NoSupportedPlugin {
            root: self.options.root().to_native(),
            tried: self
                .plugins
                .iter()
                .map(|plugin| plugin.name())
                .collect::<Vec<_>>()
                .join(", "),
        })?;
        tracing::debug!(plugin = plugin.name(), root = %self.options.root(), "selected plugin");

        let packages = plugin.get_all_packages()?;
        let filter = PackageFilter::new(&self.options, plugin, &packages)?;
        let resolver = ReferenceResolver::new(plugin, self.options.root());
        let mutator = TsconfigMutator::new(&self.options);

        let mut actions = Vec::new();
        let mut errors = Vec::new();
        for package in &packages {
            let Some(tsconfig) = filter.select(package) else {
                continue;
            };
            let file = self.display(&tsconfig);

            let source = io::read_text(&tsconfig)?;
            let mut document = JsoncDocument::parse(&source)
                .map_err(|e| Error::invalid_tsconfig(tsconfig.to_native(), e))?;
            let references = resolver.references_for(package)?;
            mutator.apply(package, &tsconfig, &mut document, &references)?;
            tracing::debug!(
                package = %package.name,
                references = references.len(),
                modified = document.is_modified(),
                "processed tsconfig"
            );

            if self.options.check_only() {
                if let Some(mismatch) = check::compare(&package.name, &file, &document) {
                    errors.push(mismatch.to_string());
                }
                continue;
            }

            if self.write(&tsconfig, &source, &document)? {
                actions.push(format!("Updated {file}"));
            }
            if let Some(generated) = self.generate_esm(package)? {
                actions.push(format!("Generated {}", self.display(&generated)));
            }
        }

        Ok(SyncReport::aggregate(actions, errors))
    }

    /// Write `document` back if its rendering differs from `source`.
    fn write(&self, tsconfig: &NormalizedPath, source: &str, document: &JsoncDocument) -> Result<bool> {
        let options = RenderOptions {
            indent: self.options.indentation(),
            preserve_comments: !self.options.remove_comments(),
        };
        let rendered = document
            .render(&options)
            .map_err(|e| Error::invalid_tsconfig(tsconfig.to_native(), e))?;
        if rendered == source {
            return Ok(false);
        }

        io::write_text(tsconfig, &rendered)?;
        tracing::info!(path = %tsconfig, "updated tsconfig");
        Ok(true)
    }

    fn generate_esm(&self, package: &Package) -> Result<Option<NormalizedPath>> {
        match self.options.esm() {
            Some(esm) => esm::write_if_absent(&self.options, esm, package),
            None => Ok(None),
        }
    }

    /// `path` relative to the root, for messages.
    fn display(&self, path: &NormalizedPath) -> String {
        path.relative_to(self.options.root())
            .map(|relative| relative.as_str().to_string())
            .unwrap_or_else(|| path.as_str().to_string())
    }
}
