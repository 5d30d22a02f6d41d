//! Declarative plugins for layouts the built-ins do not cover
//!
//! A custom plugin is a TOML, JSON or YAML file:
//!
//! ```toml
//! name = "rush"
//! marker = "rush.json"
//! packages = ["apps/*", "libraries/*"]
//! dependency_fields = ["dependencies", "devDependencies", "peerDependencies"]
//! ```
//!
//! The plugin supports a root when `marker` exists there, enumerates packages
//! with the same glob rules as the built-ins, and reads references from the
//! listed manifest sections.

use serde::Deserialize;
use tsrefs_fs::{ConfigStore, NormalizedPath};

use super::{PackageIndex, PackageManagerPlugin, PluginContext, PluginFactory};
use crate::package::{DependencyField, Package, PackageJson};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomPluginManifest {
    pub name: String,
    /// File or directory, relative to the root, whose presence enables the plugin
    pub marker: String,
    /// Workspace globs
    pub packages: Vec<String>,
    #[serde(default)]
    pub dependency_fields: Option<Vec<DependencyField>>,
}

impl CustomPluginManifest {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".into());
        }
        if self.marker.trim().is_empty() {
            return Err("marker must not be empty".into());
        }
        if self.packages.is_empty() {
            return Err("packages must list at least one pattern".into());
        }
        if matches!(&self.dependency_fields, Some(fields) if fields.is_empty()) {
            return Err("dependency_fields must not be empty when set".into());
        }
        Ok(())
    }
}

/// Factory built from a custom plugin manifest.
#[derive(Debug, Clone)]
pub struct CustomPluginFactory {
    manifest: CustomPluginManifest,
}

impl CustomPluginFactory {
    /// Load and validate the manifest at `path`; `spec` is the user's
    /// original argument, used in error messages.
    pub fn load(spec: &str, path: &NormalizedPath) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidPlugin {
            spec: spec.to_string(),
            reason,
        };

        let manifest: CustomPluginManifest = ConfigStore::new()
            .load(path)
            .map_err(|e| invalid(e.to_string()))?;
        manifest.validate().map_err(invalid)?;

        tracing::debug!(name = %manifest.name, %path, "loaded custom plugin");
        Ok(Self { manifest })
    }

    pub fn from_manifest(manifest: CustomPluginManifest) -> Result<Self> {
        manifest.validate().map_err(|reason| Error::InvalidPlugin {
            spec: manifest.name.clone(),
            reason,
        })?;
        Ok(Self { manifest })
    }
}

impl PluginFactory for CustomPluginFactory {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn create(&self, context: &PluginContext) -> Box<dyn PackageManagerPlugin> {
        Box::new(CustomPlugin {
            manifest: self.manifest.clone(),
            index: PackageIndex::new(context.root.clone()),
        })
    }
}

#[derive(Debug)]
pub struct CustomPlugin {
    manifest: CustomPluginManifest,
    index: PackageIndex,
}

impl CustomPlugin {
    fn patterns(&self) -> Result<Vec<String>> {
        Ok(self.manifest.packages.clone())
    }
}

impl PackageManagerPlugin for CustomPlugin {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn supports(&self) -> bool {
        self.index.root().join(&self.manifest.marker).exists()
    }

    fn get_all_packages(&self) -> Result<Vec<Package>> {
        Ok(self.index.load(|| self.patterns())?.to_vec())
    }

    fn get_dependencies(&self, manifest: &PackageJson) -> Vec<String> {
        match &self.manifest.dependency_fields {
            Some(fields) => manifest.dependency_names(fields),
            None => manifest.dependency_names(&DependencyField::DEFAULT),
        }
    }

    fn resolve(&self, name: &str) -> Option<NormalizedPath> {
        self.index.locate(name, || self.patterns())
    }
}
