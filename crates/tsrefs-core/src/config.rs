//! Project configuration file
//!
//! Teams that run tsrefs from scripts can pin their flags in `tsrefs.toml`,
//! `tsrefs.json` or `tsrefs.yaml` at the monorepo root. Command-line values
//! override file values.

use serde::Deserialize;
use tsrefs_fs::{ConfigStore, NormalizedPath};

use crate::Result;
use crate::options::{EsmOptions, SyncOptionsBuilder};

/// Candidate file names, in lookup order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["tsrefs.toml", "tsrefs.json", "tsrefs.yaml"];

fn default_true() -> bool {
    true
}

/// `[esm]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EsmSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub module_resolution: Option<String>,
    #[serde(default)]
    pub out_dir: Option<String>,
}

impl EsmSection {
    /// Options for the generator, or `None` when disabled.
    pub fn to_options(&self) -> Option<EsmOptions> {
        if !self.enabled {
            return None;
        }
        let defaults = EsmOptions::default();
        Some(EsmOptions {
            file_name: self.file_name.clone().unwrap_or(defaults.file_name),
            module: self.module.clone().unwrap_or(defaults.module),
            module_resolution: self
                .module_resolution
                .clone()
                .unwrap_or(defaults.module_resolution),
            out_dir: self.out_dir.clone().unwrap_or(defaults.out_dir),
        })
    }
}

/// Contents of a project configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Plugin specs, same syntax as `--plugin`
    pub plugins: Vec<String>,
    pub tsconfig_path: Option<String>,
    pub indentation: Option<usize>,
    pub remove_comments: Option<bool>,
    pub add_include: Vec<String>,
    pub add_root_dir: Option<String>,
    /// Relative to the monorepo root
    pub add_extends: Option<String>,
    pub add_composite: Option<bool>,
    pub esm: Option<EsmSection>,
}

impl ProjectConfig {
    /// Load the first config file found at `root`, if any.
    pub fn discover(root: &NormalizedPath) -> Result<Option<(NormalizedPath, Self)>> {
        let candidates: Vec<NormalizedPath> =
            CONFIG_FILE_NAMES.iter().map(|name| root.join(name)).collect();
        let found = ConfigStore::new().load_first(&candidates)?;
        if let Some((path, _)) = &found {
            tracing::debug!(%path, "loaded project config");
        }
        Ok(found)
    }

    /// Seed `builder` with the values in this file.
    ///
    /// Apply before command-line values so those take precedence.
    pub fn apply(&self, root: &NormalizedPath, mut builder: SyncOptionsBuilder) -> SyncOptionsBuilder {
        if let Some(path) = &self.tsconfig_path {
            builder = builder.tsconfig_path(path);
        }
        if let Some(indentation) = self.indentation {
            builder = builder.indentation(indentation);
        }
        if let Some(remove_comments) = self.remove_comments {
            builder = builder.remove_comments(remove_comments);
        }
        if !self.add_include.is_empty() {
            builder = builder.add_include(self.add_include.iter().cloned());
        }
        if let Some(root_dir) = &self.add_root_dir {
            builder = builder.add_root_dir(root_dir);
        }
        if let Some(extends) = &self.add_extends {
            builder = builder.add_extends(root.resolve(extends));
        }
        if let Some(composite) = self.add_composite {
            builder = builder.add_composite(composite);
        }
        if let Some(esm) = &self.esm {
            builder = builder.esm(esm.to_options());
        }
        builder
    }
}
