//! Run options
//!
//! [`SyncOptions`] is built once through [`SyncOptionsBuilder`] and passed by
//! reference to every component. Paths are made absolute at build time, so
//! nothing downstream depends on the current directory.

use tsrefs_fs::NormalizedPath;

use crate::{Error, Result};

/// Default tsconfig file name inside each package.
pub const DEFAULT_TSCONFIG: &str = "tsconfig.json";

/// Default indentation width for written files.
pub const DEFAULT_INDENTATION: usize = 2;

/// Settings for the generated ES-module tsconfig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsmOptions {
    /// File name inside the package
    pub file_name: String,
    pub module: String,
    pub module_resolution: String,
    pub out_dir: String,
}

impl Default for EsmOptions {
    fn default() -> Self {
        Self {
            file_name: "tsconfig.module.json".to_string(),
            module: "ESNext".to_string(),
            module_resolution: "node".to_string(),
            out_dir: "./module/".to_string(),
        }
    }
}

/// Immutable configuration of one synchronization run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    root: NormalizedPath,
    check_only: bool,
    only_packages: Vec<String>,
    only_on_path: Option<NormalizedPath>,
    add_include: Vec<String>,
    add_root_dir: Option<String>,
    add_extends: Option<NormalizedPath>,
    add_composite: bool,
    esm: Option<EsmOptions>,
    remove_comments: bool,
    indentation: usize,
    tsconfig_path: String,
}

impl SyncOptions {
    pub fn builder(root: impl Into<NormalizedPath>) -> SyncOptionsBuilder {
        SyncOptionsBuilder::new(root)
    }

    /// Absolute, canonical monorepo root
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn check_only(&self) -> bool {
        self.check_only
    }

    /// Package-name allowlist; empty means every package
    pub fn only_packages(&self) -> &[String] {
        &self.only_packages
    }

    /// Absolute path filter
    pub fn only_on_path(&self) -> Option<&NormalizedPath> {
        self.only_on_path.as_ref()
    }

    pub fn add_include(&self) -> &[String] {
        &self.add_include
    }

    pub fn add_root_dir(&self) -> Option<&str> {
        self.add_root_dir.as_deref()
    }

    /// Absolute target of `extends`
    pub fn add_extends(&self) -> Option<&NormalizedPath> {
        self.add_extends.as_ref()
    }

    pub fn add_composite(&self) -> bool {
        self.add_composite
    }

    pub fn esm(&self) -> Option<&EsmOptions> {
        self.esm.as_ref()
    }

    pub fn remove_comments(&self) -> bool {
        self.remove_comments
    }

    pub fn indentation(&self) -> usize {
        self.indentation
    }

    /// tsconfig path relative to each package directory
    pub fn tsconfig_path(&self) -> &str {
        &self.tsconfig_path
    }

    /// The tsconfig location for a package directory.
    pub fn tsconfig_for(&self, location: &NormalizedPath) -> NormalizedPath {
        location.join(&self.tsconfig_path)
    }
}

/// Builder for [`SyncOptions`].
///
/// Relative `only_on_path` and `add_extends` values are resolved against the
/// root. Callers that take paths from a command line should resolve them
/// against the working directory first.
#[derive(Debug, Clone)]
pub struct SyncOptionsBuilder {
    root: NormalizedPath,
    check_only: bool,
    only_packages: Vec<String>,
    only_on_path: Option<NormalizedPath>,
    add_include: Vec<String>,
    add_root_dir: Option<String>,
    add_extends: Option<NormalizedPath>,
    add_composite: bool,
    esm: Option<EsmOptions>,
    remove_comments: bool,
    indentation: Option<usize>,
    tsconfig_path: Option<String>,
}

impl SyncOptionsBuilder {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self {
            root: root.into(),
            check_only: false,
            only_packages: Vec::new(),
            only_on_path: None,
            add_include: Vec::new(),
            add_root_dir: None,
            add_extends: None,
            add_composite: false,
            esm: None,
            remove_comments: false,
            indentation: None,
            tsconfig_path: None,
        }
    }

    pub fn check_only(mut self, check_only: bool) -> Self {
        self.check_only = check_only;
        self
    }

    pub fn only_packages<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only_packages = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn only_on_path(mut self, path: impl Into<NormalizedPath>) -> Self {
        self.only_on_path = Some(path.into());
        self
    }

    pub fn add_include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_include = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_root_dir(mut self, root_dir: impl Into<String>) -> Self {
        self.add_root_dir = Some(root_dir.into());
        self
    }

    pub fn add_extends(mut self, target: impl Into<NormalizedPath>) -> Self {
        self.add_extends = Some(target.into());
        self
    }

    pub fn add_composite(mut self, add_composite: bool) -> Self {
        self.add_composite = add_composite;
        self
    }

    pub fn esm(mut self, esm: Option<EsmOptions>) -> Self {
        self.esm = esm;
        self
    }

    pub fn remove_comments(mut self, remove_comments: bool) -> Self {
        self.remove_comments = remove_comments;
        self
    }

    pub fn indentation(mut self, indentation: usize) -> Self {
        self.indentation = Some(indentation);
        self
    }

    pub fn tsconfig_path(mut self, tsconfig_path: impl Into<String>) -> Self {
        self.tsconfig_path = Some(tsconfig_path.into());
        self
    }

    /// Validate and freeze the options.
    ///
    /// Fails if the root does not exist or the tsconfig path is not a
    /// relative file path.
    pub fn build(self) -> Result<SyncOptions> {
        let root = self.root.canonicalize()?;
        if !root.is_dir() {
            return Err(Error::InvalidConfig {
                message: format!("root {root} is not a directory"),
            });
        }

        let tsconfig_path = self
            .tsconfig_path
            .unwrap_or_else(|| DEFAULT_TSCONFIG.to_string());
        let tsconfig = NormalizedPath::new(&tsconfig_path);
        if tsconfig_path.trim().is_empty() || tsconfig.is_absolute() {
            return Err(Error::InvalidConfig {
                message: format!(
                    "tsconfig path must be relative to the package, got '{tsconfig_path}'"
                ),
            });
        }

        if let Some(esm) = &self.esm
            && NormalizedPath::new(&esm.file_name).clean() == tsconfig.clean()
        {
            return Err(Error::InvalidConfig {
                message: format!("ESM tsconfig cannot overwrite {tsconfig_path}"),
            });
        }

        Ok(SyncOptions {
            only_on_path: self.only_on_path.map(|p| absolutize(&root, &p)),
            add_extends: self.add_extends.map(|p| absolutize(&root, &p)),
            root,
            check_only: self.check_only,
            only_packages: self.only_packages,
            add_include: self.add_include,
            add_root_dir: self.add_root_dir,
            add_composite: self.add_composite,
            esm: self.esm,
            remove_comments: self.remove_comments,
            indentation: self.indentation.unwrap_or(DEFAULT_INDENTATION),
            tsconfig_path: tsconfig.clean().as_str().to_string(),
        })
    }
}

/// Resolve `path` against `base`, following symlinks when the target exists
/// so it compares equal to canonical package locations.
fn absolutize(base: &NormalizedPath, path: &NormalizedPath) -> NormalizedPath {
    let resolved = base.resolve(path.as_str());
    resolved.canonicalize().unwrap_or(resolved)
}
