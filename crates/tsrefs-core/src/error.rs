//! Error types for tsrefs-core
//!
//! Every variant here aborts a run. Check-mode mismatches are not errors;
//! they are collected in [`crate::SyncReport`].

use std::path::PathBuf;

/// Result type for tsrefs-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a synchronization run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No plugin recognised the monorepo layout
    #[error("No supported package manager plugin found at {root} (tried: {tried})")]
    NoSupportedPlugin { root: PathBuf, tried: String },

    /// A plugin's `resolve` returned a non-absolute path
    #[error("Plugin '{plugin}' must resolve packages to absolute paths, got: {path}")]
    RelativeResolvedPath { plugin: String, path: String },

    /// No relative path leads from one location to the other
    #[error("Cannot express {target} relative to {base}")]
    UnrelatablePath { target: String, base: String },

    /// A package lists itself as a dependency
    #[error("[{path}] Self dependency is not allowed: package '{package}' at {path} refers to itself")]
    SelfDependency { package: String, path: String },

    /// A name passed to the package allowlist is not a workspace member
    #[error("Package '{name}' is not a member of this workspace")]
    UnknownPackage { name: String },

    /// A `--plugin` value is neither a built-in name nor an existing file
    #[error("Plugin not found: {spec}")]
    PluginNotFound { spec: String },

    /// A custom plugin manifest is malformed
    #[error("Invalid plugin {spec}: {reason}")]
    InvalidPlugin { spec: String, reason: String },

    /// A package.json could not be parsed
    #[error("Invalid package manifest at {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// A tsconfig could not be parsed or edited
    #[error("Invalid tsconfig at {path}: {message}")]
    InvalidTsconfig { path: PathBuf, message: String },

    /// A workspace glob pattern does not compile
    #[error("Invalid workspace pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Run options or project config are inconsistent
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Filesystem error from tsrefs-fs
    #[error(transparent)]
    Fs(#[from] tsrefs_fs::Error),

    /// Content error from tsrefs-content
    #[error(transparent)]
    Content(#[from] tsrefs_content::Error),
}

impl Error {
    pub(crate) fn unrelatable_path(target: impl ToString, base: impl ToString) -> Self {
        Self::UnrelatablePath {
            target: target.to_string(),
            base: base.to_string(),
        }
    }

    pub(crate) fn invalid_tsconfig(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::InvalidTsconfig {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
