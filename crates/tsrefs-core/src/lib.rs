//! Core layer of tsrefs
//!
//! Discovers the packages of a JavaScript monorepo through a package manager
//! plugin and keeps each package's tsconfig `references` in line with its
//! workspace dependencies.
//!
//! ```text
//!                    tsrefs-cli
//!                        |
//!                   tsrefs-core
//!                        |
//!              +---------+---------+
//!              |                   |
//!          tsrefs-fs         tsrefs-content
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tsrefs_core::{PluginRegistry, SyncEngine, SyncOptions};
//!
//! fn check(root: &str) -> tsrefs_core::Result<bool> {
//!     let options = SyncOptions::builder(root).check_only(true).build()?;
//!     let report = SyncEngine::new(options, &PluginRegistry::builtin()).run()?;
//!     Ok(report.success)
//! }
//! ```

pub mod config;
pub mod error;
pub mod options;
pub mod package;
pub mod plugin;
pub mod sync;

pub use config::ProjectConfig;
pub use error::{Error, Result};
pub use options::{EsmOptions, SyncOptions, SyncOptionsBuilder};
pub use package::{DependencyField, Package, PackageJson};
pub use plugin::{PackageManagerPlugin, PluginContext, PluginFactory, PluginRegistry, select_plugin};
pub use sync::{ProjectReference, SyncEngine, SyncReport, TsconfigMismatch};
